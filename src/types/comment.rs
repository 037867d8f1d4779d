//! Comments and the de-duplication set

use std::collections::HashSet;
use serde::{Deserialize, Serialize};

/// Maximum characters of a comment body shown in progress lines
pub const PREVIEW_CHARS: usize = 80;

/// A comment as fetched from the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Opaque platform identifier
    pub id: String,
    /// Author name, absent for deleted accounts
    pub author: Option<String>,
    /// Raw body text
    pub body: String,
}

impl Comment {
    /// Create a comment
    pub fn new(id: impl Into<String>, author: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: author.map(str::to_string),
            body: body.into(),
        }
    }

    /// Author for display
    pub fn author_display(&self) -> &str {
        self.author.as_deref().unwrap_or("[deleted]")
    }

    /// First characters of the body, cut on a char boundary
    pub fn preview(&self) -> String {
        self.body.chars().take(PREVIEW_CHARS).collect()
    }
}

/// Comment ids already processed during this run
///
/// Only grows. Not persisted: a restart sees every current comment as new.
#[derive(Debug, Clone, Default)]
pub struct SeenComments {
    ids: HashSet<String>,
}

impl SeenComments {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id, returning false if it was already present
    pub fn insert(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    /// Has this id been processed?
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of ids seen
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Nothing seen yet?
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
