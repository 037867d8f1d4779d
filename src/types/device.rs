//! Device and actuator handles

use serde::{Deserialize, Serialize};

/// One controllable output on a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorHandle {
    /// Index of the owning device on the server
    pub device_index: u32,
    /// Index of the actuator within the device
    pub actuator_index: u32,
}

/// A device known to the device-control session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceHandle {
    /// Server-assigned index
    pub index: u32,
    /// Display name
    pub name: String,
    /// Controllable outputs, in server order
    pub actuators: Vec<ActuatorHandle>,
}

impl DeviceHandle {
    /// Device with `count` actuators numbered from zero
    pub fn with_actuators(index: u32, name: impl Into<String>, count: u32) -> Self {
        Self {
            index,
            name: name.into(),
            actuators: (0..count)
                .map(|actuator_index| ActuatorHandle { device_index: index, actuator_index })
                .collect(),
        }
    }

    /// First actuator, if any
    pub fn first_actuator(&self) -> Option<&ActuatorHandle> {
        self.actuators.first()
    }
}
