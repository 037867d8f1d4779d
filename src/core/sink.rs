//! Actuation sink: the device side of the loop
//!
//! A pulse sets a level on the first actuator of the first device, holds it,
//! then returns it to zero.

use std::time::Duration;
use async_trait::async_trait;
use tracing::{info, warn};
use crate::types::{ActuatorHandle, DeviceHandle, PulseOutcome, MonitorResult};

/// A device-control session
#[async_trait]
pub trait ActuationSink: Send + Sync {
    /// Open the session
    async fn connect(&self, server_url: &str) -> MonitorResult<()>;

    /// Begin device discovery
    async fn start_scanning(&self) -> MonitorResult<()>;

    /// End device discovery
    async fn stop_scanning(&self) -> MonitorResult<()>;

    /// Devices currently known to the session
    fn devices(&self) -> Vec<DeviceHandle>;

    /// Set one actuator to a level in [0, 1]
    async fn command(&self, actuator: &ActuatorHandle, level: f64) -> MonitorResult<()>;

    /// Bring every actuator to zero
    async fn stop_all(&self) -> MonitorResult<()>;

    /// Close the session
    async fn disconnect(&self) -> MonitorResult<()>;

    /// Is the session still open?
    fn is_connected(&self) -> bool;

    /// Scan for `window`, then stop
    async fn discover(&self, window: Duration) -> MonitorResult<()> {
        self.start_scanning().await?;
        tokio::time::sleep(window).await;
        self.stop_scanning().await
    }
}

/// Run one pulse against the first available actuator
///
/// Missing devices are reported, not treated as errors.
pub async fn pulse<A>(sink: &A, level: f64, hold: Duration) -> MonitorResult<PulseOutcome>
where
    A: ActuationSink + ?Sized,
{
    let devices = sink.devices();
    let Some(device) = devices.first() else {
        warn!("No devices connected.");
        return Ok(PulseOutcome::NoDevice);
    };
    let Some(actuator) = device.first_actuator() else {
        warn!("No actuators on device {}.", device.name);
        return Ok(PulseOutcome::NoActuator { device: device.name.clone() });
    };

    sink.command(actuator, level).await?;
    info!("Sent level {:.2} to {} for {:.1}s", level, device.name, hold.as_secs_f64());
    tokio::time::sleep(hold).await;
    sink.command(actuator, 0.0).await?;

    Ok(PulseOutcome::Delivered { device: device.name.clone(), level })
}
