//! Buttplug-protocol actuation sink over the JSON websocket connector

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use ::buttplug::client::{ButtplugClient, ButtplugClientDevice, ButtplugClientError, ScalarCommand};
use ::buttplug::core::connector::new_json_ws_client_connector;
use ::buttplug::core::message::{ActuatorType, ClientGenericDeviceMessageAttributes};
use tracing::debug;

use crate::core::ActuationSink;
use crate::types::{ActuatorHandle, DeviceHandle, MonitorError, MonitorResult};
use crate::CLIENT_NAME;

/// `ActuationSink` backed by a Buttplug server (e.g. Intiface)
///
/// Actuators are every scalar output of a device (vibrate, oscillate, rotate,
/// constrict, ...), numbered by their position in the device's scalar list.
pub struct ButtplugSink {
    client: ButtplugClient,
}

impl Default for ButtplugSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtplugSink {
    /// Create new sink announcing itself as `upvibe`
    pub fn new() -> Self {
        Self { client: ButtplugClient::new(CLIENT_NAME) }
    }

    fn find_device(&self, index: u32) -> Option<Arc<ButtplugClientDevice>> {
        self.client.devices().into_iter().find(|d| d.index() == index)
    }

    /// Classify a client failure: a dropped connection ends the session
    fn device_error(&self, err: ButtplugClientError) -> MonitorError {
        if self.client.connected() {
            MonitorError::DeviceUnavailable(err.to_string())
        } else {
            MonitorError::SessionLost(err.to_string())
        }
    }
}

#[async_trait]
impl ActuationSink for ButtplugSink {
    async fn connect(&self, server_url: &str) -> MonitorResult<()> {
        let connector = new_json_ws_client_connector(server_url);
        self.client
            .connect(connector)
            .await
            .map_err(|e| MonitorError::Connection(e.to_string()))
    }

    async fn start_scanning(&self) -> MonitorResult<()> {
        self.client.start_scanning().await.map_err(|e| self.device_error(e))
    }

    async fn stop_scanning(&self) -> MonitorResult<()> {
        self.client.stop_scanning().await.map_err(|e| self.device_error(e))
    }

    fn devices(&self) -> Vec<DeviceHandle> {
        in_index_order(
            self.client
                .devices()
                .iter()
                .map(|d| device_handle(d.index(), d.name(), &d.scalar_attributes()))
                .collect(),
        )
    }

    async fn command(&self, actuator: &ActuatorHandle, level: f64) -> MonitorResult<()> {
        let device = self.find_device(actuator.device_index).ok_or_else(|| {
            MonitorError::DeviceUnavailable(format!("device {} went away", actuator.device_index))
        })?;

        let levels = scalar_levels(&device.scalar_attributes(), actuator.actuator_index, level).ok_or_else(|| {
            MonitorError::DeviceUnavailable(format!(
                "device {} has no actuator {}",
                actuator.device_index, actuator.actuator_index
            ))
        })?;
        debug!("Device {} actuator {} -> {:.2}", actuator.device_index, actuator.actuator_index, level);
        device
            .scalar(&ScalarCommand::ScalarMap(levels))
            .await
            .map_err(|e| self.device_error(e))
    }

    async fn stop_all(&self) -> MonitorResult<()> {
        self.client.stop_all_devices().await.map_err(|e| self.device_error(e))
    }

    async fn disconnect(&self) -> MonitorResult<()> {
        self.client
            .disconnect()
            .await
            .map_err(|e| MonitorError::SessionLost(e.to_string()))
    }

    fn is_connected(&self) -> bool {
        self.client.connected()
    }
}

/// Handle exposing one actuator per scalar output
fn device_handle(index: u32, name: &str, attributes: &[ClientGenericDeviceMessageAttributes]) -> DeviceHandle {
    DeviceHandle::with_actuators(index, name, attributes.len() as u32)
}

/// The client's device map has no stable order; "first device" means lowest index
fn in_index_order(mut handles: Vec<DeviceHandle>) -> Vec<DeviceHandle> {
    handles.sort_by_key(|h| h.index);
    handles
}

/// Scalar command for one output, typed as that output's actuator kind
fn scalar_levels(
    attributes: &[ClientGenericDeviceMessageAttributes],
    actuator_index: u32,
    level: f64,
) -> Option<HashMap<u32, (f64, ActuatorType)>> {
    let attribute = attributes.get(actuator_index as usize)?;
    Some(HashMap::from([(actuator_index, (level.clamp(0.0, 1.0), *attribute.actuator_type()))]))
}
