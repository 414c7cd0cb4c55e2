use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Defines the interface for the motors of a module
pub mod actuator_interface;

/// Defines the interface for the absolute angle sensor of a module
pub mod sensor_interface;

/// Provides a motor controller that talks to the motor over channels
pub mod channel_motor;

#[cfg(test)]
pub(crate) mod mock_hardware;

/// Identifies a single device on the robot bus.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Device {
    /// The motor that drives the wheel, with its bus ID.
    DriveMotor(u8),

    /// The motor that turns the module, with its bus ID.
    SteeringMotor(u8),

    /// The absolute angle sensor of the module, with its bus ID.
    AbsoluteEncoder(u8),
}

impl Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::DriveMotor(id) => write!(f, "drive motor [{}]", id),
            Device::SteeringMotor(id) => write!(f, "steering motor [{}]", id),
            Device::AbsoluteEncoder(id) => write!(f, "absolute encoder [{}]", id),
        }
    }
}
