use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

#[cfg(test)]
#[path = "actuator_interface_tests.rs"]
mod actuator_interface_tests;

/// The gains for the closed loop controller that runs on the motor controller.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PidGains {
    /// The proportional gain
    pub kp: f64,

    /// The integral gain
    pub ki: f64,

    /// The derivative gain
    pub kd: f64,

    /// The velocity feedforward gain applied by the motor controller
    pub kf: f64,
}

impl PidGains {
    /// Returns a value indicating if all the gains are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite() && self.kf.is_finite()
    }

    /// Creates a new [PidGains] instance.
    pub fn new(kp: f64, ki: f64, kd: f64, kf: f64) -> Self {
        Self { kp, ki, kd, kf }
    }
}

/// Defines what a motor does when it is given a zero output.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum IdleMode {
    /// The motor actively resists motion.
    Brake,

    /// The motor spins freely.
    Coast,
}

/// A single configuration write to a motor controller.
///
/// The settings are applied one at a time so that the outcome of each write can be checked
/// and retried on its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotorSetting {
    /// Reset all settings to the factory defaults.
    RestoreFactoryDefaults,

    /// The gains of the onboard closed loop controller.
    Pid(PidGains),

    /// The current limit in amps.
    SmartCurrentLimit {
        /// The current limit in amps.
        amps: u32,
    },

    /// The minimum time to go from zero to full output in open loop control.
    OpenLoopRampRate {
        /// The ramp time in seconds.
        seconds: f64,
    },

    /// The minimum time to go from zero to full output in closed loop control.
    ClosedLoopRampRate {
        /// The ramp time in seconds.
        seconds: f64,
    },

    /// Scale the output to the given nominal voltage to remove the effects of battery sag.
    VoltageCompensation {
        /// The nominal voltage.
        nominal_volts: f64,
    },

    /// Invert the direction of the motor.
    Inverted(bool),

    /// The behaviour at zero output.
    IdleMode(IdleMode),
}

impl Display for MotorSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotorSetting::RestoreFactoryDefaults => write!(f, "restore factory defaults"),
            MotorSetting::Pid(g) => write!(
                f,
                "PID gains [p: {}, i: {}, d: {}, f: {}]",
                g.kp, g.ki, g.kd, g.kf
            ),
            MotorSetting::SmartCurrentLimit { amps } => {
                write!(f, "smart current limit [{} A]", amps)
            }
            MotorSetting::OpenLoopRampRate { seconds } => {
                write!(f, "open loop ramp rate [{} s]", seconds)
            }
            MotorSetting::ClosedLoopRampRate { seconds } => {
                write!(f, "closed loop ramp rate [{} s]", seconds)
            }
            MotorSetting::VoltageCompensation { nominal_volts } => {
                write!(f, "voltage compensation [{} V]", nominal_volts)
            }
            MotorSetting::Inverted(inverted) => write!(f, "inverted [{}]", inverted),
            MotorSetting::IdleMode(mode) => write!(f, "idle mode [{:?}]", mode),
        }
    }
}

/// A setpoint for a motor controller. All values are in the raw units of the motor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlRequest {
    /// Drive the motor with a fraction of the available output, in the range [-1, 1].
    DutyCycle(f64),

    /// Move the motor shaft to the given position with the onboard position controller.
    Position {
        /// The position in motor shaft rotations.
        rotations: f64,
    },

    /// Spin the motor shaft at the given velocity with the onboard velocity controller.
    Velocity {
        /// The velocity in motor shaft rotations per minute.
        rotations_per_minute: f64,

        /// An additional voltage that is added to the output of the onboard controller.
        feedforward_in_volts: f64,
    },
}

/// Defines the interface for a motor controller with a built-in relative encoder.
///
/// All calls are synchronous. A call either completes or returns an error before it returns.
/// Time-outs on the bus are the responsibility of the implementation.
pub trait MotorController {
    /// Applies a single configuration setting.
    ///
    /// ## Errors
    ///
    /// * [Error::ConfigurationRejected] - Returned when the motor controller did not accept
    ///   the setting.
    fn apply_setting(&mut self, setting: &MotorSetting) -> Result<(), Error>;

    /// Stores the current configuration so that it survives a power cycle.
    fn commit_configuration(&mut self) -> Result<(), Error>;

    /// Returns the position of the motor shaft in rotations.
    fn position(&self) -> Result<f64, Error>;

    /// Sends a new setpoint to the motor controller.
    fn set_control(&mut self, request: ControlRequest) -> Result<(), Error>;

    /// Sets the position register of the built-in encoder to the given value.
    ///
    /// ## Parameters
    ///
    /// * 'rotations' - The new position of the motor shaft in rotations.
    fn set_position(&mut self, rotations: f64) -> Result<(), Error>;

    /// Returns the velocity of the motor shaft in rotations per minute.
    fn velocity(&self) -> Result<f64, Error>;
}
