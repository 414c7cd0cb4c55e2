#![warn(missing_docs)]

//! Control logic for a single module of a swerve (4 wheel steering and 4 wheel drive) robot.
//!
//! Turns a desired module state (wheel speed and wheel angle) into setpoints for the drive
//! and steering motors, and turns the motor and sensor readings back into a module state.
//! The steering motor's relative encoder is calibrated against an absolute encoder so that
//! the module angle is known without drift correction at runtime.

use thiserror::Error;

use crate::hardware::Device;

/// Defines the angular number space used to reason about wrap-around angles
pub mod number_space;

/// Provides the conversions between raw motor units and physical units
pub mod units;

/// Provides the interfaces to the motors and sensors of a module
pub mod hardware;

/// Provides the state, optimization, calibration and control of a swerve module
pub mod module_elements;

/// Defines the different errors for the swerve module crate.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A device reported that it could not apply a single configuration setting.
    #[error("The device rejected the configuration setting {setting}.")]
    ConfigurationRejected {
        /// A description of the setting that was rejected.
        setting: String,
    },

    /// One or more devices could not be configured, even after retrying.
    #[error("Failed to configure the module hardware: {failures:?}.")]
    ConfigurationFailed {
        /// A description of each configuration step that failed.
        failures: Vec<String>,
    },

    /// The configuration values are not usable.
    #[error("The configuration is invalid: {reason}.")]
    InvalidConfiguration {
        /// The reason the configuration was rejected.
        reason: String,
    },

    /// A read from, or a write to, a device failed.
    #[error("A hardware operation failed: {reason}.")]
    HardwareFault {
        /// The reason for the failure.
        reason: String,
    },

    /// The absolute sensor could not be read during calibration.
    #[error("Failed to read the absolute sensor {device}: {reason}.")]
    AbsoluteSensorUnreadable {
        /// The sensor that failed.
        device: Device,
        /// The reason for the failure.
        reason: String,
    },

    /// The absolute sensor reported a value outside of its reporting range.
    #[error("The absolute sensor {device} reported an implausible angle of {reading_in_degrees} degrees.")]
    AbsoluteSensorOutOfRange {
        /// The sensor that reported the value.
        device: Device,
        /// The value that was reported.
        reading_in_degrees: f64,
    },

    /// The module refused a command because its steering angle has not been calibrated.
    #[error("Swerve module {module_number} has not been calibrated: {cause}")]
    ModuleNotCalibrated {
        /// The number of the module.
        module_number: usize,
        /// The error of the most recent calibration attempt.
        #[source]
        cause: Box<Error>,
    },

    /// The module was given a state that contains a NaN or infinite value.
    #[error("The module state (speed: {speed}, angle: {angle_in_degrees}) is not a finite state.")]
    InvalidModuleState {
        /// The requested speed.
        speed: f64,
        /// The requested angle in degrees.
        angle_in_degrees: f64,
    },
}
