//! Writes the configuration to the motor controllers and the absolute sensor of a module.
//!
//! Every setting is written on its own and retried a limited number of times. A failure does
//! not stop the remaining settings from being written, so the report lists every setting that
//! could not be applied. Making the motor configuration persistent is a separate step, so that
//! the caller can decide to commit only when every device of a module was configured.

use tracing::{debug, warn};

use crate::{
    hardware::{
        actuator_interface::{MotorController, MotorSetting},
        sensor_interface::{AbsoluteEncoder, AbsoluteEncoderConfiguration},
        Device,
    },
    Error,
};

#[cfg(test)]
#[path = "device_setup_tests.rs"]
mod device_setup_tests;

/// The outcome of writing a single setting to a device.
#[derive(Debug, PartialEq)]
pub struct StepOutcome {
    /// A description of the setting.
    setting: String,

    /// The number of writes that were made.
    attempts: u32,

    /// The error returned by the last write, if the setting could not be applied.
    error: Option<Error>,
}

impl StepOutcome {
    /// Returns the number of writes that were made.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the error of the last write, or `None` if the setting was applied.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Returns a value indicating if the setting was applied.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Returns a description of the setting.
    pub fn setting(&self) -> &str {
        &self.setting
    }
}

/// The result of configuring a single device.
#[derive(Debug, PartialEq)]
pub struct ConfigurationReport {
    device: Device,
    outcomes: Vec<StepOutcome>,
}

impl ConfigurationReport {
    /// Returns the device that was configured.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Returns a description of every setting that could not be applied.
    pub fn failures(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| {
                o.error.as_ref().map(|e| {
                    format!(
                        "{}: {} failed after {} attempts ({})",
                        self.device, o.setting, o.attempts, e
                    )
                })
            })
            .collect()
    }

    /// Returns a value indicating if every setting was applied.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(StepOutcome::is_success)
    }

    /// Returns the outcome of each setting, in the order in which they were written.
    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }
}

/// Writes the settings to a motor controller. The settings are not committed.
///
/// ## Parameters
///
/// * 'device' - The motor that is configured, used for reporting
/// * 'motor' - The motor controller
/// * 'settings' - The settings, in the order in which they are written
/// * 'attempts' - The maximum number of writes per setting
pub fn configure_motor(
    device: Device,
    motor: &mut impl MotorController,
    settings: &[MotorSetting],
    attempts: u32,
) -> ConfigurationReport {
    let outcomes = settings
        .iter()
        .map(|setting| {
            with_retries(device, setting.to_string(), attempts, || {
                motor.apply_setting(setting)
            })
        })
        .collect();

    ConfigurationReport { device, outcomes }
}

/// Stores the configuration of a motor controller so that it survives a power cycle.
///
/// ## Parameters
///
/// * 'device' - The motor that is committed, used for reporting
/// * 'motor' - The motor controller
/// * 'attempts' - The maximum number of commit attempts
pub fn commit_motor(
    device: Device,
    motor: &mut impl MotorController,
    attempts: u32,
) -> ConfigurationReport {
    let commit = with_retries(device, "commit configuration".to_string(), attempts, || {
        motor.commit_configuration()
    });

    ConfigurationReport {
        device,
        outcomes: vec![commit],
    }
}

/// Resets the absolute sensor to its factory defaults and applies the given configuration.
///
/// ## Parameters
///
/// * 'device' - The sensor that is configured, used for reporting
/// * 'encoder' - The absolute sensor
/// * 'configuration' - The configuration that is applied after the reset
/// * 'attempts' - The maximum number of writes per step
pub fn configure_absolute_encoder(
    device: Device,
    encoder: &mut impl AbsoluteEncoder,
    configuration: &AbsoluteEncoderConfiguration,
    attempts: u32,
) -> ConfigurationReport {
    let reset = with_retries(device, "restore factory defaults".to_string(), attempts, || {
        encoder.restore_factory_defaults()
    });
    let configure = with_retries(device, format!("{:?}", configuration), attempts, || {
        encoder.apply_configuration(configuration)
    });

    ConfigurationReport {
        device,
        outcomes: vec![reset, configure],
    }
}

fn with_retries(
    device: Device,
    setting: String,
    attempts: u32,
    mut write: impl FnMut() -> Result<(), Error>,
) -> StepOutcome {
    let allowed = attempts.max(1);
    let mut made = 0;
    let mut last_error = None;
    while made < allowed {
        made += 1;
        match write() {
            Ok(()) => {
                debug!("Applied {} to {} after {} attempts", setting, device, made);
                return StepOutcome {
                    setting,
                    attempts: made,
                    error: None,
                };
            }
            Err(e) => {
                warn!(
                    "Attempt {} of {} to apply {} to {} failed: {}",
                    made, allowed, setting, device, e
                );
                last_error = Some(e);
            }
        }
    }

    StepOutcome {
        setting,
        attempts: made,
        error: last_error,
    }
}
