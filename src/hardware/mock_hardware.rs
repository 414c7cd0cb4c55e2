//! Test doubles for the motors and sensors of a module.
//!
//! The doubles share their state with the test through an `Rc<RefCell<_>>` so that the
//! test can inspect the commands the module sent after the module has taken ownership
//! of the hardware.

use std::{cell::RefCell, rc::Rc};

use crate::Error;

use super::{
    actuator_interface::{ControlRequest, MotorController, MotorSetting},
    sensor_interface::{AbsoluteEncoder, AbsoluteEncoderConfiguration},
};

#[derive(Default)]
pub(crate) struct MockMotorState {
    pub position: f64,
    pub velocity: f64,
    pub applied_settings: Vec<MotorSetting>,
    pub setting_attempts: usize,
    pub commits: usize,
    pub requests: Vec<ControlRequest>,
    pub position_resets: Vec<f64>,

    /// The number of upcoming setting writes that fail before writes succeed again.
    pub transient_rejections: usize,

    /// Settings for which this returns true are always rejected.
    pub permanently_rejects: Option<fn(&MotorSetting) -> bool>,

    pub fail_reads: bool,
    pub fail_writes: bool,
}

#[derive(Clone, Default)]
pub(crate) struct MockMotor {
    pub state: Rc<RefCell<MockMotorState>>,
}

impl MockMotor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_request(&self) -> Option<ControlRequest> {
        self.state.borrow().requests.last().copied()
    }
}

impl MotorController for MockMotor {
    fn apply_setting(&mut self, setting: &MotorSetting) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        state.setting_attempts += 1;

        let permanent = state.permanently_rejects.map_or(false, |f| f(setting));
        if permanent || state.transient_rejections > 0 {
            state.transient_rejections = state.transient_rejections.saturating_sub(1);
            return Err(Error::ConfigurationRejected {
                setting: setting.to_string(),
            });
        }

        state.applied_settings.push(*setting);
        Ok(())
    }

    fn commit_configuration(&mut self) -> Result<(), Error> {
        self.state.borrow_mut().commits += 1;
        Ok(())
    }

    fn position(&self) -> Result<f64, Error> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(Error::HardwareFault {
                reason: "mock read failure".to_string(),
            });
        }

        Ok(state.position)
    }

    fn set_control(&mut self, request: ControlRequest) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(Error::HardwareFault {
                reason: "mock write failure".to_string(),
            });
        }

        state.requests.push(request);
        Ok(())
    }

    fn set_position(&mut self, rotations: f64) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(Error::HardwareFault {
                reason: "mock write failure".to_string(),
            });
        }

        state.position = rotations;
        state.position_resets.push(rotations);
        Ok(())
    }

    fn velocity(&self) -> Result<f64, Error> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(Error::HardwareFault {
                reason: "mock read failure".to_string(),
            });
        }

        Ok(state.velocity)
    }
}

#[derive(Default)]
pub(crate) struct MockEncoderState {
    pub reading_in_degrees: f64,
    pub fail_reads: bool,
    pub reject_configuration: bool,
    pub configurations: Vec<AbsoluteEncoderConfiguration>,
    pub factory_resets: usize,
}

#[derive(Clone, Default)]
pub(crate) struct MockEncoder {
    pub state: Rc<RefCell<MockEncoderState>>,
}

impl MockEncoder {
    pub fn with_reading(reading_in_degrees: f64) -> Self {
        let encoder = Self::default();
        encoder.state.borrow_mut().reading_in_degrees = reading_in_degrees;
        encoder
    }
}

impl AbsoluteEncoder for MockEncoder {
    fn absolute_position_in_degrees(&self) -> Result<f64, Error> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(Error::HardwareFault {
                reason: "mock sensor is not responding".to_string(),
            });
        }

        Ok(state.reading_in_degrees)
    }

    fn apply_configuration(
        &mut self,
        configuration: &AbsoluteEncoderConfiguration,
    ) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if state.reject_configuration {
            return Err(Error::ConfigurationRejected {
                setting: format!("{:?}", configuration),
            });
        }

        state.configurations.push(*configuration);
        Ok(())
    }

    fn restore_factory_defaults(&mut self) -> Result<(), Error> {
        self.state.borrow_mut().factory_resets += 1;
        Ok(())
    }
}
