//! A [MotorController] that forwards all commands over a channel.
//!
//! The motor controller is expected to be serviced by a separate task that owns the
//! physical bus. That task receives the [MotorCommand]s, writes them to the device and
//! sends the [MotorTelemetry] it reads from the device back over the telemetry channel.

use std::sync::Mutex;

use crossbeam_channel::{Receiver, Sender};

use crate::Error;

use super::actuator_interface::{ControlRequest, MotorController, MotorSetting};

#[cfg(test)]
#[path = "channel_motor_tests.rs"]
mod channel_motor_tests;

/// A command for the task that services the motor controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotorCommand {
    /// Apply the given configuration setting.
    Configure(MotorSetting),

    /// Store the configuration so that it survives a power cycle.
    CommitConfiguration,

    /// Use the given setpoint.
    Control(ControlRequest),

    /// Set the position register of the encoder to the given number of rotations.
    SetPosition(f64),
}

/// The encoder readings of a motor controller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotorTelemetry {
    /// The position of the motor shaft in rotations.
    pub position_in_rotations: f64,

    /// The velocity of the motor shaft in rotations per minute.
    pub velocity_in_rotations_per_minute: f64,
}

/// A [MotorController] that sends its commands over a channel and reads the latest
/// telemetry from a second channel.
pub struct ChannelMotorController {
    /// The channel sender that is used to send commands to the motor task.
    command_sender: Sender<MotorCommand>,

    /// The channel on which the motor task publishes the encoder readings.
    telemetry_receiver: Receiver<MotorTelemetry>,

    /// The most recent telemetry. None until the first telemetry has been received.
    latest: Mutex<Option<MotorTelemetry>>,
}

impl ChannelMotorController {
    /// Creates a new [ChannelMotorController] instance.
    ///
    /// ## Parameters
    ///
    /// * 'command_sender' - The channel on which commands are sent to the motor task
    /// * 'telemetry_receiver' - The channel on which the motor task publishes encoder readings
    pub fn new(
        command_sender: Sender<MotorCommand>,
        telemetry_receiver: Receiver<MotorTelemetry>,
    ) -> Self {
        Self {
            command_sender,
            telemetry_receiver,
            latest: Mutex::new(None),
        }
    }

    /// Returns the most recent telemetry, draining any telemetry that is waiting in the channel.
    #[cfg_attr(test, mutants::skip)] // Cannot easily check mutations as this is a threaded lock situation
    fn latest_telemetry(&self) -> Result<MotorTelemetry, Error> {
        let mut latest = self.latest.lock().unwrap_or_else(|err| err.into_inner());
        if let Some(t) = self.telemetry_receiver.try_iter().last() {
            *latest = Some(t);
        }

        (*latest).ok_or_else(|| Error::HardwareFault {
            reason: "no telemetry has been received from the motor".to_string(),
        })
    }

    fn send(&self, command: MotorCommand) -> Result<(), Error> {
        // The SendError carries the command, which we don't want to hand back to the caller
        self.command_sender
            .send(command)
            .map_err(|_source| Error::HardwareFault {
                reason: "the motor command channel is disconnected".to_string(),
            })
    }
}

impl MotorController for ChannelMotorController {
    fn apply_setting(&mut self, setting: &MotorSetting) -> Result<(), Error> {
        self.send(MotorCommand::Configure(*setting))
    }

    fn commit_configuration(&mut self) -> Result<(), Error> {
        self.send(MotorCommand::CommitConfiguration)
    }

    fn position(&self) -> Result<f64, Error> {
        Ok(self.latest_telemetry()?.position_in_rotations)
    }

    fn set_control(&mut self, request: ControlRequest) -> Result<(), Error> {
        self.send(MotorCommand::Control(request))
    }

    fn set_position(&mut self, rotations: f64) -> Result<(), Error> {
        self.send(MotorCommand::SetPosition(rotations))?;

        // Telemetry that is still queued was read before the reset, so it is dropped. Until
        // the motor task reports again the new position is the best known position.
        let mut latest = self.latest.lock().unwrap_or_else(|err| err.into_inner());
        let previous = self
            .telemetry_receiver
            .try_iter()
            .last()
            .or(*latest)
            .unwrap_or_default();
        *latest = Some(MotorTelemetry {
            position_in_rotations: rotations,
            velocity_in_rotations_per_minute: previous.velocity_in_rotations_per_minute,
        });

        Ok(())
    }

    fn velocity(&self) -> Result<f64, Error> {
        Ok(self.latest_telemetry()?.velocity_in_rotations_per_minute)
    }
}
