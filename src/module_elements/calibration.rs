//! Calibration of the relative steering encoder against the absolute angle sensor.
//!
//! The built-in encoder of the steering motor only knows how far the motor has turned since it
//! was powered on. The absolute sensor knows the true angle of the module but is slower and
//! noisier. Calibration reads the absolute sensor once, removes the angle at which the module
//! was mounted and writes the result into the position register of the steering encoder.
//! From then on the steering encoder reports the module angle directly.
//!
//! The calibration is a two state machine: Uncalibrated and Calibrated. It starts Uncalibrated
//! and only moves to Calibrated when a calibration succeeds. A failed calibration always leaves
//! it Uncalibrated, even if it was Calibrated before, because the steering encoder can no longer
//! be trusted. The owner can also invalidate a calibration. There is no automatic re-calibration.

use tracing::{info, warn};

use crate::{
    hardware::{
        actuator_interface::MotorController, sensor_interface::AbsoluteEncoder, Device,
    },
    number_space::FULL_TURN_IN_DEGREES,
    units::angle_to_raw,
    Error,
};

#[cfg(test)]
#[path = "calibration_tests.rs"]
mod calibration_tests;

/// The values used for a calibration of the steering encoder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationOffset {
    /// The angle reported by the absolute sensor.
    absolute_reading_in_degrees: f64,

    /// The angle reported by the absolute sensor when the module points straight forward.
    mounting_offset_in_degrees: f64,
}

impl CalibrationOffset {
    /// Returns the angle reported by the absolute sensor.
    pub fn absolute_reading_in_degrees(&self) -> f64 {
        self.absolute_reading_in_degrees
    }

    /// Returns the angle reported by the absolute sensor when the module points straight forward.
    pub fn mounting_offset_in_degrees(&self) -> f64 {
        self.mounting_offset_in_degrees
    }

    /// Creates a new [CalibrationOffset] instance
    pub fn new(absolute_reading_in_degrees: f64, mounting_offset_in_degrees: f64) -> Self {
        Self {
            absolute_reading_in_degrees,
            mounting_offset_in_degrees,
        }
    }

    /// Returns the module angle, i.e. the absolute reading minus the mounting offset.
    ///
    /// The value is not wrapped, so it may be negative.
    pub fn offset_in_degrees(&self) -> f64 {
        self.absolute_reading_in_degrees - self.mounting_offset_in_degrees
    }
}

/// The state of the steering encoder calibration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CalibrationState {
    /// The steering encoder does not report the true module angle.
    Uncalibrated,

    /// The steering encoder was seeded with the given offset.
    Calibrated(CalibrationOffset),
}

/// Performs the calibration of the steering encoder and tracks whether it succeeded.
#[derive(Clone, Debug)]
pub struct AbsoluteCalibration {
    /// The absolute sensor that is used for the calibration.
    device: Device,

    /// The angle reported by the absolute sensor when the module points straight forward.
    mounting_offset_in_degrees: f64,

    /// The current calibration state.
    state: CalibrationState,
}

impl AbsoluteCalibration {
    /// Reads the absolute sensor and seeds the steering encoder with the module angle.
    ///
    /// ## Parameters
    ///
    /// * 'encoder' - The absolute sensor
    /// * 'steering' - The steering motor whose encoder is seeded
    /// * 'steering_gear_ratio' - The number of steering motor rotations per module rotation
    ///
    /// ## Errors
    ///
    /// * [Error::AbsoluteSensorUnreadable] - Returned when the absolute sensor could not be read
    /// * [Error::AbsoluteSensorOutOfRange] - Returned when the absolute sensor reported a value
    ///   outside of [0, 360] degrees
    /// * [Error::HardwareFault] - Returned when the steering encoder could not be written
    pub fn calibrate(
        &mut self,
        encoder: &impl AbsoluteEncoder,
        steering: &mut impl MotorController,
        steering_gear_ratio: f64,
    ) -> Result<CalibrationOffset, Error> {
        self.state = CalibrationState::Uncalibrated;

        let reading = encoder.absolute_position_in_degrees().map_err(|e| {
            warn!("Failed to read {}: {}", self.device, e);
            Error::AbsoluteSensorUnreadable {
                device: self.device,
                reason: e.to_string(),
            }
        })?;

        if !is_plausible_reading(reading) {
            warn!(
                "{} reported an implausible angle of {} degrees",
                self.device, reading
            );
            return Err(Error::AbsoluteSensorOutOfRange {
                device: self.device,
                reading_in_degrees: reading,
            });
        }

        let offset = CalibrationOffset::new(reading, self.mounting_offset_in_degrees);
        steering.set_position(angle_to_raw(offset.offset_in_degrees(), steering_gear_ratio))?;

        info!(
            "Calibrated against {}: reading {} degrees, mounting offset {} degrees",
            self.device, reading, self.mounting_offset_in_degrees
        );
        self.state = CalibrationState::Calibrated(offset);
        Ok(offset)
    }

    /// Marks the steering encoder as no longer trusted.
    pub fn invalidate(&mut self) {
        if self.is_calibrated() {
            warn!("Calibration against {} was invalidated", self.device);
        }

        self.state = CalibrationState::Uncalibrated;
    }

    /// Returns a value indicating if the last calibration succeeded.
    pub fn is_calibrated(&self) -> bool {
        matches!(self.state, CalibrationState::Calibrated(_))
    }

    /// Creates a new, uncalibrated, [AbsoluteCalibration] instance.
    ///
    /// ## Parameters
    ///
    /// * 'device' - The absolute sensor that is used for the calibration
    /// * 'mounting_offset_in_degrees' - The angle reported by the absolute sensor when the
    ///   module points straight forward
    pub fn new(device: Device, mounting_offset_in_degrees: f64) -> Self {
        Self {
            device,
            mounting_offset_in_degrees,
            state: CalibrationState::Uncalibrated,
        }
    }

    /// Returns the current calibration state.
    pub fn state(&self) -> CalibrationState {
        self.state
    }
}

/// Returns true if the reading can come from a sensor that reports in [0, 360).
///
/// 360 itself is accepted because some sensors round up to it.
fn is_plausible_reading(reading_in_degrees: f64) -> bool {
    reading_in_degrees.is_finite()
        && (0.0..=FULL_TURN_IN_DEGREES).contains(&reading_in_degrees)
}
