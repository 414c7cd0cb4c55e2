//! The controller for a single swerve module.
//!
//! A [SwerveModule] owns the drive motor, the steering motor and the absolute angle sensor of
//! one module. It turns desired module states into setpoints for the motors and turns the motor
//! readings back into module states and positions.
//!
//! All angles handled by the module are continuous. The steering motor position controller
//! does not know that 0 and 360 degrees are the same angle, so the module never wraps the angle
//! it sends to the steering motor.

use tracing::{info, trace, warn};

use crate::{
    hardware::{
        actuator_interface::{ControlRequest, MotorController},
        sensor_interface::{AbsoluteEncoder, AbsoluteEncoderConfiguration},
    },
    units::{
        angle_to_physical, angle_to_raw, position_to_physical, velocity_to_physical,
        velocity_to_raw,
    },
    Error,
};

use super::{
    angle_optimizer::optimize,
    calibration::{AbsoluteCalibration, CalibrationOffset, CalibrationState},
    device_setup::{commit_motor, configure_absolute_encoder, configure_motor},
    feedforward::SimpleMotorFeedforward,
    module_config::ModuleConfig,
    module_state::{ModulePosition, ModuleState},
};

#[cfg(test)]
#[path = "swerve_module_tests.rs"]
mod swerve_module_tests;

/// Below this fraction of the maximum speed the steering angle is held.
const ANTI_JITTER_FRACTION_OF_MAX_SPEED: f64 = 0.01;

/// The controller for a single swerve module.
///
/// The module is generic over its hardware so that each hardware family only needs an
/// implementation of [MotorController] or [AbsoluteEncoder].
///
/// The module must be calibrated before it accepts commands. Until then [SwerveModule::state]
/// and [SwerveModule::position] report angles in an arbitrary frame. Use
/// [SwerveModule::is_calibrated] to check before trusting them.
pub struct SwerveModule<D, S, E>
where
    D: MotorController,
    S: MotorController,
    E: AbsoluteEncoder,
{
    /// The number of the module on the robot.
    module_number: usize,

    /// The configuration the module was created with.
    config: ModuleConfig,

    /// The motor that drives the wheel.
    drive: D,

    /// The motor that turns the module.
    steering: S,

    /// The absolute angle sensor.
    encoder: E,

    /// The calibration of the steering encoder.
    calibration: AbsoluteCalibration,

    /// The feedforward model for closed loop driving.
    feedforward: SimpleMotorFeedforward,

    /// The angle most recently sent to the steering motor.
    last_angle_in_degrees: f64,
}

impl<D, S, E> SwerveModule<D, S, E>
where
    D: MotorController,
    S: MotorController,
    E: AbsoluteEncoder,
{
    /// Returns the angle reported by the absolute sensor, in degrees.
    ///
    /// The value is in the reporting range of the sensor and does not include the mounting
    /// offset.
    pub fn absolute_angle(&self) -> Result<f64, Error> {
        self.encoder.absolute_position_in_degrees()
    }

    /// Returns the current calibration state.
    pub fn calibration_state(&self) -> CalibrationState {
        self.calibration.state()
    }

    /// Returns the configuration of the module.
    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Returns a value indicating if the steering encoder reports the true module angle.
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_calibrated()
    }

    /// Returns the angle most recently sent to the steering motor.
    pub fn last_commanded_angle_in_degrees(&self) -> f64 {
        self.last_angle_in_degrees
    }

    /// Returns the number of the module.
    pub fn module_number(&self) -> usize {
        self.module_number
    }

    /// Creates a new [SwerveModule] instance and prepares the hardware.
    ///
    /// Configures the absolute sensor and both motors, zeroes the drive encoder and calibrates
    /// the steering encoder against the absolute sensor. A failed calibration does not fail
    /// the construction. The module then starts uncalibrated and tries again when it is given
    /// its first command.
    ///
    /// ## Parameters
    ///
    /// * 'module_number' - The number of the module on the robot
    /// * 'config' - The configuration of the module
    /// * 'drive' - The motor that drives the wheel
    /// * 'steering' - The motor that turns the module
    /// * 'encoder' - The absolute angle sensor
    ///
    /// ## Errors
    ///
    /// * [Error::InvalidConfiguration] - Returned when the configuration is not valid. No
    ///   hardware is touched in that case.
    /// * [Error::ConfigurationFailed] - Returned when one or more configuration steps failed
    ///   after all attempts.
    /// * [Error::HardwareFault] - Returned when the encoders could not be read or written.
    pub fn new(
        module_number: usize,
        config: ModuleConfig,
        mut drive: D,
        mut steering: S,
        mut encoder: E,
    ) -> Result<Self, Error> {
        config.validate()?;

        let ids = config.hardware_ids;
        let attempts = config.configuration_attempts;
        let reports = [
            configure_absolute_encoder(
                ids.absolute_encoder(),
                &mut encoder,
                &AbsoluteEncoderConfiguration::for_steering(config.absolute_encoder_inverted),
                attempts,
            ),
            configure_motor(
                ids.drive_motor(),
                &mut drive,
                &config.drive.settings(config.voltage_compensation_in_volts),
                attempts,
            ),
            configure_motor(
                ids.steering_motor(),
                &mut steering,
                &config.steering.settings(config.voltage_compensation_in_volts),
                attempts,
            ),
        ];

        let failures: Vec<String> = reports.iter().flat_map(|r| r.failures()).collect();
        if !failures.is_empty() {
            warn!(
                "Failed to configure swerve module {}: {} steps failed, nothing was committed",
                module_number,
                failures.len()
            );
            return Err(Error::ConfigurationFailed { failures });
        }

        // Only burn the settings once every device of the module accepted its configuration
        let commits = [
            commit_motor(ids.drive_motor(), &mut drive, attempts),
            commit_motor(ids.steering_motor(), &mut steering, attempts),
        ];
        let failures: Vec<String> = commits.iter().flat_map(|r| r.failures()).collect();
        if !failures.is_empty() {
            warn!(
                "Failed to commit the configuration of swerve module {}",
                module_number
            );
            return Err(Error::ConfigurationFailed { failures });
        }

        drive.set_position(0.0)?;

        let calibration = AbsoluteCalibration::new(
            ids.absolute_encoder(),
            config.mounting_offset_in_degrees,
        );
        let feedforward = config.drive_feedforward;
        let mut module = Self {
            module_number,
            config,
            drive,
            steering,
            encoder,
            calibration,
            feedforward,
            last_angle_in_degrees: 0.0,
        };

        if let Err(e) = module.reset_to_absolute() {
            warn!(
                "Swerve module {} starts uncalibrated: {}",
                module.module_number, e
            );
            module.last_angle_in_degrees = module.steering_angle()?;
        }

        info!(
            "Configured swerve module {} at {} degrees",
            module.module_number, module.last_angle_in_degrees
        );
        Ok(module)
    }

    /// Returns the distance travelled by the wheel and the angle of the module.
    pub fn position(&self) -> Result<ModulePosition, Error> {
        let geometry = &self.config.geometry;
        let distance = position_to_physical(
            self.drive.position()?,
            geometry.drive_gear_ratio,
            geometry.wheel_circumference_in_meters,
        );

        Ok(ModulePosition::new(distance, self.steering_angle()?))
    }

    /// Calibrates the steering encoder against the absolute sensor.
    ///
    /// On success the last commanded angle is set to the calibrated steering angle. On failure,
    /// including a failure to read the steering angle after seeding it, the module is
    /// uncalibrated and refuses commands until a calibration succeeds.
    ///
    /// ## Errors
    ///
    /// * [Error::AbsoluteSensorUnreadable] - Returned when the absolute sensor could not be read
    /// * [Error::AbsoluteSensorOutOfRange] - Returned when the absolute sensor reported an
    ///   implausible angle
    /// * [Error::HardwareFault] - Returned when the steering encoder could not be accessed
    pub fn reset_to_absolute(&mut self) -> Result<CalibrationOffset, Error> {
        let offset = self.calibration.calibrate(
            &self.encoder,
            &mut self.steering,
            self.config.geometry.steering_gear_ratio,
        )?;

        match self.steering_angle() {
            Ok(angle) => {
                self.last_angle_in_degrees = angle;
                Ok(offset)
            }
            Err(e) => {
                // The last commanded angle is in the old frame and cannot be re-seeded
                self.calibration.invalidate();
                Err(e)
            }
        }
    }

    /// Sends the setpoints for the desired state to the motors.
    ///
    /// The desired state is first optimized against the current module angle so that the
    /// module turns at most a quarter turn. When the optimized speed is at most 1% of the
    /// maximum speed the steering angle is held at the last commanded angle.
    ///
    /// Returns the state that was commanded.
    ///
    /// ## Parameters
    ///
    /// * 'desired' - The desired state of the module
    /// * 'is_open_loop' - Set to true to drive the wheel with a fraction of the available
    ///   output instead of with the velocity controller
    ///
    /// ## Errors
    ///
    /// * [Error::InvalidModuleState] - Returned when the desired state contains a NaN or
    ///   infinite value
    /// * [Error::ModuleNotCalibrated] - Returned when the module is not calibrated and a new
    ///   calibration attempt failed. The error of that attempt is the cause.
    /// * [Error::HardwareFault] - Returned when a motor could not be read or written
    pub fn set_desired_state(
        &mut self,
        desired: ModuleState,
        is_open_loop: bool,
    ) -> Result<ModuleState, Error> {
        if !desired.is_finite() {
            return Err(Error::InvalidModuleState {
                speed: desired.speed(),
                angle_in_degrees: desired.angle_in_degrees(),
            });
        }

        if !self.calibration.is_calibrated() {
            if let Err(e) = self.reset_to_absolute() {
                warn!(
                    "Swerve module {} is still not calibrated: {}",
                    self.module_number, e
                );
                return Err(Error::ModuleNotCalibrated {
                    module_number: self.module_number,
                    cause: Box::new(e),
                });
            }
        }

        let optimized = optimize(&desired, self.steering_angle()?);
        let speed = optimized.speed();
        let max_speed = self.config.max_speed_in_meters_per_second;

        let angle = if speed.abs() <= ANTI_JITTER_FRACTION_OF_MAX_SPEED * max_speed {
            self.last_angle_in_degrees
        } else {
            optimized.angle_in_degrees()
        };

        let geometry = self.config.geometry;
        self.steering.set_control(ControlRequest::Position {
            rotations: angle_to_raw(angle, geometry.steering_gear_ratio),
        })?;
        self.last_angle_in_degrees = angle;

        let request = if is_open_loop {
            ControlRequest::DutyCycle((speed / max_speed).clamp(-1.0, 1.0))
        } else {
            ControlRequest::Velocity {
                rotations_per_minute: velocity_to_raw(
                    speed,
                    geometry.drive_gear_ratio,
                    geometry.wheel_circumference_in_meters,
                ),
                feedforward_in_volts: self.feedforward.calculate(speed, 0.0),
            }
        };
        self.drive.set_control(request)?;

        trace!(
            "Swerve module {}: speed {} m/s, angle {} degrees, request {:?}",
            self.module_number,
            speed,
            angle,
            request
        );

        Ok(ModuleState::new(speed, angle))
    }

    /// Returns the speed of the wheel and the angle of the module.
    pub fn state(&self) -> Result<ModuleState, Error> {
        let geometry = &self.config.geometry;
        let speed = velocity_to_physical(
            self.drive.velocity()?,
            geometry.drive_gear_ratio,
            geometry.wheel_circumference_in_meters,
        );

        Ok(ModuleState::new(speed, self.steering_angle()?))
    }

    fn steering_angle(&self) -> Result<f64, Error> {
        Ok(angle_to_physical(
            self.steering.position()?,
            self.config.geometry.steering_gear_ratio,
        ))
    }
}
