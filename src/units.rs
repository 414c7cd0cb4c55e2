//! Conversions between the raw units reported by a motor's built-in encoder and the
//! physical units used to describe a swerve module.
//!
//! Motor encoders report the position of the motor shaft in rotations and the velocity of the
//! motor shaft in rotations per minute. A gear ratio is the number of motor shaft rotations for
//! one rotation of the output shaft, i.e. the wheel for the drive motor and the module for the
//! steering motor.
//!
//! The conversions are plain arithmetic and are applied on every sensor read and every setpoint.

use crate::number_space::{unsigned_full_turn, FULL_TURN_IN_DEGREES};

#[cfg(test)]
#[path = "units_tests.rs"]
mod units_tests;

/// The number of seconds in a minute.
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Converts a drive motor velocity into the linear velocity of the wheel.
///
/// ## Parameters
///
/// * 'raw_rotations_per_minute' - The velocity of the motor shaft in rotations per minute
/// * 'gear_ratio' - The number of motor rotations for one wheel rotation
/// * 'wheel_circumference_in_meters' - The circumference of the wheel
///
/// ## Example
///
/// ```
/// use swerve_module_control::units::velocity_to_physical;
///
/// // 600 rpm with a direct drive and a 0.5 meter wheel circumference
/// assert_eq!(velocity_to_physical(600.0, 1.0, 0.5), 5.0);
/// ```
pub fn velocity_to_physical(
    raw_rotations_per_minute: f64,
    gear_ratio: f64,
    wheel_circumference_in_meters: f64,
) -> f64 {
    raw_rotations_per_minute * wheel_circumference_in_meters / gear_ratio / SECONDS_PER_MINUTE
}

/// Converts a linear wheel velocity into the drive motor velocity in rotations per minute.
pub fn velocity_to_raw(
    velocity_in_meters_per_second: f64,
    gear_ratio: f64,
    wheel_circumference_in_meters: f64,
) -> f64 {
    velocity_in_meters_per_second * SECONDS_PER_MINUTE * gear_ratio / wheel_circumference_in_meters
}

/// Converts a drive motor position into the distance travelled by the wheel.
///
/// ## Parameters
///
/// * 'raw_rotations' - The number of motor shaft rotations
/// * 'gear_ratio' - The number of motor rotations for one wheel rotation
/// * 'wheel_circumference_in_meters' - The circumference of the wheel
pub fn position_to_physical(
    raw_rotations: f64,
    gear_ratio: f64,
    wheel_circumference_in_meters: f64,
) -> f64 {
    raw_rotations * wheel_circumference_in_meters / gear_ratio
}

/// Converts a wheel distance into the number of drive motor shaft rotations.
pub fn position_to_raw(
    distance_in_meters: f64,
    gear_ratio: f64,
    wheel_circumference_in_meters: f64,
) -> f64 {
    distance_in_meters * gear_ratio / wheel_circumference_in_meters
}

/// Converts a steering motor position into the angle of the module.
///
/// The angle is continuous, i.e. it is not wrapped to a single turn. Use [bounded_angle]
/// when a value in [0, 360) is needed.
///
/// ## Parameters
///
/// * 'raw_rotations' - The number of motor shaft rotations
/// * 'gear_ratio' - The number of motor rotations for one rotation of the module
///
/// ## Example
///
/// ```
/// use swerve_module_control::units::angle_to_physical;
///
/// assert_eq!(angle_to_physical(2.0, 4.0), 180.0);
/// assert_eq!(angle_to_physical(-1.0, 4.0), -90.0);
/// ```
pub fn angle_to_physical(raw_rotations: f64, gear_ratio: f64) -> f64 {
    raw_rotations * FULL_TURN_IN_DEGREES / gear_ratio
}

/// Converts a module angle into the number of steering motor shaft rotations.
pub fn angle_to_raw(angle_in_degrees: f64, gear_ratio: f64) -> f64 {
    angle_in_degrees * gear_ratio / FULL_TURN_IN_DEGREES
}

/// Returns the angle wrapped into [0, 360).
pub fn bounded_angle(angle_in_degrees: f64) -> f64 {
    unsigned_full_turn().normalize_value(angle_in_degrees)
}
