use float_cmp::{ApproxEq, F64Margin};
use nalgebra::Vector2;

use crate::units::bounded_angle;

#[cfg(test)]
#[path = "module_state_tests.rs"]
mod module_state_tests;

/// Stores the speed of the wheel and the angle of a swerve module.
///
/// The angle is continuous, i.e. it is not limited to a single turn. An angle of 370 degrees
/// points the wheel in the same direction as an angle of 10 degrees. The steering motor uses
/// the continuous angle so that it never has to unwind, use [ModuleState::bounded_angle_in_degrees]
/// to get the angle in [0, 360).
///
/// A negative speed means that the wheel is driving backwards. A state with a negative speed and
/// an angle turned by 180 degrees describes the same motion as the original state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModuleState {
    /// The linear speed of the wheel in meters per second.
    speed_in_meters_per_second: f64,

    /// The angle of the module in degrees.
    angle_in_degrees: f64,
}

impl ModuleState {
    /// Returns the angle of the module in degrees.
    pub fn angle_in_degrees(&self) -> f64 {
        self.angle_in_degrees
    }

    /// Returns the angle of the module in [0, 360) degrees.
    pub fn bounded_angle_in_degrees(&self) -> f64 {
        bounded_angle(self.angle_in_degrees)
    }

    /// Returns a value indicating if both the speed and the angle are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.speed_in_meters_per_second.is_finite() && self.angle_in_degrees.is_finite()
    }

    /// Creates a new [ModuleState] instance
    ///
    /// ## Parameters
    ///
    /// * 'speed_in_meters_per_second' - The linear speed of the wheel
    /// * 'angle_in_degrees' - The angle of the module
    pub fn new(speed_in_meters_per_second: f64, angle_in_degrees: f64) -> Self {
        Self {
            speed_in_meters_per_second,
            angle_in_degrees,
        }
    }

    /// Returns the linear speed of the wheel in meters per second.
    pub fn speed(&self) -> f64 {
        self.speed_in_meters_per_second
    }

    /// Returns the velocity vector of the wheel, in the reference frame of the module mount.
    ///
    /// Two states describe the same motion if their velocity vectors are equal.
    ///
    /// ## Example
    ///
    /// ```
    /// use swerve_module_control::module_elements::module_state::ModuleState;
    ///
    /// let v = ModuleState::new(2.0, 90.0).velocity_vector();
    /// assert!(v.x.abs() < 1e-12);
    /// assert!((v.y - 2.0).abs() < 1e-12);
    /// ```
    pub fn velocity_vector(&self) -> Vector2<f64> {
        let angle = self.angle_in_degrees.to_radians();
        Vector2::new(angle.cos(), angle.sin()) * self.speed_in_meters_per_second
    }
}

impl ApproxEq for ModuleState {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        let margin = margin.into();
        self.speed_in_meters_per_second
            .approx_eq(other.speed_in_meters_per_second, margin)
            && self.angle_in_degrees.approx_eq(other.angle_in_degrees, margin)
    }
}

/// Stores the distance travelled by the wheel and the angle of a swerve module.
///
/// Used for odometry. The distance is the integral of the signed wheel speed, so driving
/// backwards reduces the distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModulePosition {
    /// The distance travelled by the wheel in meters.
    distance_in_meters: f64,

    /// The angle of the module in degrees.
    angle_in_degrees: f64,
}

impl ModulePosition {
    /// Returns the angle of the module in degrees.
    pub fn angle_in_degrees(&self) -> f64 {
        self.angle_in_degrees
    }

    /// Returns the distance travelled by the wheel in meters.
    pub fn distance(&self) -> f64 {
        self.distance_in_meters
    }

    /// Creates a new [ModulePosition] instance
    pub fn new(distance_in_meters: f64, angle_in_degrees: f64) -> Self {
        Self {
            distance_in_meters,
            angle_in_degrees,
        }
    }
}
