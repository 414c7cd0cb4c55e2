//! Feedforward model for the drive motor.
//!
//! Computes the voltage needed to keep an idealized DC motor in a given state, using the
//! model V = Ks * sign(v) + Kv * v + Ka * a.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "feedforward_tests.rs"]
mod feedforward_tests;

/// A feedforward model for a permanent magnet DC motor.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SimpleMotorFeedforward {
    /// The voltage needed to overcome static friction.
    pub ks: f64,

    /// The voltage needed per unit of velocity, in volts per (meter per second).
    pub kv: f64,

    /// The voltage needed per unit of acceleration, in volts per (meter per second squared).
    pub ka: f64,
}

impl SimpleMotorFeedforward {
    /// Returns the voltage needed to reach the given velocity and acceleration.
    ///
    /// The static friction term is zero when the velocity is zero.
    ///
    /// ## Parameters
    ///
    /// * 'velocity' - The target velocity
    /// * 'acceleration' - The target acceleration
    ///
    /// ## Example
    ///
    /// ```
    /// use swerve_module_control::module_elements::feedforward::SimpleMotorFeedforward;
    ///
    /// let feedforward = SimpleMotorFeedforward::new(0.5, 2.0, 0.25);
    /// assert_eq!(feedforward.calculate(-1.0, 0.0), -2.5);
    /// assert_eq!(feedforward.calculate(0.0, 0.0), 0.0);
    /// ```
    pub fn calculate(&self, velocity: f64, acceleration: f64) -> f64 {
        // f64::signum() returns 1.0 for +0.0, which would add Ks while standing still
        let direction = if velocity == 0.0 {
            0.0
        } else {
            velocity.signum()
        };

        self.ks * direction + self.kv * velocity + self.ka * acceleration
    }

    /// Returns a value indicating if all the gains are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.ks.is_finite() && self.kv.is_finite() && self.ka.is_finite()
    }

    /// Creates a new [SimpleMotorFeedforward] instance.
    pub fn new(ks: f64, kv: f64, ka: f64) -> Self {
        Self { ks, kv, ka }
    }
}
