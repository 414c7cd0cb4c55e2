//! Defines a periodic number space for angles and how it behaves at its boundaries.
//!
//! A periodic number space has lower and upper boundaries at specific non-infinity numbers and
//! wraps around, i.e. in order to go from the lower boundary to the upper boundary you can pass
//! through all the numbers between the lower and upper boundary, or you can go backwards from
//! the lower boundary and end up directly at the upper boundary. The position of a wheel around
//! its steering axis is an example of this kind of space.
//!
//! All angles in this space are in degrees and the space is always one full turn (360 degrees)
//! in size. The start of the space can be chosen, e.g. [0, 360) or [-180, 180).
//!

#[cfg(test)]
#[path = "number_space_tests.rs"]
mod number_space_tests;

/// The size of one full turn in degrees.
pub const FULL_TURN_IN_DEGREES: f64 = 360.0;

/// Defines a periodic number space that wraps around after one full turn.
///
/// The periodic number space is used for calculations of numbers in circular
/// cases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicBoundedCircularSpace {
    range_start_in_degrees: f64,
    range_size: f64,
}

impl PeriodicBoundedCircularSpace {
    /// Returns all possible distances between two values in the space.
    ///
    /// There are always two distances, one going in the positive direction and one
    /// going in the negative direction. The positive distance is listed first.
    ///
    /// ## Parameters
    ///
    /// * `start` - The starting value
    /// * `end` - The ending value
    ///
    /// ## Example
    ///
    /// ```
    /// use swerve_module_control::number_space::PeriodicBoundedCircularSpace;
    ///
    /// let space = PeriodicBoundedCircularSpace::new_with_full_turn_range(0.0);
    /// let distances = space.distance_between_values(0.0, 180.0);
    /// assert!(distances.len() == 2);
    /// assert_eq!(180.0, distances[0]);
    /// assert_eq!(-180.0, distances[1]);
    /// ```
    pub fn distance_between_values(&self, start: f64, end: f64) -> Vec<f64> {
        let diff = self.wrap(end - start);
        vec![diff, diff - self.range_size]
    }

    /// Creates a new space of one full turn that starts at the given angle.
    ///
    /// ## Parameters
    ///
    /// * `start_angle_in_degrees` - The lowest angle in the space. The space runs from this
    ///   angle (inclusive) to this angle + 360 degrees (exclusive).
    pub fn new_with_full_turn_range(start_angle_in_degrees: f64) -> PeriodicBoundedCircularSpace {
        PeriodicBoundedCircularSpace {
            range_start_in_degrees: start_angle_in_degrees,
            range_size: FULL_TURN_IN_DEGREES,
        }
    }

    /// Returns the value in the space that is equivalent to the given value.
    ///
    /// ## Parameters
    ///
    /// * `value` - The value that should be normalized.
    ///
    /// ## Example
    ///
    /// ```
    /// use swerve_module_control::number_space::PeriodicBoundedCircularSpace;
    ///
    /// let space = PeriodicBoundedCircularSpace::new_with_full_turn_range(0.0);
    /// assert_eq!(180.0, space.normalize_value(900.0));
    /// assert_eq!(270.0, space.normalize_value(-90.0));
    /// ```
    pub fn normalize_value(&self, value: f64) -> f64 {
        self.range_start_in_degrees + self.wrap(value - self.range_start_in_degrees)
    }

    /// Returns the lowest value in the space.
    pub fn range_start(&self) -> f64 {
        self.range_start_in_degrees
    }

    /// Returns the smallest signed distance between two values in the space.
    ///
    /// The result is in the range (-180, 180]. When both directions are equally long the
    /// positive direction is returned.
    ///
    /// ## Parameters
    ///
    /// * `start` - The starting value.
    /// * `end` - The ending value
    ///
    /// ## Example
    ///
    /// ```
    /// use swerve_module_control::number_space::PeriodicBoundedCircularSpace;
    ///
    /// let space = PeriodicBoundedCircularSpace::new_with_full_turn_range(0.0);
    /// assert_eq!(-90.0, space.smallest_distance_between_values(0.0, 270.0));
    /// assert_eq!(180.0, space.smallest_distance_between_values(90.0, -90.0));
    /// ```
    pub fn smallest_distance_between_values(&self, start: f64, end: f64) -> f64 {
        let diff = self.wrap(end - start);
        if diff > 0.5 * self.range_size {
            diff - self.range_size
        } else {
            diff
        }
    }

    /// Wraps the value into [0, range_size).
    fn wrap(&self, value: f64) -> f64 {
        let wrapped = value.rem_euclid(self.range_size);

        // rem_euclid can round up to the range size for tiny negative values
        if wrapped >= self.range_size {
            wrapped - self.range_size
        } else {
            wrapped
        }
    }
}

/// Returns the space [0, 360) that absolute sensors report in.
pub fn unsigned_full_turn() -> PeriodicBoundedCircularSpace {
    PeriodicBoundedCircularSpace::new_with_full_turn_range(0.0)
}

/// Returns the space [-180, 180).
pub fn signed_full_turn() -> PeriodicBoundedCircularSpace {
    PeriodicBoundedCircularSpace::new_with_full_turn_range(-0.5 * FULL_TURN_IN_DEGREES)
}
