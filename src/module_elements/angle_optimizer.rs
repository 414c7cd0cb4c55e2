//! Optimizes a desired module state so that the module never has to turn more than a
//! quarter turn to reach it.
//!
//! The position controller of the steering motor does not know that 0 and 360 degrees are
//! the same angle. Commanding it naively makes it take the long way around. Every desired
//! state has an equivalent state with the opposite speed and an angle turned by half a turn.
//! At least one of the two lies within a quarter turn of the current angle, and the optimizer
//! picks that one.
//!
//! The optimized angle is expressed in the same winding as the current angle, i.e. it is
//! `current + delta` for a signed `delta` in [-90, 90]. It is never wrapped into a single
//! turn, as that would make the steering controller unwind the module.

use crate::number_space::{signed_full_turn, FULL_TURN_IN_DEGREES};

use super::module_state::ModuleState;

#[cfg(test)]
#[path = "angle_optimizer_tests.rs"]
mod angle_optimizer_tests;

/// The largest angle, in degrees, the module is asked to turn for a new state.
pub const MAXIMUM_STEERING_DELTA_IN_DEGREES: f64 = 0.25 * FULL_TURN_IN_DEGREES;

/// Rounding slack on the quarter turn boundary so that a state on the boundary is never
/// flipped back and forth between calls.
const BOUNDARY_TOLERANCE_IN_DEGREES: f64 = 1e-9;

/// Returns the state equivalent to 'desired' that is closest to the current angle.
///
/// The returned angle is within [MAXIMUM_STEERING_DELTA_IN_DEGREES] of 'current_angle_in_degrees'.
/// A difference of exactly a quarter turn does not flip the state.
///
/// ## Parameters
///
/// * 'desired' - The desired state of the module
/// * 'current_angle_in_degrees' - The current, continuous, angle of the module
///
/// ## Example
///
/// ```
/// use swerve_module_control::module_elements::{
///     angle_optimizer::optimize, module_state::ModuleState,
/// };
///
/// // Turning from 170 to 350 degrees is the same as driving backwards at 170 degrees
/// let optimized = optimize(&ModuleState::new(2.0, 350.0), 170.0);
/// assert_eq!(optimized, ModuleState::new(-2.0, 170.0));
/// ```
pub fn optimize(desired: &ModuleState, current_angle_in_degrees: f64) -> ModuleState {
    // Already in the right winding and within reach, so nothing to do. This also makes
    // optimizing an optimized state an exact no-op.
    if (desired.angle_in_degrees() - current_angle_in_degrees).abs()
        <= MAXIMUM_STEERING_DELTA_IN_DEGREES + BOUNDARY_TOLERANCE_IN_DEGREES
    {
        return *desired;
    }

    let delta = signed_full_turn()
        .smallest_distance_between_values(current_angle_in_degrees, desired.angle_in_degrees());

    if delta.abs() <= MAXIMUM_STEERING_DELTA_IN_DEGREES + BOUNDARY_TOLERANCE_IN_DEGREES {
        ModuleState::new(desired.speed(), current_angle_in_degrees + delta)
    } else {
        let half_turn = 0.5 * FULL_TURN_IN_DEGREES;
        let flipped_delta = if delta > 0.0 {
            delta - half_turn
        } else {
            delta + half_turn
        };

        ModuleState::new(-desired.speed(), current_angle_in_degrees + flipped_delta)
    }
}
