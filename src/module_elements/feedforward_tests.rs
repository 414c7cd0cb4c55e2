use super::*;

#[test]
fn when_moving_forward_the_static_friction_should_be_added() {
    let feedforward = SimpleMotorFeedforward::new(0.2, 2.5, 0.0);

    assert_eq!(feedforward.calculate(2.0, 0.0), 0.2 + 5.0);
}

#[test]
fn when_moving_backward_the_static_friction_should_be_subtracted() {
    let feedforward = SimpleMotorFeedforward::new(0.2, 2.5, 0.0);

    assert_eq!(feedforward.calculate(-2.0, 0.0), -0.2 - 5.0);
}

#[test]
fn when_standing_still_the_output_should_be_zero() {
    let feedforward = SimpleMotorFeedforward::new(0.2, 2.5, 0.3);

    assert_eq!(feedforward.calculate(0.0, 0.0), 0.0);
    assert_eq!(feedforward.calculate(-0.0, 0.0), 0.0);
}

#[test]
fn when_accelerating_the_acceleration_term_should_be_added() {
    let feedforward = SimpleMotorFeedforward::new(0.0, 0.0, 0.5);

    assert_eq!(feedforward.calculate(0.0, 4.0), 2.0);
}

#[test]
fn test_is_finite() {
    assert!(SimpleMotorFeedforward::new(0.1, 2.0, 0.0).is_finite());
    assert!(!SimpleMotorFeedforward::new(f64::NAN, 2.0, 0.0).is_finite());
    assert!(!SimpleMotorFeedforward::new(0.1, f64::INFINITY, 0.0).is_finite());
}
