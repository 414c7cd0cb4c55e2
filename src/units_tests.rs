use super::*;
use float_cmp::approx_eq;

const DRIVE_GEAR_RATIO: f64 = 6.75;
const STEERING_GEAR_RATIO: f64 = 150.0 / 7.0;
const WHEEL_CIRCUMFERENCE: f64 = 0.319;

#[test]
fn when_converting_drive_velocity_it_should_use_the_gear_ratio_and_circumference() {
    // 6.75 motor rotations per second is one wheel rotation per second
    let velocity = velocity_to_physical(6.75 * 60.0, DRIVE_GEAR_RATIO, WHEEL_CIRCUMFERENCE);
    assert!(approx_eq!(f64, velocity, WHEEL_CIRCUMFERENCE, epsilon = 1e-12));
}

#[test]
fn when_converting_a_negative_drive_velocity_it_should_stay_negative() {
    let velocity = velocity_to_physical(-5676.0, DRIVE_GEAR_RATIO, WHEEL_CIRCUMFERENCE);
    assert!(velocity < 0.0);
    assert!(approx_eq!(
        f64,
        velocity,
        -5676.0 * WHEEL_CIRCUMFERENCE / DRIVE_GEAR_RATIO / 60.0,
        epsilon = 1e-12
    ));
}

#[test]
fn when_converting_velocity_to_raw_and_back_it_should_return_the_original_value() {
    for speed in [-4.5, -0.01, 0.0, 0.5, 3.2] {
        let raw = velocity_to_raw(speed, DRIVE_GEAR_RATIO, WHEEL_CIRCUMFERENCE);
        let back = velocity_to_physical(raw, DRIVE_GEAR_RATIO, WHEEL_CIRCUMFERENCE);
        assert!(approx_eq!(f64, back, speed, epsilon = 1e-12));
    }
}

#[test]
fn when_converting_position_it_should_be_recoverable_from_the_distance() {
    for gear_ratio in [6.75, 8.14, 6.12] {
        for raw in [0.0, 1.0, 17.25, -42.5, 10_000.0] {
            let distance = position_to_physical(raw, gear_ratio, WHEEL_CIRCUMFERENCE);
            let recovered = distance / WHEEL_CIRCUMFERENCE * gear_ratio;
            assert!(approx_eq!(f64, recovered, raw, epsilon = 1e-9));
        }
    }
}

#[test]
fn when_the_motor_turns_one_gear_ratio_the_wheel_travels_one_circumference() {
    let distance = position_to_physical(DRIVE_GEAR_RATIO, DRIVE_GEAR_RATIO, WHEEL_CIRCUMFERENCE);
    assert!(approx_eq!(f64, distance, WHEEL_CIRCUMFERENCE, epsilon = 1e-12));

    let raw = position_to_raw(WHEEL_CIRCUMFERENCE, DRIVE_GEAR_RATIO, WHEEL_CIRCUMFERENCE);
    assert!(approx_eq!(f64, raw, DRIVE_GEAR_RATIO, epsilon = 1e-12));
}

#[test]
fn when_converting_angle_it_should_not_wrap() {
    let angle = angle_to_physical(2.5 * STEERING_GEAR_RATIO, STEERING_GEAR_RATIO);
    assert!(approx_eq!(f64, angle, 900.0, epsilon = 1e-9));

    let angle = angle_to_physical(-0.25 * STEERING_GEAR_RATIO, STEERING_GEAR_RATIO);
    assert!(approx_eq!(f64, angle, -90.0, epsilon = 1e-9));
}

#[test]
fn when_converting_angle_to_raw_and_back_it_should_return_the_original_value() {
    for angle in [-725.0, -90.0, 0.0, 45.0, 359.9, 1080.0] {
        let raw = angle_to_raw(angle, STEERING_GEAR_RATIO);
        let back = angle_to_physical(raw, STEERING_GEAR_RATIO);
        assert!(approx_eq!(f64, back, angle, epsilon = 1e-9));
    }
}

#[test]
fn when_bounding_an_angle_it_should_be_in_a_single_turn() {
    assert_eq!(bounded_angle(900.0), 180.0);
    assert_eq!(bounded_angle(-90.0), 270.0);
    assert_eq!(bounded_angle(360.0), 0.0);
    assert_eq!(bounded_angle(12.5), 12.5);
}
