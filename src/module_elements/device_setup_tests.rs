use crate::hardware::{
    actuator_interface::IdleMode,
    mock_hardware::{MockEncoder, MockMotor},
    sensor_interface::AbsoluteSensorRange,
};

use super::*;

fn settings() -> Vec<MotorSetting> {
    vec![
        MotorSetting::RestoreFactoryDefaults,
        MotorSetting::SmartCurrentLimit { amps: 40 },
        MotorSetting::IdleMode(IdleMode::Brake),
    ]
}

#[test]
fn when_all_settings_are_accepted_they_should_be_applied_without_committing() {
    let mut motor = MockMotor::new();

    let report = configure_motor(Device::DriveMotor(1), &mut motor, &settings(), 3);

    assert!(report.is_success());
    assert!(report.failures().is_empty());
    assert_eq!(report.device(), Device::DriveMotor(1));
    assert_eq!(report.outcomes().len(), 3);
    assert!(report.outcomes().iter().all(|o| o.attempts() == 1));
    assert_eq!(report.outcomes()[1].setting(), "smart current limit [40 A]");

    let state = motor.state.borrow();
    assert_eq!(state.applied_settings, settings());
    assert_eq!(state.commits, 0);
}

#[test]
fn when_committing_a_motor_the_configuration_should_be_stored() {
    let mut motor = MockMotor::new();

    let report = commit_motor(Device::SteeringMotor(2), &mut motor, 3);

    assert!(report.is_success());
    assert_eq!(report.outcomes().len(), 1);
    assert_eq!(report.outcomes()[0].setting(), "commit configuration");
    assert_eq!(motor.state.borrow().commits, 1);
}

#[test]
fn when_no_attempts_are_allowed_each_setting_should_still_be_written_once() {
    let mut motor = MockMotor::new();
    motor.state.borrow_mut().transient_rejections = 1;

    let report = configure_motor(Device::DriveMotor(1), &mut motor, &settings(), 0);

    assert!(!report.is_success());
    assert_eq!(report.outcomes()[0].attempts(), 1);
    assert_eq!(motor.state.borrow().setting_attempts, 3);
}

#[test]
fn when_a_setting_is_rejected_once_it_should_be_retried() {
    let mut motor = MockMotor::new();
    motor.state.borrow_mut().transient_rejections = 2;

    let report = configure_motor(Device::SteeringMotor(2), &mut motor, &settings(), 3);

    assert!(report.is_success());
    assert_eq!(report.outcomes()[0].attempts(), 3);
    assert_eq!(report.outcomes()[1].attempts(), 1);

    assert_eq!(motor.state.borrow().setting_attempts, 5);
}

#[test]
fn when_a_setting_is_always_rejected_the_remaining_settings_should_still_be_written() {
    let mut motor = MockMotor::new();
    motor.state.borrow_mut().permanently_rejects =
        Some(|s| matches!(s, MotorSetting::SmartCurrentLimit { .. }));

    let report = configure_motor(Device::DriveMotor(5), &mut motor, &settings(), 3);

    assert!(!report.is_success());
    assert_eq!(report.outcomes().len(), 3);

    let failed = &report.outcomes()[1];
    assert_eq!(failed.attempts(), 3);
    assert_eq!(
        failed.error(),
        Some(&Error::ConfigurationRejected {
            setting: "smart current limit [40 A]".to_string()
        })
    );

    assert_eq!(
        report.failures(),
        vec![
            "drive motor [5]: smart current limit [40 A] failed after 3 attempts \
             (The device rejected the configuration setting smart current limit [40 A].)"
                .to_string()
        ]
    );

    let state = motor.state.borrow();
    assert_eq!(
        state.applied_settings,
        vec![
            MotorSetting::RestoreFactoryDefaults,
            MotorSetting::IdleMode(IdleMode::Brake)
        ]
    );
    assert_eq!(state.commits, 0);
}

#[test]
fn when_only_one_attempt_is_allowed_a_rejection_should_fail_the_setting() {
    let mut motor = MockMotor::new();
    motor.state.borrow_mut().transient_rejections = 1;

    let report = configure_motor(Device::DriveMotor(1), &mut motor, &settings(), 1);

    assert!(!report.is_success());
    assert_eq!(report.failures().len(), 1);
}

#[test]
fn when_configuring_the_absolute_encoder_it_should_reset_then_configure() {
    let mut encoder = MockEncoder::with_reading(0.0);
    let configuration = AbsoluteEncoderConfiguration::for_steering(true);
    assert_eq!(configuration.range, AbsoluteSensorRange::Unsigned0To360);

    let report = configure_absolute_encoder(
        Device::AbsoluteEncoder(1),
        &mut encoder,
        &configuration,
        3,
    );

    assert!(report.is_success());
    assert_eq!(report.outcomes().len(), 2);

    let state = encoder.state.borrow();
    assert_eq!(state.factory_resets, 1);
    assert_eq!(state.configurations, vec![configuration]);
}

#[test]
fn when_the_absolute_encoder_rejects_its_configuration_it_should_be_reported() {
    let mut encoder = MockEncoder::with_reading(0.0);
    encoder.state.borrow_mut().reject_configuration = true;

    let report = configure_absolute_encoder(
        Device::AbsoluteEncoder(4),
        &mut encoder,
        &AbsoluteEncoderConfiguration::for_steering(false),
        2,
    );

    assert!(!report.is_success());
    assert_eq!(report.outcomes()[1].attempts(), 2);
    assert_eq!(report.failures().len(), 1);
    assert!(report.failures()[0].starts_with("absolute encoder [4]: "));
}
