use super::*;

#[test]
fn test_new_pid_gains() {
    let gains = PidGains::new(1.0, 2.0, 3.0, 4.0);

    assert_eq!(gains.kp, 1.0);
    assert_eq!(gains.ki, 2.0);
    assert_eq!(gains.kd, 3.0);
    assert_eq!(gains.kf, 4.0);
    assert!(gains.is_finite());
}

#[test]
fn when_a_gain_is_not_finite_the_gains_should_not_be_finite() {
    assert!(!PidGains::new(f64::NAN, 0.0, 0.0, 0.0).is_finite());
    assert!(!PidGains::new(0.0, f64::INFINITY, 0.0, 0.0).is_finite());
    assert!(!PidGains::new(0.0, 0.0, f64::NEG_INFINITY, 0.0).is_finite());
    assert!(!PidGains::new(0.0, 0.0, 0.0, f64::NAN).is_finite());
}

#[test]
fn when_displaying_a_setting_it_should_name_the_setting_and_value() {
    assert_eq!(
        format!("{}", MotorSetting::SmartCurrentLimit { amps: 40 }),
        "smart current limit [40 A]"
    );
    assert_eq!(
        format!("{}", MotorSetting::IdleMode(IdleMode::Brake)),
        "idle mode [Brake]"
    );
    assert_eq!(
        format!("{}", MotorSetting::VoltageCompensation { nominal_volts: 12.0 }),
        "voltage compensation [12 V]"
    );
    assert_eq!(
        format!("{}", MotorSetting::RestoreFactoryDefaults),
        "restore factory defaults"
    );
}
