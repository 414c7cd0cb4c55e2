//! Defines the interface for the absolute angle sensor of a module

use crate::Error;

/// The range in which the absolute sensor reports its angle.
///
/// Calibration only accepts readings in [0, 360], so the unsigned range is the only one offered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AbsoluteSensorRange {
    /// The angle is reported in [0, 360).
    Unsigned0To360,
}

/// The rotation direction in which the sensor angle increases.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SensorDirection {
    /// The angle increases when the magnet turns counter clockwise, seen from the LED side.
    CounterClockwisePositive,

    /// The angle increases when the magnet turns clockwise, seen from the LED side.
    ClockwisePositive,
}

/// The value the sensor position is set to when the sensor boots.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SensorInitializationStrategy {
    /// The position starts at the absolute position.
    BootToAbsolutePosition,

    /// The position starts at zero.
    BootToZero,
}

/// The time base for the velocity reported by the sensor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SensorTimeBase {
    /// Velocity is reported per 100 ms.
    Per100Ms,

    /// Velocity is reported per second.
    PerSecond,

    /// Velocity is reported per minute.
    PerMinute,
}

/// The complete configuration for an absolute angle sensor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AbsoluteEncoderConfiguration {
    /// The reporting range of the absolute angle.
    pub range: AbsoluteSensorRange,

    /// The direction in which the angle increases.
    pub direction: SensorDirection,

    /// The position at boot.
    pub initialization: SensorInitializationStrategy,

    /// The velocity time base.
    pub time_base: SensorTimeBase,
}

impl AbsoluteEncoderConfiguration {
    /// Returns the configuration used for steering calibration, i.e. an unsigned [0, 360)
    /// range that boots to the absolute position and reports velocities per second.
    ///
    /// ## Parameters
    ///
    /// * 'inverted' - Set to true if the angle should increase when the module turns clockwise.
    pub fn for_steering(inverted: bool) -> Self {
        Self {
            range: AbsoluteSensorRange::Unsigned0To360,
            direction: if inverted {
                SensorDirection::ClockwisePositive
            } else {
                SensorDirection::CounterClockwisePositive
            },
            initialization: SensorInitializationStrategy::BootToAbsolutePosition,
            time_base: SensorTimeBase::PerSecond,
        }
    }
}

/// Defines the interface for hardware that senses the absolute angle of a module.
pub trait AbsoluteEncoder {
    /// Returns the absolute angle in degrees, in the configured reporting range.
    fn absolute_position_in_degrees(&self) -> Result<f64, Error>;

    /// Applies the given configuration to the sensor.
    fn apply_configuration(&mut self, configuration: &AbsoluteEncoderConfiguration)
        -> Result<(), Error>;

    /// Resets all settings of the sensor to the factory defaults.
    fn restore_factory_defaults(&mut self) -> Result<(), Error>;
}
