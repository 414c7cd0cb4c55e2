//! Defines the configuration of a single swerve module and of a four module drivetrain.
//!
//! Every module carries its own geometry, gains and limits so that modules can be tuned
//! and tested independently. A [DrivetrainConfig] can be loaded from TOML. Each module table
//! is laid over the defaults for its location, so a table only needs the values that differ.
//! The defaults describe an SDS MK4i L2 module driven by NEO motors, wired with the bus IDs
//! of [HardwareIds::for_location].

use std::collections::HashSet;

use serde::{de, Deserialize, Deserializer, Serialize};
use toml::{Table, Value};

use crate::{
    hardware::{
        actuator_interface::{IdleMode, MotorSetting, PidGains},
        Device,
    },
    Error,
};

use super::feedforward::SimpleMotorFeedforward;

#[cfg(test)]
#[path = "module_config_tests.rs"]
mod module_config_tests;

/// The circumference of a 4 inch wheel in meters.
pub const FOUR_INCH_WHEEL_CIRCUMFERENCE_IN_METERS: f64 = 0.319;

/// The gearing and wheel size of a module. Fixed once the module is built.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct ModuleGeometry {
    /// The number of drive motor rotations for one wheel rotation.
    pub drive_gear_ratio: f64,

    /// The number of steering motor rotations for one module rotation.
    pub steering_gear_ratio: f64,

    /// The circumference of the wheel in meters.
    pub wheel_circumference_in_meters: f64,
}

impl ModuleGeometry {
    /// Swerve Drive Specialties MK4 module with the L2 drive gearing.
    pub const SDS_MK4_L2: ModuleGeometry = ModuleGeometry {
        drive_gear_ratio: 6.75,
        steering_gear_ratio: 12.8,
        wheel_circumference_in_meters: FOUR_INCH_WHEEL_CIRCUMFERENCE_IN_METERS,
    };

    /// Swerve Drive Specialties MK4i module with the L2 drive gearing.
    pub const SDS_MK4I_L2: ModuleGeometry = ModuleGeometry {
        drive_gear_ratio: 6.75,
        steering_gear_ratio: 150.0 / 7.0,
        wheel_circumference_in_meters: FOUR_INCH_WHEEL_CIRCUMFERENCE_IN_METERS,
    };

    fn validate(&self) -> Result<(), Error> {
        require_positive("drive_gear_ratio", self.drive_gear_ratio)?;
        require_positive("steering_gear_ratio", self.steering_gear_ratio)?;
        require_positive(
            "wheel_circumference_in_meters",
            self.wheel_circumference_in_meters,
        )
    }
}

impl Default for ModuleGeometry {
    fn default() -> Self {
        Self::SDS_MK4I_L2
    }
}

/// The settings for one motor of a module.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct MotorConfig {
    /// The gains of the onboard closed loop controller.
    pub pid: PidGains,

    /// The current limit in amps.
    pub current_limit_in_amps: u32,

    /// The open loop ramp time in seconds, if any.
    pub open_loop_ramp_in_seconds: Option<f64>,

    /// The closed loop ramp time in seconds, if any.
    pub closed_loop_ramp_in_seconds: Option<f64>,

    /// Set to true if the motor direction should be inverted.
    pub inverted: bool,

    /// The behaviour of the motor at zero output.
    pub idle_mode: IdleMode,
}

impl MotorConfig {
    /// Returns the default settings for a drive motor.
    pub fn default_drive() -> Self {
        Self {
            pid: PidGains::new(0.1, 0.0, 0.0, 0.0),
            current_limit_in_amps: 40,
            open_loop_ramp_in_seconds: Some(0.25),
            closed_loop_ramp_in_seconds: Some(0.0),
            inverted: false,
            idle_mode: IdleMode::Brake,
        }
    }

    /// Returns the default settings for a steering motor.
    pub fn default_steering() -> Self {
        Self {
            pid: PidGains::new(0.3, 0.0, 0.0, 0.0),
            current_limit_in_amps: 20,
            open_loop_ramp_in_seconds: None,
            closed_loop_ramp_in_seconds: None,
            inverted: true,
            idle_mode: IdleMode::Coast,
        }
    }

    /// Returns the settings that are written to the motor controller, in order.
    ///
    /// The list always starts by restoring the factory defaults so that no setting from a
    /// previous configuration survives.
    ///
    /// ## Parameters
    ///
    /// * 'voltage_compensation_in_volts' - The nominal voltage the output is scaled to
    pub fn settings(&self, voltage_compensation_in_volts: f64) -> Vec<MotorSetting> {
        let mut settings = vec![
            MotorSetting::RestoreFactoryDefaults,
            MotorSetting::Pid(self.pid),
            MotorSetting::SmartCurrentLimit {
                amps: self.current_limit_in_amps,
            },
        ];

        if let Some(seconds) = self.open_loop_ramp_in_seconds {
            settings.push(MotorSetting::OpenLoopRampRate { seconds });
        }

        if let Some(seconds) = self.closed_loop_ramp_in_seconds {
            settings.push(MotorSetting::ClosedLoopRampRate { seconds });
        }

        settings.push(MotorSetting::VoltageCompensation {
            nominal_volts: voltage_compensation_in_volts,
        });
        settings.push(MotorSetting::Inverted(self.inverted));
        settings.push(MotorSetting::IdleMode(self.idle_mode));

        settings
    }

    fn validate(&self, name: &str) -> Result<(), Error> {
        if !self.pid.is_finite() {
            return Err(Error::InvalidConfiguration {
                reason: format!("the {} PID gains must be finite", name),
            });
        }

        for ramp in [self.open_loop_ramp_in_seconds, self.closed_loop_ramp_in_seconds]
            .into_iter()
            .flatten()
        {
            if !ramp.is_finite() || ramp < 0.0 {
                return Err(Error::InvalidConfiguration {
                    reason: format!(
                        "the {} ramp rate must be zero or more, got {}",
                        name, ramp
                    ),
                });
            }
        }

        Ok(())
    }
}

/// The bus IDs of the devices of a module.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct HardwareIds {
    /// The bus ID of the drive motor controller.
    pub drive_motor_id: u8,

    /// The bus ID of the steering motor controller.
    pub steering_motor_id: u8,

    /// The bus ID of the absolute angle sensor.
    pub absolute_encoder_id: u8,
}

impl HardwareIds {
    /// Returns the absolute sensor device.
    pub fn absolute_encoder(&self) -> Device {
        Device::AbsoluteEncoder(self.absolute_encoder_id)
    }

    /// Returns the drive motor device.
    pub fn drive_motor(&self) -> Device {
        Device::DriveMotor(self.drive_motor_id)
    }

    /// Returns the default bus IDs for the module at the given location.
    pub fn for_location(location: ModuleLocation) -> Self {
        let (drive_motor_id, steering_motor_id, absolute_encoder_id) = match location {
            ModuleLocation::FrontLeft => (1, 2, 1),
            ModuleLocation::RearLeft => (3, 4, 2),
            ModuleLocation::FrontRight => (5, 6, 3),
            ModuleLocation::RearRight => (7, 8, 4),
        };

        Self {
            drive_motor_id,
            steering_motor_id,
            absolute_encoder_id,
        }
    }

    /// Returns the steering motor device.
    pub fn steering_motor(&self) -> Device {
        Device::SteeringMotor(self.steering_motor_id)
    }
}

/// The location of a module on the robot.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ModuleLocation {
    /// The front left corner.
    FrontLeft,

    /// The rear left corner.
    RearLeft,

    /// The front right corner.
    FrontRight,

    /// The rear right corner.
    RearRight,
}

impl ModuleLocation {
    /// All locations, ordered by module number.
    pub const ALL: [ModuleLocation; 4] = [
        ModuleLocation::FrontLeft,
        ModuleLocation::RearLeft,
        ModuleLocation::FrontRight,
        ModuleLocation::RearRight,
    ];

    /// Returns the name of the TOML table that holds the module at the location.
    pub fn table_name(&self) -> &'static str {
        match self {
            ModuleLocation::FrontLeft => "front_left",
            ModuleLocation::RearLeft => "rear_left",
            ModuleLocation::FrontRight => "front_right",
            ModuleLocation::RearRight => "rear_right",
        }
    }

    /// Returns the module number for the location.
    pub fn module_number(&self) -> usize {
        match self {
            ModuleLocation::FrontLeft => 0,
            ModuleLocation::RearLeft => 1,
            ModuleLocation::FrontRight => 2,
            ModuleLocation::RearRight => 3,
        }
    }
}

/// The complete configuration of a single swerve module.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ModuleConfig {
    /// The bus IDs of the module devices.
    pub hardware_ids: HardwareIds,

    /// The gearing and wheel size.
    pub geometry: ModuleGeometry,

    /// The angle reported by the absolute sensor when the module points straight forward.
    pub mounting_offset_in_degrees: f64,

    /// The maximum linear speed of the wheel.
    pub max_speed_in_meters_per_second: f64,

    /// The nominal voltage that motor outputs are scaled to.
    pub voltage_compensation_in_volts: f64,

    /// The drive motor settings.
    pub drive: MotorConfig,

    /// The steering motor settings.
    pub steering: MotorConfig,

    /// The feedforward model of the drive motor, in volts per meter per second.
    pub drive_feedforward: SimpleMotorFeedforward,

    /// Set to true if the absolute sensor angle increases when the module turns clockwise.
    pub absolute_encoder_inverted: bool,

    /// The number of times each configuration write is tried before giving up.
    pub configuration_attempts: u32,
}

impl ModuleConfig {
    /// Creates a new [ModuleConfig] for the given location with the default settings.
    ///
    /// ## Parameters
    ///
    /// * 'location' - The location of the module, which determines the bus IDs
    /// * 'geometry' - The gearing and wheel size
    /// * 'mounting_offset_in_degrees' - The absolute sensor angle when the module points forward
    pub fn new(
        location: ModuleLocation,
        geometry: ModuleGeometry,
        mounting_offset_in_degrees: f64,
    ) -> Self {
        Self {
            hardware_ids: HardwareIds::for_location(location),
            geometry,
            mounting_offset_in_degrees,
            max_speed_in_meters_per_second: 4.5,
            voltage_compensation_in_volts: 12.0,
            drive: MotorConfig::default_drive(),
            steering: MotorConfig::default_steering(),
            drive_feedforward: SimpleMotorFeedforward::new(0.17, 2.6, 0.0),
            absolute_encoder_inverted: false,
            configuration_attempts: 3,
        }
    }

    /// Returns the default configuration for the module at the given location.
    pub fn for_location(location: ModuleLocation) -> Self {
        Self::new(location, ModuleGeometry::default(), 0.0)
    }

    /// Checks that the configuration can be used to drive a module.
    ///
    /// ## Errors
    ///
    /// * [Error::InvalidConfiguration] - Returned when a ratio, size, speed or voltage is not
    ///   a positive finite number, when a gain or offset is not finite or when no
    ///   configuration attempts are allowed.
    pub fn validate(&self) -> Result<(), Error> {
        self.geometry.validate()?;
        require_positive(
            "max_speed_in_meters_per_second",
            self.max_speed_in_meters_per_second,
        )?;
        require_positive(
            "voltage_compensation_in_volts",
            self.voltage_compensation_in_volts,
        )?;

        if !self.mounting_offset_in_degrees.is_finite() {
            return Err(Error::InvalidConfiguration {
                reason: "mounting_offset_in_degrees must be finite".to_string(),
            });
        }

        self.drive.validate("drive")?;
        self.steering.validate("steering")?;

        if !self.drive_feedforward.is_finite() {
            return Err(Error::InvalidConfiguration {
                reason: "the drive feedforward gains must be finite".to_string(),
            });
        }

        if self.configuration_attempts == 0 {
            return Err(Error::InvalidConfiguration {
                reason: "configuration_attempts must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self::for_location(ModuleLocation::FrontLeft)
    }
}

/// The configuration of the four modules of a swerve drivetrain.
///
/// When deserialized, every module table is optional and may be partial. Missing values are
/// taken from the defaults for the location of the module.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrivetrainConfig {
    /// The front left module.
    pub front_left: ModuleConfig,

    /// The rear left module.
    pub rear_left: ModuleConfig,

    /// The front right module.
    pub front_right: ModuleConfig,

    /// The rear right module.
    pub rear_right: ModuleConfig,
}

impl DrivetrainConfig {
    /// Parses a drivetrain configuration from TOML and validates it.
    ///
    /// ## Example
    ///
    /// ```
    /// use swerve_module_control::module_elements::module_config::{
    ///     DrivetrainConfig, HardwareIds, ModuleLocation,
    /// };
    ///
    /// let config = DrivetrainConfig::from_toml_str(
    ///     r#"
    ///     [rear_left]
    ///     mounting_offset_in_degrees = 12.5
    ///     "#,
    /// )
    /// .unwrap();
    ///
    /// let rear_left = config.module(ModuleLocation::RearLeft);
    /// assert_eq!(rear_left.mounting_offset_in_degrees, 12.5);
    /// assert_eq!(rear_left.hardware_ids, HardwareIds::for_location(ModuleLocation::RearLeft));
    /// ```
    ///
    /// ## Errors
    ///
    /// * [Error::InvalidConfiguration] - Returned when the TOML does not parse or when the
    ///   configuration is not valid.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: DrivetrainConfig =
            toml::from_str(text).map_err(|e| Error::InvalidConfiguration {
                reason: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Returns the configuration of the module at the given location.
    pub fn module(&self, location: ModuleLocation) -> &ModuleConfig {
        match location {
            ModuleLocation::FrontLeft => &self.front_left,
            ModuleLocation::RearLeft => &self.rear_left,
            ModuleLocation::FrontRight => &self.front_right,
            ModuleLocation::RearRight => &self.rear_right,
        }
    }

    /// Serializes the configuration to TOML.
    pub fn to_toml_string(&self) -> Result<String, Error> {
        toml::to_string(self).map_err(|e| Error::InvalidConfiguration {
            reason: e.to_string(),
        })
    }

    /// Checks every module configuration and checks that no two modules share a device.
    ///
    /// Drive and steering motors share one ID space, absolute sensors have their own.
    pub fn validate(&self) -> Result<(), Error> {
        let mut motor_ids = HashSet::new();
        let mut encoder_ids = HashSet::new();
        for location in ModuleLocation::ALL {
            let module = self.module(location);
            module.validate()?;

            let ids = &module.hardware_ids;
            let duplicate = if !motor_ids.insert(ids.drive_motor_id) {
                Some(ids.drive_motor())
            } else if !motor_ids.insert(ids.steering_motor_id) {
                Some(ids.steering_motor())
            } else if !encoder_ids.insert(ids.absolute_encoder_id) {
                Some(ids.absolute_encoder())
            } else {
                None
            };

            if let Some(device) = duplicate {
                return Err(Error::InvalidConfiguration {
                    reason: format!("the bus ID of {} is used more than once", device),
                });
            }
        }

        Ok(())
    }
}

impl<'de> Deserialize<'de> for DrivetrainConfig {
    fn deserialize<De>(deserializer: De) -> Result<Self, De::Error>
    where
        De: Deserializer<'de>,
    {
        let mut tables = Table::deserialize(deserializer)?;
        let mut module = |location: ModuleLocation| {
            module_with_overrides::<De::Error>(location, tables.remove(location.table_name()))
        };

        let config = Self {
            front_left: module(ModuleLocation::FrontLeft)?,
            rear_left: module(ModuleLocation::RearLeft)?,
            front_right: module(ModuleLocation::FrontRight)?,
            rear_right: module(ModuleLocation::RearRight)?,
        };

        if let Some(name) = tables.keys().next() {
            return Err(de::Error::custom(format!("unknown module table `{}`", name)));
        }

        Ok(config)
    }
}

impl Default for DrivetrainConfig {
    fn default() -> Self {
        Self {
            front_left: ModuleConfig::for_location(ModuleLocation::FrontLeft),
            rear_left: ModuleConfig::for_location(ModuleLocation::RearLeft),
            front_right: ModuleConfig::for_location(ModuleLocation::FrontRight),
            rear_right: ModuleConfig::for_location(ModuleLocation::RearRight),
        }
    }
}

/// Lays the values of 'overlay' over 'base'. Tables are merged key by key, every other value
/// replaces the value in 'base'.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base), Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn module_with_overrides<E: de::Error>(
    location: ModuleLocation,
    overrides: Option<Value>,
) -> Result<ModuleConfig, E> {
    let defaults = ModuleConfig::for_location(location);
    let Some(overrides) = overrides else {
        return Ok(defaults);
    };

    let mut merged = Value::try_from(&defaults).map_err(E::custom)?;
    merge(&mut merged, overrides);
    merged
        .try_into::<ModuleConfig>()
        .map_err(|e| E::custom(format!("[{}]: {}", location.table_name(), e)))
}

fn require_positive(name: &str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            reason: format!("{} must be a positive number, got {}", name, value),
        })
    }
}
