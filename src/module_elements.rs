/// Provides the structures that describe the state and position of a module
pub mod module_state;

/// Provides the optimization of a desired module state against the current module angle
pub mod angle_optimizer;

/// Provides the feedforward model for the drive motor
pub mod feedforward;

/// Provides the calibration of the steering encoder against the absolute sensor
pub mod calibration;

/// Provides the configuration of the module hardware
pub mod device_setup;

/// Defines the per-module configuration
pub mod module_config;

/// Defines the swerve module controller
pub mod swerve_module;
