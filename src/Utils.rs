//! different utility modules used throughout the project
/// terminal logger bootstrap
pub mod logger;
/// solver settings with defaults and TOML loading
pub mod solver_config;
