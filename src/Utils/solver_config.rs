use log::LevelFilter;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid solver config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("loglevel must be debug, info, warn, error or off, got '{0}'")]
    UnknownLogLevel(String),
}

/// Runtime knobs of the solver. Every field is optional in TOML.
///
/// ```
/// use RustedMathSolver::Utils::solver_config::SolverConfig;
/// let config = SolverConfig::from_toml_str("float_digits = 6").unwrap();
/// assert_eq!(config.float_digits, 6);
/// assert_eq!(config.loglevel, "warn");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub loglevel: String,
    /// longer problems are rejected with an error record
    pub max_problem_length: usize,
    /// significant digits of evaluated expressions
    pub float_digits: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            loglevel: "warn".to_string(),
            max_problem_length: 10_000,
            float_digits: 15,
        }
    }
}

impl SolverConfig {
    pub fn from_toml_str(text: &str) -> Result<SolverConfig, ConfigError> {
        let config: SolverConfig = toml::from_str(text)?;
        config.level_filter()?;
        Ok(config)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        match self.loglevel.to_lowercase().as_str() {
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            "off" => Ok(LevelFilter::Off),
            _ => Err(ConfigError::UnknownLogLevel(self.loglevel.clone())),
        }
    }
}
