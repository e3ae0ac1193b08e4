//! Merge rules: defaults, override order.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix for environment overrides, e.g. `SUMFILE__MANIFEST__ALGORITHM=blake3`
pub const ENV_PREFIX: &str = "SUMFILE";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("manifest.algorithm", "md5")?
        .set_default("logging.level", "info")?
        .set_default("logging.output", "stderr")
}

/// Environment source; always the highest-precedence layer.
pub fn environment_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}
