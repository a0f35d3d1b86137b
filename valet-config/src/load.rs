use serde::de::DeserializeOwned;

use crate::environment::Environment;

/// Directory, relative to the working directory, where YAML settings live.
const CONFIGURATION_DIR: &str = "configuration";

/// Settings shared by every environment; per-environment files override it.
const BASE_CONFIG_FILE: &str = "base.yaml";

/// Every override variable starts with this prefix.
const ENV_PREFIX: &str = "APP";

const ENV_PREFIX_SEPARATOR: &str = "_";

/// Double underscore maps to a nesting level, so `APP_DATABASE__HOST`
/// overrides `database.host`.
const ENV_SEPARATOR: &str = "__";

/// Element separator for list-valued variables, e.g. `APP_API_KEYS=abc,def`.
const LIST_SEPARATOR: &str = ",";

/// Implemented by every top-level settings struct that goes through
/// [`load_config`].
pub trait Config {
    /// Keys whose environment-variable overrides must be split into lists.
    const LIST_PARSE_KEYS: &'static [&'static str];
}

/// Builds a settings struct by layering three sources, later ones winning:
/// `configuration/base.yaml`, then `configuration/{environment}.yaml`, then
/// `APP_`-prefixed environment variables.
///
/// # Panics
/// Panics when the working directory is unreadable or `APP_ENVIRONMENT`
/// holds an unknown value, since no service can start without settings.
pub fn load_config<T>() -> Result<T, config::ConfigError>
where
    T: Config + DeserializeOwned,
{
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join(CONFIGURATION_DIR);

    let environment = Environment::load().expect("Failed to parse APP_ENVIRONMENT.");

    let environment_filename = format!("{environment}.yaml");

    let mut environment_source = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_SEPARATOR);

    // List parsing is opt-in per key, otherwise commas inside scalar values
    // would be split too.
    if !<T as Config>::LIST_PARSE_KEYS.is_empty() {
        environment_source = environment_source
            .try_parsing(true)
            .list_separator(LIST_SEPARATOR);

        for key in <T as Config>::LIST_PARSE_KEYS {
            environment_source = environment_source.with_list_parse_key(key);
        }
    }

    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join(BASE_CONFIG_FILE),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(environment_source)
        .build()?;

    settings.try_deserialize::<T>()
}
