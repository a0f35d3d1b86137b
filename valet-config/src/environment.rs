use std::fmt;
use std::io::Error;

/// Environment variable the services read to decide which mode they run in.
const APP_ENVIRONMENT_ENV_NAME: &str = "APP_ENVIRONMENT";

const PROD_ENV_NAME: &str = "prod";
const STAGING_ENV_NAME: &str = "staging";
const DEV_ENV_NAME: &str = "dev";

/// The mode a valet service runs in.
///
/// Drives which configuration file is layered on top of the base settings and
/// whether production-only behavior such as file logging is enabled.
#[derive(Debug, Clone)]
pub enum Environment {
    Prod,
    Staging,
    Dev,
}

impl Environment {
    /// Reads the current environment from `APP_ENVIRONMENT`.
    ///
    /// An unset variable means [`Environment::Prod`], so a service never
    /// accidentally starts with development settings.
    pub fn load() -> Result<Environment, Error> {
        std::env::var(APP_ENVIRONMENT_ENV_NAME)
            .unwrap_or_else(|_| PROD_ENV_NAME.into())
            .try_into()
    }

    /// Writes this environment back into `APP_ENVIRONMENT`.
    pub fn set(&self) {
        unsafe { std::env::set_var(APP_ENVIRONMENT_ENV_NAME, self.to_string()) }
    }

    /// Returns `true` when running against production infrastructure, which
    /// includes staging.
    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod | Self::Staging)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Environment::Prod => write!(f, "{PROD_ENV_NAME}"),
            Environment::Staging => write!(f, "{STAGING_ENV_NAME}"),
            Environment::Dev => write!(f, "{DEV_ENV_NAME}"),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = Error;

    /// Parses `dev`, `staging`, or `prod`, ignoring case. Anything else is
    /// an error rather than a silent fallback.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            PROD_ENV_NAME => Ok(Self::Prod),
            STAGING_ENV_NAME => Ok(Self::Staging),
            DEV_ENV_NAME => Ok(Self::Dev),
            other => Err(Error::other(format!(
                "{other} is not a supported environment. Use either `{PROD_ENV_NAME}`/`{STAGING_ENV_NAME}`/`{DEV_ENV_NAME}`.",
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_case_insensitively() {
        let env: Environment = "PROD".to_string().try_into().unwrap();
        assert!(env.is_prod());

        let env: Environment = "Staging".to_string().try_into().unwrap();
        assert!(env.is_prod());

        let env: Environment = "dev".to_string().try_into().unwrap();
        assert!(!env.is_prod());
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let result: Result<Environment, _> = "qa".to_string().try_into();
        assert!(result.is_err());
    }
}
