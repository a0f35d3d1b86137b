use base64::{Engine, prelude::BASE64_STANDARD};
use serde::Deserialize;
use thiserror::Error;
use valet_config::Config;
use valet_config::shared::{PgConnectionConfig, SentryConfig};

/// Required length in bytes for a valid API key.
const API_KEY_LENGTH_IN_BYTES: usize = 32;

/// Default base URL of the GitHub REST API.
const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";

/// Complete configuration for the valet API service.
///
/// Contains all settings required to run the API including database connection,
/// server settings, encryption, authentication, GitHub access, and optional
/// error tracking.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Database connection configuration.
    pub database: PgConnectionConfig,
    /// Application server settings.
    pub application: ApplicationSettings,
    /// Encryption key configuration.
    pub encryption_key: EncryptionKey,
    /// List of base64-encoded API keys.
    ///
    /// All keys in this list are considered valid for authentication.
    pub api_keys: Vec<String>,
    /// GitHub API settings.
    pub github: GithubConfig,
    /// Optional Sentry configuration for error tracking.
    pub sentry: Option<SentryConfig>,
}

impl Config for ApiConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["api_keys"];
}

/// HTTP server configuration settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    /// Host address the API listens on.
    pub host: String,
    /// Port number the API listens on.
    pub port: u16,
}

/// Encryption key configuration with identifier and key material.
#[derive(Debug, Clone, Deserialize)]
pub struct EncryptionKey {
    /// Unique identifier for the key.
    pub id: u32,
    /// Base64-encoded key material.
    pub key: String,
}

/// GitHub API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the GitHub REST API.
    ///
    /// Override for GitHub Enterprise Server installations.
    #[serde(default = "default_github_api_base_url")]
    pub api_base_url: String,
}

fn default_github_api_base_url() -> String {
    DEFAULT_GITHUB_API_BASE_URL.to_string()
}

/// Errors that can occur during API key validation and conversion.
#[derive(Debug, Error)]
pub enum ApiKeyConversionError {
    /// The API key is not valid base64.
    #[error("api key is not base64 encoded")]
    NotBase64Encoded,

    /// The API key does not have the expected length of 32 bytes.
    #[error("expected length of api key is 32, but actual length is {0}")]
    LengthNot32Bytes(usize),
}

/// Validated API key as a 32-byte array.
///
/// Ensures API keys meet length requirements and are properly decoded from base64.
#[derive(Debug)]
pub struct ApiKey {
    /// The 32-byte decoded API key.
    pub key: [u8; API_KEY_LENGTH_IN_BYTES],
}

impl TryFrom<&str> for ApiKey {
    type Error = ApiKeyConversionError;

    /// Creates an [`ApiKey`] from a base64-encoded string.
    ///
    /// Validates that the string is valid base64 and decodes to exactly 32 bytes.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let key = BASE64_STANDARD
            .decode(value)
            .map_err(|_| ApiKeyConversionError::NotBase64Encoded)?;

        let length = key.len();
        let key = key
            .try_into()
            .map_err(|_| ApiKeyConversionError::LengthNot32Bytes(length))?;

        Ok(ApiKey { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_rejects_invalid_base64() {
        let result = ApiKey::try_from("not base64!!!");
        assert!(matches!(
            result,
            Err(ApiKeyConversionError::NotBase64Encoded)
        ));
    }

    #[test]
    fn api_key_rejects_wrong_length() {
        let encoded = BASE64_STANDARD.encode([0u8; 16]);
        let result = ApiKey::try_from(encoded.as_str());
        assert!(matches!(
            result,
            Err(ApiKeyConversionError::LengthNot32Bytes(16))
        ));
    }

    #[test]
    fn api_key_accepts_32_byte_value() {
        let encoded = BASE64_STANDARD.encode([42u8; 32]);
        let api_key = ApiKey::try_from(encoded.as_str()).unwrap();
        assert_eq!(api_key.key, [42u8; 32]);
    }
}
