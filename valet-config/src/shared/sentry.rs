use serde::{Deserialize, Serialize};

/// Settings for reporting panics and errors to Sentry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentryConfig {
    /// DSN of the Sentry project events are sent to.
    pub dsn: String,
}
