use actix_web::{Error, dev::ServiceRequest, web::Data};
use actix_web_httpauth::extractors::{
    AuthenticationError,
    bearer::{BearerAuth, Config},
};
use constant_time_eq::constant_time_eq_n;

use crate::config::{ApiConfig, ApiKey};

/// Validates the bearer token of a request against the configured API keys.
///
/// Any key in the configured list authenticates, which allows keys to be
/// rotated without downtime. Key comparison is constant-time.
pub async fn auth_validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let bearer_config = req
        .app_data::<Config>()
        .cloned()
        .unwrap_or_default()
        .scope("v1");

    let token: ApiKey = match credentials.token().try_into() {
        Ok(token) => token,
        Err(_) => {
            return Err((AuthenticationError::from(bearer_config).into(), req));
        }
    };

    let authorized = req
        .app_data::<Data<ApiConfig>>()
        .expect("missing api configuration")
        .api_keys
        .iter()
        .any(|api_key| {
            ApiKey::try_from(api_key.as_str())
                .map(|api_key| constant_time_eq_n(&api_key.key, &token.key))
                .unwrap_or(false)
        });

    if !authorized {
        return Err((AuthenticationError::from(bearer_config).into(), req));
    }

    Ok(req)
}
