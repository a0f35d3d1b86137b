use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

/// A [`SecretString`] that can travel through serde.
///
/// Settings files and API payloads need secrets in string positions, so this
/// wrapper exposes the value for (de)serialization only and keeps the
/// redacted `Debug` output everywhere else.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "utoipa", derive(ToSchema), schema(value_type = String, example = "secret123"))]
pub struct SerializableSecretString(SecretString);

impl Deref for SerializableSecretString {
    type Target = SecretString;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<String> for SerializableSecretString {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<SecretString> for SerializableSecretString {
    fn from(value: SecretString) -> Self {
        Self(value)
    }
}

impl From<SerializableSecretString> for SecretString {
    fn from(value: SerializableSecretString) -> Self {
        value.0
    }
}

impl Serialize for SerializableSecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.expose_secret())
    }
}

impl<'de> Deserialize<'de> for SerializableSecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Ok(Self(string.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_round_trips_through_serde() {
        let secret = SerializableSecretString::from("hunter2".to_string());
        let serialized = serde_json::to_string(&secret).unwrap();
        assert_eq!(serialized, "\"hunter2\"");

        let deserialized: SerializableSecretString = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.expose_secret(), "hunter2");
    }
}
