use serde::{Deserialize, Serialize};

/// Reference to a single key inside a config map or secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySelector {
    /// Name of the referenced object.
    pub name: String,
    /// Key inside the referenced object.
    pub key: String,
    /// When `Some(true)`, a missing key does not block container start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

impl KeySelector {
    pub fn new<N, K>(name: N, key: K) -> Self
    where
        N: Into<String>,
        K: Into<String>,
    {
        Self {
            name: name.into(),
            key: key.into(),
            optional: None,
        }
    }

    /// Mark the selector as optional.
    pub fn optional(mut self) -> Self {
        self.optional = Some(true);
        self
    }
}

/// Indirect value source resolved by the scheduler at container start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueFrom {
    ConfigMapKeyRef(KeySelector),
    SecretKeyRef(KeySelector),
}

/// Where the value of an [`EnvVar`] comes from.
///
/// Flattened into the variable, so a binding serializes either as
/// `{"name": .., "value": ..}` or `{"name": .., "valueFrom": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvSource {
    /// Literal value baked into the job.
    Value(String),
    /// Value looked up from a config map or secret.
    ValueFrom(ValueFrom),
}

/// Single environment variable binding of a workload container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    name: String,
    #[serde(flatten)]
    source: EnvSource,
}

impl EnvVar {
    /// Binding with a literal value.
    pub fn value<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            source: EnvSource::Value(value.into()),
        }
    }

    /// Binding sourced from `config_map[key]`.
    pub fn config_map<N, C, K>(name: N, config_map: C, key: K) -> Self
    where
        N: Into<String>,
        C: Into<String>,
        K: Into<String>,
    {
        Self::from_selector(name, ValueFrom::ConfigMapKeyRef(KeySelector::new(config_map, key)))
    }

    /// Binding sourced from `secret[key]`.
    pub fn secret<N, S, K>(name: N, secret: S, key: K) -> Self
    where
        N: Into<String>,
        S: Into<String>,
        K: Into<String>,
    {
        Self::from_selector(name, ValueFrom::SecretKeyRef(KeySelector::new(secret, key)))
    }

    /// Binding sourced from an arbitrary selector.
    pub fn from_selector<N: Into<String>>(name: N, from: ValueFrom) -> Self {
        Self {
            name: name.into(),
            source: EnvSource::ValueFrom(from),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &EnvSource {
        &self.source
    }

    /// Literal value, if the binding is not indirect.
    pub fn literal(&self) -> Option<&str> {
        match &self.source {
            EnvSource::Value(v) => Some(v),
            EnvSource::ValueFrom(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_binding_serializes_as_value() {
        let var = EnvVar::value("MESSAGE_BROKER_HOST", "redis");
        let json = serde_json::to_value(&var).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"name": "MESSAGE_BROKER_HOST", "value": "redis"})
        );
        assert_eq!(var.literal(), Some("redis"));
    }

    #[test]
    fn config_map_binding_serializes_as_value_from() {
        let var = EnvVar::config_map("LOG_LEVEL", "poiesis-config", "LOG_LEVEL");
        let json = serde_json::to_value(&var).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "LOG_LEVEL",
                "valueFrom": {"configMapKeyRef": {"name": "poiesis-config", "key": "LOG_LEVEL"}}
            })
        );
        assert!(var.literal().is_none());
    }

    #[test]
    fn optional_selector_is_emitted_only_when_set() {
        let var = EnvVar::from_selector(
            "MONITOR_TIMEOUT_SECONDS",
            ValueFrom::ConfigMapKeyRef(KeySelector::new("cm", "MONITOR_TIMEOUT_SECONDS").optional()),
        );
        let json = serde_json::to_string(&var).unwrap();
        assert!(json.contains("\"optional\":true"));
    }

    #[test]
    fn secret_binding_deserializes() {
        let json = r#"{"name":"MONGODB_PASSWORD","valueFrom":{"secretKeyRef":{"name":"mongo","key":"password"}}}"#;
        let var: EnvVar = serde_json::from_str(json).unwrap();

        assert_eq!(var, EnvVar::secret("MONGODB_PASSWORD", "mongo", "password"));
    }
}
