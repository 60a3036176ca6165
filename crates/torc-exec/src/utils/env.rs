//! Environment shared by every phase workload.
//!
//! Groups, in order: message broker, database, object store, secret names, config map names,
//! then the workload image and `LOG_LEVEL` (read from the config map so verbosity changes
//! without rebuilding jobs).
use torc_core::{CoreError, TorcConfig};
use torc_model::{Env, EnvVar};

const LOG_LEVEL: &str = "LOG_LEVEL";

/// Compose the shared environment for `cfg`.
///
/// Pure. Fails with [`CoreError::DuplicateEnv`] if two groups bind the same name.
pub fn compose_env(cfg: &TorcConfig) -> Result<Env, CoreError> {
    let groups = [
        broker_env(cfg),
        database_env(cfg),
        object_store_env(cfg),
        secret_name_env(cfg),
        configmap_name_env(cfg),
        runtime_env(cfg),
    ];

    let mut env = Env::new();
    for group in groups {
        env.extend(group);
    }
    if let Some(dup) = env.first_duplicate() {
        return Err(CoreError::DuplicateEnv(dup.to_string()));
    }
    Ok(env)
}

/// Bind each of `keys` to the same-named key of the core config map.
pub fn config_map_env(cfg: &TorcConfig, keys: &[&str]) -> Env {
    keys.iter()
        .map(|key| EnvVar::config_map(*key, &cfg.kubernetes.configmap_name, *key))
        .collect()
}

fn broker_env(cfg: &TorcConfig) -> Env {
    let broker = &cfg.message_broker;
    let mut env = Env::new();
    env.push_value("MESSAGE_BROKER_HOST", &broker.host);
    env.push_value("MESSAGE_BROKER_PORT", broker.port.to_string());
    env.push(EnvVar::secret("MESSAGE_BROKER_PASSWORD", &broker.secret, "password"));
    env
}

fn database_env(cfg: &TorcConfig) -> Env {
    let mongo = &cfg.mongodb;
    let mut env = Env::new();
    env.push_value("MONGODB_HOST", &mongo.host);
    env.push_value("MONGODB_PORT", mongo.port.to_string());
    env.push_value("MONGODB_DATABASE", &mongo.database);
    env.push_value("MONGODB_MAX_POOL_SIZE", mongo.max_pool_size.to_string());
    env.push(EnvVar::secret("MONGODB_USER", &mongo.secret, "MONGODB_USER"));
    env.push(EnvVar::secret("MONGODB_PASSWORD", &mongo.secret, "MONGODB_PASSWORD"));
    env
}

fn object_store_env(cfg: &TorcConfig) -> Env {
    let s3 = &cfg.s3;
    let mut env = Env::new();
    env.push_value("S3_URL", &s3.url);
    env.push(EnvVar::secret("AWS_ACCESS_KEY_ID", &s3.secret, "AWS_ACCESS_KEY_ID"));
    env.push(EnvVar::secret("AWS_SECRET_ACCESS_KEY", &s3.secret, "AWS_SECRET_ACCESS_KEY"));
    env
}

// Names are forwarded so the execution workload can wire the executor pods it spawns.
fn secret_name_env(cfg: &TorcConfig) -> Env {
    let mut env = Env::new();
    env.push_value("POIESIS_REDIS_SECRET_NAME", &cfg.message_broker.secret);
    env.push_value("POIESIS_MONGO_SECRET_NAME", &cfg.mongodb.secret);
    env.push_value("POIESIS_S3_SECRET_NAME", &cfg.s3.secret);
    env
}

fn configmap_name_env(cfg: &TorcConfig) -> Env {
    let mut env = Env::new();
    env.push_value("POIESIS_CORE_CONFIGMAP_NAME", &cfg.kubernetes.configmap_name);
    env
}

fn runtime_env(cfg: &TorcConfig) -> Env {
    let mut env = Env::new();
    env.push_value("POIESIS_IMAGE", &cfg.kubernetes.image);
    env.extend(config_map_env(cfg, &[LOG_LEVEL]));
    env
}

#[cfg(test)]
mod tests {
    use torc_model::{EnvSource, KeySelector, ValueFrom};

    use super::*;

    #[test]
    fn composed_env_has_no_duplicates() {
        let env = compose_env(&TorcConfig::default()).unwrap();
        assert!(env.first_duplicate().is_none());
        assert!(!env.is_empty());
    }

    #[test]
    fn fixed_entries_close_the_list() {
        let cfg = TorcConfig::default();
        let env = compose_env(&cfg).unwrap();
        let vars: Vec<_> = env.iter().collect();
        let n = vars.len();

        assert_eq!(vars[n - 2].name(), "POIESIS_IMAGE");
        assert_eq!(vars[n - 2].literal(), Some(cfg.kubernetes.image.as_str()));
        assert_eq!(vars[n - 1].name(), "LOG_LEVEL");
        assert_eq!(
            vars[n - 1].source(),
            &EnvSource::ValueFrom(ValueFrom::ConfigMapKeyRef(KeySelector::new(
                cfg.kubernetes.configmap_name.as_str(),
                "LOG_LEVEL"
            )))
        );
    }

    #[test]
    fn groups_keep_insertion_order() {
        let env = compose_env(&TorcConfig::default()).unwrap();
        let names: Vec<_> = env.names().collect();
        let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();

        assert!(pos("MESSAGE_BROKER_HOST") < pos("MONGODB_HOST"));
        assert!(pos("MONGODB_HOST") < pos("S3_URL"));
        assert!(pos("S3_URL") < pos("POIESIS_MONGO_SECRET_NAME"));
        assert!(pos("POIESIS_MONGO_SECRET_NAME") < pos("POIESIS_CORE_CONFIGMAP_NAME"));
    }

    #[test]
    fn values_follow_configuration() {
        let mut cfg = TorcConfig::default();
        cfg.message_broker.port = 6380;
        cfg.mongodb.secret = "db-creds".into();

        let env = compose_env(&cfg).unwrap();

        assert_eq!(env.get("MESSAGE_BROKER_PORT").unwrap().literal(), Some("6380"));
        assert_eq!(
            env.get("MONGODB_PASSWORD").unwrap().source(),
            &EnvSource::ValueFrom(ValueFrom::SecretKeyRef(KeySelector::new(
                "db-creds",
                "MONGODB_PASSWORD"
            )))
        );
    }
}
