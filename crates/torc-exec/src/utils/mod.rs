mod env;
pub use env::{compose_env, config_map_env};

mod security;
pub use security::{container_security_context, pod_security_context};
