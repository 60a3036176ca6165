use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::EnvVar;

/// Ordered list of environment bindings for a workload container.
///
/// Insertion order is preserved on the wire. Lookups resolve duplicate names
/// to the last declaration, which is also how the scheduler resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(pub Vec<EnvVar>);

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &EnvVar> {
        self.0.iter()
    }

    /// Append a binding.
    pub fn push(&mut self, var: EnvVar) {
        self.0.push(var);
    }

    /// Append a literal binding.
    pub fn push_value<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.0.push(EnvVar::value(name, value));
    }

    /// Effective binding for `name` (last declaration wins).
    pub fn get(&self, name: &str) -> Option<&EnvVar> {
        self.0.iter().rev().find(|v| v.name() == name)
    }

    /// Append every binding of `other`, keeping its order.
    pub fn extend(&mut self, other: Env) {
        self.0.extend(other.0);
    }

    /// Concatenate two environments; entries from `other` come last and win on lookup.
    pub fn merged(&self, other: &Env) -> Env {
        let mut out = self.0.clone();
        out.extend(other.0.iter().cloned());
        Env(out)
    }

    /// Variable names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(EnvVar::name)
    }

    /// First name declared more than once, if any.
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::with_capacity(self.0.len());
        self.names().find(|name| !seen.insert(*name))
    }
}

impl FromIterator<EnvVar> for Env {
    fn from_iter<I: IntoIterator<Item = EnvVar>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Env {
    type Item = EnvVar;
    type IntoIter = std::vec::IntoIter<EnvVar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Env;
    use crate::EnvVar;

    #[test]
    fn env_new_is_empty() {
        let env = Env::new();
        assert!(env.is_empty());
        assert!(env.get("FOO").is_none());
    }

    #[test]
    fn later_declaration_wins_on_lookup() {
        let mut env = Env::new();
        env.push_value("FOO", "one");
        env.push_value("BAR", "x");
        env.push_value("FOO", "two");

        assert_eq!(env.get("FOO").and_then(EnvVar::literal), Some("two"));
        assert_eq!(env.get("BAR").and_then(EnvVar::literal), Some("x"));
        assert_eq!(env.len(), 3, "duplicates are kept on the wire");
    }

    #[test]
    fn merged_appends_other_after_base() {
        let base: Env = [EnvVar::value("FOO", "base"), EnvVar::value("BAR", "bar")]
            .into_iter()
            .collect();
        let other: Env = [EnvVar::value("FOO", "phase")].into_iter().collect();

        let merged = base.merged(&other);

        let names: Vec<_> = merged.names().collect();
        assert_eq!(names, ["FOO", "BAR", "FOO"]);
        assert_eq!(merged.get("FOO").and_then(EnvVar::literal), Some("phase"));
    }

    #[test]
    fn first_duplicate_reports_collision() {
        let mut env = Env::new();
        env.push_value("A", "1");
        env.push_value("B", "2");
        assert_eq!(env.first_duplicate(), None);

        env.push(EnvVar::config_map("A", "cm", "A"));
        assert_eq!(env.first_duplicate(), Some("A"));
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut env = Env::new();
        env.push_value("FOO", "bar");

        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"[{"name":"FOO","value":"bar"}]"#);

        let back: Env = serde_json::from_str(&json).unwrap();
        assert_eq!(back, env);
    }
}
