use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{ModelError, ModelResult};

/// When the node pulls the workload image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImagePullPolicy {
    Always,
    #[default]
    IfNotPresent,
    Never,
}

impl fmt::Display for ImagePullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImagePullPolicy::Always => "Always",
            ImagePullPolicy::IfNotPresent => "IfNotPresent",
            ImagePullPolicy::Never => "Never",
        })
    }
}

impl FromStr for ImagePullPolicy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ImagePullPolicy::Always),
            "ifnotpresent" | "if-not-present" | "" => Ok(ImagePullPolicy::IfNotPresent),
            "never" => Ok(ImagePullPolicy::Never),
            other => Err(ModelError::UnknownPullPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("ALWAYS".parse::<ImagePullPolicy>().unwrap(), ImagePullPolicy::Always);
        assert_eq!("IfNotPresent".parse::<ImagePullPolicy>().unwrap(), ImagePullPolicy::IfNotPresent);
        assert!("sometimes".parse::<ImagePullPolicy>().is_err());
    }
}
