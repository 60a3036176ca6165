use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{ModelError, ModelResult};

/// Pod restart policy of a job.
///
/// Jobs only accept `Never` and `OnFailure`; retries across pods are bounded by the backoff limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    #[default]
    Never,
    OnFailure,
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RestartPolicy::Never => "Never",
            RestartPolicy::OnFailure => "OnFailure",
        })
    }
}

impl FromStr for RestartPolicy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" | "" => Ok(RestartPolicy::Never),
            "onfailure" | "on-failure" | "failure" => Ok(RestartPolicy::OnFailure),
            other => Err(ModelError::UnknownRestart(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scheduler_and_short_spellings() {
        assert_eq!("Never".parse::<RestartPolicy>().unwrap(), RestartPolicy::Never);
        assert_eq!("OnFailure".parse::<RestartPolicy>().unwrap(), RestartPolicy::OnFailure);
        assert_eq!("on-failure".parse::<RestartPolicy>().unwrap(), RestartPolicy::OnFailure);
    }

    #[test]
    fn always_is_not_a_job_policy() {
        assert!(matches!(
            "Always".parse::<RestartPolicy>(),
            Err(ModelError::UnknownRestart(_))
        ));
    }

    #[test]
    fn serializes_in_scheduler_spelling() {
        assert_eq!(serde_json::to_string(&RestartPolicy::OnFailure).unwrap(), r#""OnFailure""#);
        assert_eq!(RestartPolicy::Never.to_string(), "Never");
    }
}
