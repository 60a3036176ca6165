use serde::{Deserialize, Serialize};

/// Terminal status a workload reports on its completion channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    #[serde(rename = "OK", alias = "ok")]
    Ok,
    #[serde(rename = "ERROR", alias = "error")]
    Error,
}

/// Payload published by a phase workload when it finishes.
///
/// Wire shape: `{"status": "OK" | "ERROR", "message": "<text>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub status: MessageStatus,
    #[serde(default)]
    pub message: String,
}

impl CompletionMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: MessageStatus::Ok,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: MessageStatus::Error,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.status == MessageStatus::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_status_and_message() {
        let json = serde_json::to_value(CompletionMessage::error("disk full")).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ERROR", "message": "disk full"}));
    }

    #[test]
    fn accepts_lowercase_status() {
        let msg: CompletionMessage =
            serde_json::from_str(r#"{"status":"ok","message":"done"}"#).unwrap();
        assert_eq!(msg, CompletionMessage::ok("done"));
        assert!(!msg.is_error());
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(serde_json::from_str::<CompletionMessage>(r#"{"status":"MAYBE"}"#).is_err());
    }
}
