use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::errors::{RelayError, RelayResult};

/// Body of `POST /_api/v3/openai/edit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub ai_assistant_id: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
}

impl EditRequest {
    pub fn new(user_message: &str, markdown: &str, thread_id: Option<&str>) -> Self {
        Self {
            user_message: Some(user_message.to_string()),
            markdown: Some(markdown.to_string()),
            ai_assistant_id: None,
            thread_id: thread_id.map(str::to_string),
        }
    }

    /// Build from a loosely typed body. Required fields with the wrong type
    /// are left unset so `validate` reports them; optional fields with the
    /// wrong type are rejected here.
    pub fn from_value(body: &Value) -> RelayResult<Self> {
        if !body.is_object() {
            return Err(RelayError::validation_error("body", "body must be a JSON object"));
        }

        let text = |field: &str| body.get(field).and_then(Value::as_str).map(str::to_string);
        let optional_text = |field: &str| -> RelayResult<Option<String>> {
            match body.get(field) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(value)) => Ok(Some(value.clone())),
                Some(_) => Err(RelayError::validation_error(field, &format!("{} must be string", field))),
            }
        };

        Ok(Self {
            user_message: text("userMessage"),
            markdown: text("markdown"),
            ai_assistant_id: optional_text("aiAssistantId")?,
            thread_id: optional_text("threadId")?,
        })
    }

    /// Field checks first, then the thread id. Returns the thread id.
    pub fn validate(&self) -> RelayResult<&str> {
        Self::require_text("userMessage", self.user_message.as_deref())?;
        Self::require_text("markdown", self.markdown.as_deref())?;

        if let Some(assistant_id) = &self.ai_assistant_id {
            if !Self::is_object_id(assistant_id) {
                return Err(RelayError::validation_error("aiAssistantId", "must be a 24-digit hex id"));
            }
        }

        match self.thread_id.as_deref() {
            Some(thread_id) if !thread_id.is_empty() => Ok(thread_id),
            _ => Err(RelayError::UpstreamThreadMissing),
        }
    }

    pub fn user_message(&self) -> &str {
        self.user_message.as_deref().unwrap_or_default()
    }

    pub fn markdown(&self) -> &str {
        self.markdown.as_deref().unwrap_or_default()
    }

    fn require_text(field: &str, value: Option<&str>) -> RelayResult<()> {
        match value {
            None => Err(RelayError::validation_error(field, &format!("{} must be string", field))),
            Some(text) if text.is_empty() => {
                Err(RelayError::validation_error(field, &format!("{} must be set", field)))
            }
            Some(_) => Ok(()),
        }
    }

    fn is_object_id(value: &str) -> bool {
        value.len() == 24 && value.chars().all(|c| c.is_ascii_hexdigit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_complete_request() {
        let request = EditRequest::new("fix typo", "# Title", Some("thread_1"));
        assert_eq!(request.validate().unwrap(), "thread_1");
    }

    #[test]
    fn missing_thread_is_its_own_error() {
        let request = EditRequest::new("fix typo", "# Title", None);
        assert!(matches!(request.validate(), Err(RelayError::UpstreamThreadMissing)));
    }

    #[test]
    fn field_errors_come_before_thread_check() {
        let request = EditRequest::new("", "# Title", None);
        match request.validate() {
            Err(RelayError::ValidationError { field, constraint }) => {
                assert_eq!(field, "userMessage");
                assert_eq!(constraint, "userMessage must be set");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn loose_body_reports_wrong_types() {
        let request = EditRequest::from_value(&serde_json::json!({"userMessage": 5, "markdown": "m", "threadId": "t"})).unwrap();
        match request.validate() {
            Err(RelayError::ValidationError { constraint, .. }) => assert_eq!(constraint, "userMessage must be string"),
            other => panic!("unexpected {:?}", other),
        }

        assert!(EditRequest::from_value(&serde_json::json!({"threadId": 7})).is_err());
        assert!(EditRequest::from_value(&serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn parses_camel_case_body() {
        let request: EditRequest = serde_json::from_str(
            r#"{"userMessage":"u","markdown":"m","aiAssistantId":"0123456789abcdef01234567","threadId":"t"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        let bad: EditRequest =
            serde_json::from_str(r#"{"userMessage":"u","markdown":"m","aiAssistantId":"nope","threadId":"t"}"#)
                .unwrap();
        assert!(bad.validate().is_err());
    }
}
