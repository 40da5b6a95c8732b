use serde::Deserialize;

use crate::application::errors::ValidationError;

/// A slash command invocation as sent by Slack
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Request {
    pub token: String,
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
}

impl Request {
    /// Request carrying only the free text, as used by the console and tests
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Parse a form-encoded body (`token=...&text=...`)
    ///
    /// Unknown keys are ignored. A body that can't be decoded yields an empty
    /// request, which then fails token validation.
    pub fn from_query(query: &str) -> Self {
        serde_urlencoded::from_str(query).unwrap_or_else(|e| {
            tracing::warn!("Undecodable request body: {}", e);
            Self::default()
        })
    }

    pub fn with_user(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.user_id = id.into();
        self.user_name = name.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Ensure the request comes from the configured Slack team
    pub fn validate(&self, token: &str) -> Result<(), ValidationError> {
        if self.token == token {
            Ok(())
        } else {
            Err(ValidationError::InvalidToken)
        }
    }

    /// Whether the user name or id is contained in the list
    pub fn user_in_list(&self, list: &[String]) -> bool {
        list.iter()
            .any(|entry| entry == &self.user_name || entry == &self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        let request = Request::from_query(
            "token=abc&team_id=T1&user_name=arjen&command=%2Figor&text=weather+Den+Haag",
        );
        assert_eq!(request.token, "abc");
        assert_eq!(request.team_id, "T1");
        assert_eq!(request.user_name, "arjen");
        assert_eq!(request.command, "/igor");
        assert_eq!(request.text, "weather Den Haag");
        assert_eq!(request.channel_id, "");
    }

    #[test]
    fn test_from_query_lenient() {
        let request = Request::from_query("&&text=help&=&token&trigger_id=42");
        assert_eq!(request.text, "help");
        assert_eq!(request.token, "");
    }

    #[test]
    fn test_from_query_undecodable() {
        let request = Request::from_query("token=a&token=b&text=help");
        assert_eq!(request, Request::default());
    }

    #[test]
    fn test_validate() {
        let request = Request::from_text("help").with_token("secret");
        assert!(request.validate("secret").is_ok());
        assert!(matches!(
            request.validate("other"),
            Err(ValidationError::InvalidToken)
        ));
    }

    #[test]
    fn test_user_in_list() {
        let request = Request::from_text("").with_user("U1", "arjen");
        assert!(request.user_in_list(&["arjen".to_string()]));
        assert!(request.user_in_list(&["U1".to_string()]));
        assert!(!request.user_in_list(&["someone".to_string()]));
    }
}
