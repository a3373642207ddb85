use serde::Serialize;

use crate::token::ReplyToken;

/// Body of a thread search request.
///
/// Serializes to exactly `{"emailMessageId": "<token>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationRequest {
    #[serde(rename = "emailMessageId")]
    email_message_id: String,
}

impl VerificationRequest {
    pub fn email_message_id(&self) -> &str {
        &self.email_message_id
    }
}

impl From<&ReplyToken> for VerificationRequest {
    fn from(token: &ReplyToken) -> Self {
        Self {
            email_message_id: token.as_str().to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::VerificationRequest;
    use crate::token::ReplyToken;

    #[test]
    fn test_body_shape() {
        let token = ReplyToken::new("  <thread-42@example.org> ").unwrap();
        let request = VerificationRequest::from(&token);

        assert_eq!(request.email_message_id(), "<thread-42@example.org>");
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"emailMessageId":"<thread-42@example.org>"}"#
        );
    }

    #[test]
    fn test_body_escapes() {
        let token = ReplyToken::new(r#"<"quoted"@example.org>"#).unwrap();

        assert_eq!(
            serde_json::to_value(VerificationRequest::from(&token)).unwrap(),
            serde_json::json!({ "emailMessageId": "<\"quoted\"@example.org>" })
        );
    }
}
