use std::sync::Arc;

use mailparse::MailHeaderMap;

use crate::{error::MessageParseError, status::Status};

/// The view of an inbound message handed to a hook.
///
/// Header lookups are case-insensitive and return the first matching
/// header. Hooks only read headers; the only thing they write back is
/// [`Context::response`].
#[derive(Debug, Default, Clone)]
pub struct Context {
    pub id: String,
    headers: Vec<(String, String)>,
    pub data: Option<Arc<[u8]>>,
    pub response: Option<(Status, String)>,
}

impl Context {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Build a context from a raw RFC 5322 message.
    ///
    /// Folded headers are unfolded and encoded words decoded, so lookups
    /// see the same value a mail client would display.
    ///
    /// # Errors
    /// Returns an error if the data is empty or the header block cannot
    /// be parsed.
    pub fn from_message(id: impl Into<String>, data: &[u8]) -> Result<Self, MessageParseError> {
        if data.is_empty() {
            return Err(MessageParseError::Empty);
        }

        let (parsed, _) = mailparse::parse_headers(data)?;

        Ok(Self {
            id: id.into(),
            headers: parsed
                .iter()
                .map(|header| (header.get_key(), header.get_value()))
                .collect(),
            data: Some(Arc::from(data)),
            response: None,
        })
    }

    /// Look up the `Message-ID` of a raw message without building a context
    pub fn message_id(data: &[u8]) -> Option<String> {
        mailparse::parse_headers(data)
            .ok()
            .and_then(|(headers, _)| headers.get_first_value("Message-ID"))
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Case-insensitive lookup of the first header called `name`
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}
