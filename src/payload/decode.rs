//! Form body → callback payload → routing key.

use serde_json::Value;
use thiserror::Error;
use url::form_urlencoded;

use crate::payload::callback::InboundCallback;
use crate::routing::RoutingKey;

/// Form field carrying the JSON payload.
pub const PAYLOAD_FIELD: &str = "payload";

/// Why a body could not be decoded into a callback.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("body is not a valid url-encoded form")]
    MalformedBody,

    #[error("form has no `payload` field")]
    MissingPayload,

    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("payload has no string `type` field")]
    MissingType,
}

impl DecodeError {
    /// Short label used for log fields and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MalformedBody => "malformed_body",
            Self::MissingPayload => "missing_payload",
            Self::InvalidJson(_) => "invalid_json",
            Self::MissingType => "missing_type",
        }
    }
}

/// A successfully decoded callback and the payload text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCallback {
    /// The JSON text of the `payload` field, kept for the request log.
    pub payload: String,
    pub callback: InboundCallback,
}

impl DecodedCallback {
    /// Routing key of the callback; empty when the payload carries none.
    pub fn routing_key(&self) -> RoutingKey {
        RoutingKey::new(self.callback.callback_id().unwrap_or_default())
    }
}

/// Decode a buffered `application/x-www-form-urlencoded` callback body.
///
/// Works on a borrowed copy; the caller keeps the bytes for forwarding.
pub fn decode(body: &[u8]) -> Result<DecodedCallback, DecodeError> {
    let payload = payload_field(body)?;
    let value: Value = serde_json::from_str(&payload)?;
    let callback = InboundCallback::from_value(&value).ok_or(DecodeError::MissingType)?;

    Ok(DecodedCallback { payload, callback })
}

/// Decode a body straight to its routing key.
pub fn extract_routing_key(body: &[u8]) -> Result<RoutingKey, DecodeError> {
    decode(body).map(|decoded| decoded.routing_key())
}

/// The first `payload` value of the form.
fn payload_field(body: &[u8]) -> Result<String, DecodeError> {
    std::str::from_utf8(body).map_err(|_| DecodeError::MalformedBody)?;

    form_urlencoded::parse(body)
        .find(|(name, _)| name == PAYLOAD_FIELD)
        .map(|(_, value)| value.into_owned())
        .ok_or(DecodeError::MissingPayload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::callback::CallbackKind;

    /// Url-encode a JSON payload as the platform sends it.
    fn form(payload: &str) -> Vec<u8> {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(PAYLOAD_FIELD, payload)
            .finish()
            .into_bytes()
    }

    #[test]
    fn test_shortcut_routing_key_is_normalized() {
        let body = form(r#"{"type":"shortcut","callback_id":"approve_req__42"}"#);
        let key = extract_routing_key(&body).unwrap();
        assert_eq!(key.raw(), "approve_req__42");
        assert_eq!(key.normalized(), "approve_req");
    }

    #[test]
    fn test_view_submission_uses_view_callback_id() {
        let body = form(
            r#"{"type":"view_submission","callback_id":"outer","view":{"callback_id":"form_submit__abc123"}}"#,
        );
        assert_eq!(extract_routing_key(&body).unwrap().normalized(), "form_submit");
    }

    #[test]
    fn test_block_actions_uses_first_action() {
        let body = form(
            r#"{"type":"block_actions","actions":[{"action_id":"deny__7"},{"action_id":"approve__8"}]}"#,
        );
        assert_eq!(extract_routing_key(&body).unwrap().raw(), "deny__7");
    }

    #[test]
    fn test_unhandled_type_yields_empty_key() {
        let body = form(r#"{"type":"message","callback_id":"approve_req"}"#);
        let decoded = decode(&body).unwrap();
        assert_eq!(decoded.callback, InboundCallback::Unknown { kind: "message".into() });
        assert!(decoded.routing_key().is_empty());
    }

    #[test]
    fn test_missing_routing_field_yields_empty_key() {
        let body = form(r#"{"type":"view_submission","view":{}}"#);
        let decoded = decode(&body).unwrap();
        assert_eq!(
            decoded.callback,
            InboundCallback::Incomplete { kind: CallbackKind::ViewSubmission }
        );
        assert!(decoded.routing_key().is_empty());
    }

    #[test]
    fn test_payload_text_is_kept() {
        let json = r#"{"type":"shortcut","callback_id":"a b&c=d"}"#;
        let decoded = decode(&form(json)).unwrap();
        assert_eq!(decoded.payload, json);
        assert_eq!(decoded.callback.callback_id(), Some("a b&c=d"));
    }

    #[test]
    fn test_first_payload_field_wins() {
        let body = b"token=abc&payload=%7B%22type%22%3A%22shortcut%22%2C%22callback_id%22%3A%22first%22%7D&payload=ignored";
        assert_eq!(extract_routing_key(body).unwrap().raw(), "first");
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let body = form(r#"{"type":"shortcut","callback_id":"approve_req__42"}"#);
        assert_eq!(decode(&body).unwrap(), decode(&body).unwrap());
    }

    #[test]
    fn test_failures() {
        assert!(matches!(decode(&[0xff, 0xfe, 0x00]), Err(DecodeError::MalformedBody)));
        assert!(matches!(decode(b"token=abc"), Err(DecodeError::MissingPayload)));
        assert!(matches!(decode(b""), Err(DecodeError::MissingPayload)));
        assert!(matches!(decode(&form("{not json")), Err(DecodeError::InvalidJson(_))));
        assert!(matches!(decode(&form("")), Err(DecodeError::InvalidJson(_))));
        assert!(matches!(decode(&form(r#"{"callback_id":"x"}"#)), Err(DecodeError::MissingType)));
        assert!(matches!(decode(&form(r#"{"type":1}"#)), Err(DecodeError::MissingType)));
        assert!(matches!(decode(&form(r#""shortcut""#)), Err(DecodeError::MissingType)));
    }

    #[test]
    fn test_error_labels() {
        assert_eq!(DecodeError::MalformedBody.label(), "malformed_body");
        assert_eq!(DecodeError::MissingType.to_string(), "payload has no string `type` field");
    }
}
