//! Typed callback payload shapes.
//!
//! Each recognized `type` tag has its own strict schema. Unrecognized tags
//! become [`InboundCallback::Unknown`]; a recognized tag whose routing field
//! is absent or not a string becomes [`InboundCallback::Incomplete`].

use std::fmt;

use serde::de::{Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

/// The callback shapes the gateway knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Shortcut,
    ViewSubmission,
    BlockActions,
}

impl CallbackKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "shortcut" => Some(Self::Shortcut),
            "view_submission" => Some(Self::ViewSubmission),
            "block_actions" => Some(Self::BlockActions),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shortcut => "shortcut",
            Self::ViewSubmission => "view_submission",
            Self::BlockActions => "block_actions",
        }
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundCallback {
    Shortcut { callback_id: String },
    ViewSubmission { view: View },
    /// Only the first entry of `actions` is kept.
    BlockActions { action: BlockAction },
    /// Recognized type, but its routing field is missing or not a string.
    Incomplete { kind: CallbackKind },
    /// Any type the gateway does not route on.
    Unknown { kind: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct View {
    pub callback_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockAction {
    pub action_id: String,
}

/// Reads just the tag of a payload.
#[derive(Deserialize)]
struct TypeTag {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct ShortcutPayload {
    callback_id: String,
}

#[derive(Deserialize)]
struct ViewSubmissionPayload {
    view: View,
}

#[derive(Deserialize)]
struct BlockActionsPayload {
    #[serde(deserialize_with = "first_element")]
    actions: Option<BlockAction>,
}

impl InboundCallback {
    /// Decode a payload document by reading its tag, then the matching schema.
    ///
    /// Returns `None` when the document is not an object with a string `type`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let tag = TypeTag::deserialize(value).ok()?;

        let Some(kind) = CallbackKind::from_tag(&tag.kind) else {
            return Some(Self::Unknown { kind: tag.kind });
        };

        let parsed = match kind {
            CallbackKind::Shortcut => ShortcutPayload::deserialize(value)
                .ok()
                .map(|p| Self::Shortcut {
                    callback_id: p.callback_id,
                }),
            CallbackKind::ViewSubmission => ViewSubmissionPayload::deserialize(value)
                .ok()
                .map(|p| Self::ViewSubmission { view: p.view }),
            CallbackKind::BlockActions => BlockActionsPayload::deserialize(value)
                .ok()
                .and_then(|p| p.actions)
                .map(|action| Self::BlockActions { action }),
        };

        Some(parsed.unwrap_or(Self::Incomplete { kind }))
    }

    /// The callback identifier this payload is routed on, if any.
    pub fn callback_id(&self) -> Option<&str> {
        match self {
            Self::Shortcut { callback_id } => Some(callback_id),
            Self::ViewSubmission { view } => Some(&view.callback_id),
            Self::BlockActions { action } => Some(&action.action_id),
            Self::Incomplete { .. } | Self::Unknown { .. } => None,
        }
    }

    /// The payload's `type` tag.
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Shortcut { .. } => CallbackKind::Shortcut.as_str(),
            Self::ViewSubmission { .. } => CallbackKind::ViewSubmission.as_str(),
            Self::BlockActions { .. } => CallbackKind::BlockActions.as_str(),
            Self::Incomplete { kind } => kind.as_str(),
            Self::Unknown { kind } => kind,
        }
    }
}

/// Deserialize the first element of a sequence and skip the rest unchecked.
fn first_element<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct FirstVisitor<T>(std::marker::PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for FirstVisitor<T> {
        type Value = Option<T>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a sequence")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let first = seq.next_element::<T>()?;
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(first)
        }
    }

    deserializer.deserialize_seq(FirstVisitor(std::marker::PhantomData))
}
