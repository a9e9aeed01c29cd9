//! Callback payload decoding.
//!
//! # Data Flow
//! ```text
//! buffered body bytes (application/x-www-form-urlencoded)
//!     → decode.rs (form field `payload` → JSON document)
//!     → callback.rs (read `type`, dispatch to that variant's schema)
//!     → InboundCallback → RoutingKey (possibly empty)
//! ```
//!
//! # Design Decisions
//! - Pure: operates on a borrowed copy of the body
//! - Unrecognized or incomplete payloads are not errors; they carry no key
//! - Only undecodable bodies produce a [`DecodeError`]

pub mod callback;
pub mod decode;

pub use callback::{BlockAction, CallbackKind, InboundCallback, View};
pub use decode::{decode, extract_routing_key, DecodeError, DecodedCallback, PAYLOAD_FIELD};
