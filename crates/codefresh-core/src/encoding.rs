//! path encoding for hermes event identifiers.

use std::borrow::Cow;

/// encode a single path component the way `encodeURIComponent` does for
/// event ids: spaces become `%20` and `*` is left literal.
pub fn encode_component(value: &str) -> String {
    let encoded: Cow<'_, str> = urlencoding::encode(value);
    encoded.replace("%2A", "*")
}

/// encode an event id twice for use in a request path.
///
/// the api decodes the path once before doing its own decoding, so event ids
/// must arrive double-encoded or the trigger lookup misses.
pub fn double_encode(event: &str) -> String {
    encode_component(&encode_component(event))
}
