//! Recipe token codec.
//!
//! Tokens are the recipe's canonical JSON (struct field order, no extra
//! whitespace) encoded as unpadded URL-safe base64 over UTF-8, so any
//! Unicode input survives and the token drops into a query string as-is.
//!
//! Decoding also accepts tokens minted by the browser build, which used
//! `btoa` (standard alphabet, `=` padding, Latin-1 bytes), including
//! ones where a query parser already turned `+` into a space.
//!
//! A token carrying `+`, `/`, `=` or a space can only be a `btoa` token,
//! so its bytes are read as Latin-1. Other tokens are read as UTF-8, with
//! Latin-1 as the fallback for invalid UTF-8. A legacy token with none of
//! those characters whose Latin-1 bytes are also valid UTF-8 reads as UTF-8.

use crate::error::{CookerError, Result};
use crate::types::SharedRecipe;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;

/// Encode a recipe into a share token. Deterministic for equal recipes.
pub fn encode(recipe: &SharedRecipe) -> String {
    // Infallible: only strings, enums and integers.
    let json = serde_json::to_vec(recipe).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a share token back into a recipe.
///
/// Never panics; any bad input yields `CookerError::MalformedRecipe`.
pub fn decode(token: &str) -> Result<SharedRecipe> {
    let legacy = token
        .trim()
        .contains(|c| matches!(c, '+' | '/' | '=' | ' '));
    let cleaned: String = token
        .trim()
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();
    let cleaned = cleaned.trim_end_matches('=');
    if cleaned.is_empty() {
        return Err(CookerError::MalformedRecipe("empty token".to_string()));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(cleaned)
        .or_else(|_| STANDARD_NO_PAD.decode(cleaned))
        .map_err(|e| CookerError::MalformedRecipe(format!("not base64: {}", e)))?;

    // btoa payloads are one byte per Latin-1 code point.
    let text = if legacy {
        latin1(bytes)
    } else {
        String::from_utf8(bytes).unwrap_or_else(|e| latin1(e.into_bytes()))
    };

    serde_json::from_str::<SharedRecipe>(&text)
        .map_err(|e| CookerError::MalformedRecipe(format!("bad recipe payload: {}", e)))
}

fn latin1(bytes: Vec<u8>) -> String {
    bytes.into_iter().map(char::from).collect()
}
