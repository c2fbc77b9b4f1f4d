//! Recipe sharing: compact, URL-safe tokens for `(userInput, tuningOptions)`.
//!
//! - **codec**: recipe ⇄ token (JSON, then unpadded URL-safe base64)
//! - **link**: build `https://<host>/?recipe=<token>`, pull the token back
//!   out of an address, strip it after import

pub mod codec;
pub mod link;

pub use codec::{decode, encode};
pub use link::{extract_token, share_link, strip_recipe_param, RECIPE_PARAM};
