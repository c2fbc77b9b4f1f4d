//! Share links: `https://<host>/?recipe=<token>`.

use super::codec;
use crate::types::SharedRecipe;
use url::Url;

/// Query parameter carrying the token.
pub const RECIPE_PARAM: &str = "recipe";

/// Common URL length practice. Longer links are still produced, with a warning.
pub const PORTABLE_URL_LEN: usize = 2000;

/// Build the share link for a recipe.
///
/// `host` is a bare host (`promptcooker.app`) or a full base URL
/// (`http://localhost:5173`).
pub fn share_link(host: &str, recipe: &SharedRecipe) -> String {
    let host = host.trim().trim_end_matches('/');
    let base = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };
    let link = format!("{}/?{}={}", base, RECIPE_PARAM, codec::encode(recipe));
    if link.len() > PORTABLE_URL_LEN {
        log::warn!(
            "[RECIPE] Share link is {} chars (over {}); some apps may cut it off",
            link.len(),
            PORTABLE_URL_LEN
        );
    }
    link
}

/// Pull the recipe token out of an address, if it carries one.
///
/// The value is form-decoded, so a legacy `+` may arrive as a space;
/// `codec::decode` accounts for that.
pub fn extract_token(address: &str) -> Option<String> {
    let url = Url::parse(address.trim()).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == RECIPE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// The address with the recipe parameter removed, other parameters kept.
///
/// Returns `None` when the address does not parse.
pub fn strip_recipe_param(address: &str) -> Option<String> {
    let mut url = Url::parse(address.trim()).ok()?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != RECIPE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    Some(url.to_string())
}
