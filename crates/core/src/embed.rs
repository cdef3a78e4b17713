//! Canonical embeddable links for YouTube videos.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Base of every stored video link.
pub const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// YouTube video ids are 11 characters long.
pub const VIDEO_ID_LEN: usize = 11;

static SHORT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?youtu\.be/([A-Za-z0-9_-]{11})").expect("valid regex")
});

static EMBED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?youtube(?:-nocookie)?\.com/embed/([A-Za-z0-9_-]{11})")
        .expect("valid regex")
});

/// Turn a pasted share URL into `https://www.youtube.com/embed/<id>`.
///
/// Accepted forms:
/// - any URL with a `v=` query parameter (`watch?v=<id>&...`); the id is
///   the first 11 characters after `v=`
/// - `youtu.be/<id>` short links
/// - links that are already in embed form
pub fn youtube_embed_link(raw: &str) -> Result<String, CoreError> {
    let raw = raw.trim();

    if let Some((_, rest)) = raw.split_once("v=") {
        let id: String = rest.chars().take(VIDEO_ID_LEN).collect();
        if id.chars().count() == VIDEO_ID_LEN {
            return Ok(format!("{EMBED_BASE}{id}"));
        }
    } else if let Some(caps) = SHORT_LINK
        .captures(raw)
        .or_else(|| EMBED_LINK.captures(raw))
    {
        return Ok(format!("{EMBED_BASE}{}", &caps[1]));
    }

    Err(CoreError::Validation(format!(
        "'{raw}' is not a recognizable YouTube link"
    )))
}
