//! Documents stored in the `videos`, `categories` and `history` collections.
//!
//! Field names follow the store's camelCase document format.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::embed;
use crate::error::CoreError;
use crate::types::{flexible_id, EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// A catalogued video. Media is referenced by link only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: EntityId,
    pub title: String,
    pub img_url: String,
    /// Canonical embeddable URL, derived once when the video is added.
    pub video_link: String,
}

/// A named group of videos.
///
/// `all_videos` is the authoritative membership list, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: EntityId,
    pub category_name: String,
    #[serde(default)]
    pub all_videos: Vec<Video>,
}

impl Category {
    pub fn contains(&self, video_id: &str) -> bool {
        self.all_videos.iter().any(|v| v.id == video_id)
    }

    /// Append `video` unless a member with the same id is already present.
    ///
    /// Returns `true` if the membership list changed.
    pub fn append_video(&mut self, video: Video) -> bool {
        if self.contains(&video.id) {
            return false;
        }
        self.all_videos.push(video);
        true
    }

    /// Remove every member with the given id.
    ///
    /// Returns `true` if the membership list changed.
    pub fn remove_video(&mut self, video_id: &str) -> bool {
        let before = self.all_videos.len();
        self.all_videos.retain(|v| v.id != video_id);
        self.all_videos.len() != before
    }
}

/// A record of a video being watched. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flexible_id::option::deserialize"
    )]
    pub id: Option<EntityId>,
    pub title: String,
    pub video_link: String,
    pub time_stamp: Timestamp,
}

impl HistoryEntry {
    /// Build the entry recorded when `video` is opened for viewing.
    pub fn viewed(video: &Video, at: Timestamp) -> Self {
        Self {
            id: None,
            title: video.title.clone(),
            video_link: video.video_link.clone(),
            time_stamp: at,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for adding a video to the catalog.
///
/// `url` is whatever link the user pasted; it is turned into the canonical
/// embeddable link by [`NewVideo::into_video`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewVideo {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub img_url: String,
    #[validate(length(min = 1))]
    pub url: String,
}

impl NewVideo {
    /// Validate the input and derive the stored [`Video`].
    pub fn into_video(self) -> Result<Video, CoreError> {
        if let Err(errors) = self.validate() {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|k| k.to_string())
                .collect();
            fields.sort();
            return Err(CoreError::Validation(format!(
                "Please fill the missing details: {}",
                fields.join(", ")
            )));
        }

        let video_link = embed::youtube_embed_link(&self.url)?;
        Ok(Video {
            id: self.id,
            title: self.title,
            img_url: self.img_url,
            video_link,
        })
    }
}

/// Input for creating a category. New categories start empty.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCategory {
    #[validate(length(min = 1))]
    pub category_name: String,
}

impl NewCategory {
    pub fn validated(self) -> Result<Self, CoreError> {
        if self.category_name.trim().is_empty() || self.validate().is_err() {
            return Err(CoreError::Validation(
                "Please add a category name".to_string(),
            ));
        }
        Ok(self)
    }
}
