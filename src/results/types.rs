//! Result type definitions

use crate::locales::{self, SentinelTexts};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response envelope returned by the image search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixabayResponse {
    /// Total number of matches
    pub total: u64,
    /// Number of matches reachable through the API
    #[serde(rename = "totalHits")]
    pub total_hits: u64,
    /// The current page of images
    pub hits: Vec<ImageResult>,
}

/// A single image returned by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Unique id of the image
    pub id: u64,
    /// Comma separated tags
    pub tags: String,
    /// Page on pixabay.com showing the image
    #[serde(rename = "pageURL")]
    pub page_url: String,
    /// Image type (photo, illustration, vector)
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Low resolution preview, max 150px on the long side
    #[serde(rename = "previewURL")]
    pub preview_url: String,
    #[serde(rename = "previewWidth")]
    pub preview_width: u32,
    #[serde(rename = "previewHeight")]
    pub preview_height: u32,
    /// Medium sized image, max 640px on the long side
    #[serde(rename = "webformatURL", default)]
    pub webformat_url: Option<String>,
    #[serde(rename = "webformatWidth", default)]
    pub webformat_width: Option<u32>,
    #[serde(rename = "webformatHeight", default)]
    pub webformat_height: Option<u32>,
    #[serde(rename = "largeImageURL", default)]
    pub large_image_url: Option<String>,
    #[serde(rename = "imageWidth", default)]
    pub image_width: Option<u32>,
    #[serde(rename = "imageHeight", default)]
    pub image_height: Option<u32>,
    #[serde(rename = "imageSize", default)]
    pub image_size: Option<u64>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    /// Author's user id
    #[serde(default)]
    pub user_id: u64,
    /// Author's user name
    pub user: String,
    #[serde(rename = "userImageURL", default)]
    pub user_image_url: Option<String>,
}

impl ImageResult {
    /// Identifier used by the provider contract
    pub fn result_id(&self) -> String {
        self.id.to_string()
    }

    /// Individual tags, trimmed
    pub fn tag_list(&self) -> impl Iterator<Item = &str> {
        self.tags.split(',').map(str::trim).filter(|t| !t.is_empty())
    }

    /// Whether any tag contains `word` as a whole word, ignoring case
    pub fn matches_tag(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.tag_list()
            .flat_map(str::split_whitespace)
            .any(|tag_word| tag_word.to_lowercase() == word)
    }
}

/// The three fixed pseudo-results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentinel {
    Loading,
    Error,
    NothingFound,
}

impl Sentinel {
    pub const ALL: [Sentinel; 3] = [Sentinel::Loading, Sentinel::Error, Sentinel::NothingFound];

    /// Identifier handed to the host
    pub fn id(&self) -> &'static str {
        match self {
            Sentinel::Loading => "__loading__",
            Sentinel::Error => "__error__",
            Sentinel::NothingFound => "__nothing_found__",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn description(&self, texts: &SentinelTexts) -> &'static str {
        match self {
            Sentinel::Loading => texts.loading,
            Sentinel::Error => texts.error,
            Sentinel::NothingFound => texts.nothing_found,
        }
    }
}

/// Everything the cache can hold under an id
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    Sentinel(Sentinel),
    Record(Arc<ImageResult>),
}

impl CacheEntry {
    pub fn as_record(&self) -> Option<&ImageResult> {
        match self {
            CacheEntry::Record(image) => Some(image),
            CacheEntry::Sentinel(_) => None,
        }
    }
}

/// Metadata the host renders for one result
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMeta {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Text copied when the host offers "copy"
    pub clipboard_text: Option<String>,
    /// Icon source, absent for sentinels
    pub icon: Option<IconFactory>,
}

impl ResultMeta {
    /// Metadata for a cached entry
    pub fn from_entry(id: &str, entry: &CacheEntry, texts: &SentinelTexts) -> Self {
        match entry {
            CacheEntry::Sentinel(sentinel) => Self {
                id: id.to_string(),
                name: locales::PROVIDER_NAME.to_string(),
                description: Some(sentinel.description(texts).to_string()),
                clipboard_text: None,
                icon: None,
            },
            CacheEntry::Record(image) => {
                let name = image
                    .tag_list()
                    .next()
                    .map(capitalize)
                    .unwrap_or_else(|| format!("{} #{}", locales::PROVIDER_NAME, image.id));
                Self {
                    id: id.to_string(),
                    name,
                    description: Some(image.tags.clone()),
                    clipboard_text: Some(image.page_url.clone()),
                    icon: Some(IconFactory {
                        url: image.preview_url.clone(),
                        width: image.preview_width,
                        height: image.preview_height,
                    }),
                }
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Produces icons from a preview image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFactory {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// A preview scaled to fit a requested icon size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl IconFactory {
    /// Scale the preview so its long side equals `size`, keeping the aspect ratio
    pub fn create_icon(&self, size: u32) -> Icon {
        let long_side = self.width.max(self.height);
        let (width, height) = if long_side == 0 {
            (size, size)
        } else {
            let scale = |side: u32| ((side as u64 * size as u64) / long_side as u64).max(1) as u32;
            (scale(self.width), scale(self.height))
        };

        Icon {
            url: self.url.clone(),
            width,
            height,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_image(id: u64, tags: &str) -> ImageResult {
    ImageResult {
        id,
        tags: tags.to_string(),
        page_url: format!("https://pixabay.com/photos/{}/", id),
        kind: "photo".to_string(),
        preview_url: format!("https://cdn.pixabay.com/photo/{}_150.jpg", id),
        preview_width: 150,
        preview_height: 100,
        webformat_url: None,
        webformat_width: None,
        webformat_height: None,
        large_image_url: None,
        image_width: None,
        image_height: None,
        image_size: None,
        views: 0,
        downloads: 0,
        likes: 0,
        comments: 0,
        user_id: 1,
        user: "someone".to_string(),
        user_image_url: None,
    }
}
