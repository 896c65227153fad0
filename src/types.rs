//! Type definitions for px-gallery
//!
//! Source of truth for all data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, FetchErrorKind};

// ============================================
// Kind & Mode Types
// ============================================

/// Which half of the catalog is being browsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Photo, MediaKind::Video];

    /// The closed set of retrieval modes this kind supports
    pub fn modes(self) -> &'static [RetrievalMode] {
        match self {
            Self::Photo => &[
                RetrievalMode::Curated,
                RetrievalMode::Search,
                RetrievalMode::Random,
            ],
            Self::Video => &[
                RetrievalMode::Popular,
                RetrievalMode::Search,
                RetrievalMode::Random,
            ],
        }
    }

    /// Editorial listing mode: curated photos, popular videos
    pub fn listing_mode(self) -> RetrievalMode {
        match self {
            Self::Photo => RetrievalMode::Curated,
            Self::Video => RetrievalMode::Popular,
        }
    }

    pub fn default_mode(self) -> RetrievalMode {
        self.listing_mode()
    }

    /// Path segment used by the catalog routes
    pub fn path(self) -> &'static str {
        match self {
            Self::Photo => "photos",
            Self::Video => "videos",
        }
    }

    pub fn other(self) -> MediaKind {
        match self {
            Self::Photo => Self::Video,
            Self::Video => Self::Photo,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Retrieval strategy for a media kind
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    Search,
    /// Photos only
    Curated,
    /// Videos only
    Popular,
    /// Always a single item, never paginated
    Random,
}

impl RetrievalMode {
    pub fn is_valid_for(self, kind: MediaKind) -> bool {
        kind.modes().contains(&self)
    }

    pub fn is_paginated(self) -> bool {
        !matches!(self, Self::Random)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Curated => "curated",
            Self::Popular => "popular",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================
// Photo Types
// ============================================

/// A photo record from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    /// Page on the catalog site
    pub url: String,
    pub photographer: String,
    pub photographer_url: String,
    pub src: PhotoSrc,
}

/// Renditions of a photo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoSrc {
    pub original: String,
    pub large2x: String,
    pub large: String,
    pub medium: String,
    pub small: String,
    pub tiny: String,
    pub portrait: String,
    pub landscape: String,
    pub square: String,
}

/// One page of photos (search and curated share this envelope)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoPage {
    pub page: u32,
    pub per_page: u32,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

// ============================================
// Video Types
// ============================================

/// A video record from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    /// Page on the catalog site
    pub url: String,
    /// Preview still
    pub image: String,
    #[serde(default)]
    pub full_res: Option<String>,
    /// Seconds
    pub duration: u32,
    /// Creator; not every proxy forwards it
    #[serde(default)]
    pub user: Option<VideoUser>,
    #[serde(default)]
    pub video_files: Vec<VideoFile>,
    #[serde(default)]
    pub video_pictures: Vec<VideoPicture>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoUser {
    pub id: u64,
    pub name: String,
    pub url: String,
}

/// One encoded rendition of a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFile {
    pub id: u64,
    /// "hd", "sd", "uhd"; null for some renditions
    #[serde(default)]
    pub quality: Option<String>,
    pub file_type: String,
    pub link: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoPicture {
    pub id: u64,
    pub picture: String,
    pub nr: u32,
}

/// One page of videos (search and popular share this envelope)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoPage {
    pub page: u32,
    pub per_page: u32,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

// ============================================
// Item Types
// ============================================

/// A single catalog record held in a result buffer
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Photo(Photo),
    Video(Video),
}

impl Item {
    pub fn id(&self) -> u64 {
        match self {
            Self::Photo(p) => p.id,
            Self::Video(v) => v.id,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Photo(_) => MediaKind::Photo,
            Self::Video(_) => MediaKind::Video,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Photo(p) => (p.width, p.height),
            Self::Video(v) => (v.width, v.height),
        }
    }

    /// Creator attribution, if the catalog supplied one
    pub fn creator(&self) -> Option<&str> {
        match self {
            Self::Photo(p) => Some(p.photographer.as_str()),
            Self::Video(v) => v.user.as_ref().map(|u| u.name.as_str()),
        }
    }

    pub fn origin_url(&self) -> &str {
        match self {
            Self::Photo(p) => &p.url,
            Self::Video(v) => &v.url,
        }
    }

    /// Highest-quality representation worth handing to a viewer
    pub fn best_url(&self) -> Option<&str> {
        match self {
            Self::Photo(p) => [&p.src.large2x, &p.src.original]
                .into_iter()
                .find(|s| !s.is_empty())
                .map(String::as_str),
            Self::Video(v) => v
                .video_files
                .iter()
                .max_by_key(|f| f.width.unwrap_or(0))
                .map(|f| f.link.as_str()),
        }
    }
}

impl From<Photo> for Item {
    fn from(photo: Photo) -> Self {
        Self::Photo(photo)
    }
}

impl From<Video> for Item {
    fn from(video: Video) -> Self {
        Self::Video(video)
    }
}

// ============================================
// Utility Endpoint Types
// ============================================

/// Quota information served by `/info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    pub remaining_requests: i64,
    #[serde(default)]
    pub message: String,
}

/// Served by `/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

// ============================================
// Content State Types
// ============================================

/// Last failure recorded for a media kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl ErrorInfo {
    pub fn is_rate_limited(&self) -> bool {
        self.kind == FetchErrorKind::RateLimit
    }
}

impl From<&CatalogError> for ErrorInfo {
    fn from(err: &CatalogError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Coarse lifecycle of a kind's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Error,
}

/// Browsing state for one media kind
#[derive(Debug, Clone)]
pub struct ContentState {
    pub kind: MediaKind,
    pub mode: RetrievalMode,
    /// Shared search text at the time the snapshot was taken
    pub query: String,
    /// Page the buffer currently extends to
    pub page: u32,
    pub items: Vec<Item>,
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<ErrorInfo>,
    pub(crate) generation: u64,
    /// Set when an append failed; the next load-more re-requests `page`
    pub(crate) retry_pending: bool,
    /// Set when a reset failed; `items` still belong to the previous mode or query
    pub(crate) reset_pending: bool,
}

impl ContentState {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            mode: kind.default_mode(),
            query: String::new(),
            page: 1,
            items: Vec::new(),
            has_more: true,
            loading: false,
            error: None,
            generation: 0,
            retry_pending: false,
            reset_pending: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ============================================
// Config Types
// ============================================

/// Menu selector type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectorType {
    #[default]
    Fzf,
    Dialoguer,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog proxy root (default: http://localhost:8080)
    pub base_url: String,
    /// Items per page (default: 20)
    pub page_size: u32,
    /// Search text pre-filled in the query box (default: "nature")
    pub default_query: String,
    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    /// Editor command (default: "nvim")
    pub editor: String,
    /// Menu selector
    pub selector: SelectorType,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            page_size: 20,
            default_query: "nature".into(),
            timeout_secs: 10,
            editor: "nvim".into(),
            selector: SelectorType::default(),
        }
    }
}

// ============================================
// Selector Types
// ============================================

/// Item displayed in selector menu
#[derive(Debug, Clone)]
pub struct MenuItem<T> {
    /// Display text
    pub label: String,
    /// Underlying value
    pub value: T,
}

// ============================================
// State Machine Types
// ============================================

/// Browse loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Show current results and the action menu
    Browse,
    /// Flip between photos and videos
    SwitchKind,
    /// Pick a retrieval mode for the active kind
    ChangeMode,
    /// Edit the query and run a search
    Search,
    /// Fetch the next page
    LoadMore,
    /// Re-run the current mode from page 1
    Refresh,
    /// Inspect one item
    ViewItem,
    /// Exit application
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_photo_json() -> &'static str {
        r##"{
            "id": 2014422,
            "width": 3024,
            "height": 3024,
            "url": "https://www.pexels.com/photo/2014422/",
            "photographer": "Joey Farina",
            "photographer_url": "https://www.pexels.com/@joey",
            "avg_color": "#978E82",
            "src": {
                "original": "https://images.pexels.com/photos/2014422/original.jpeg",
                "large2x": "https://images.pexels.com/photos/2014422/large2x.jpeg",
                "large": "https://images.pexels.com/photos/2014422/large.jpeg",
                "medium": "https://images.pexels.com/photos/2014422/medium.jpeg",
                "small": "https://images.pexels.com/photos/2014422/small.jpeg",
                "tiny": "https://images.pexels.com/photos/2014422/tiny.jpeg",
                "portrait": "https://images.pexels.com/photos/2014422/portrait.jpeg",
                "landscape": "https://images.pexels.com/photos/2014422/landscape.jpeg",
                "square": "https://images.pexels.com/photos/2014422/square.jpeg"
            }
        }"##
    }

    #[test]
    fn test_mode_sets() {
        assert!(RetrievalMode::Curated.is_valid_for(MediaKind::Photo));
        assert!(!RetrievalMode::Curated.is_valid_for(MediaKind::Video));
        assert!(RetrievalMode::Popular.is_valid_for(MediaKind::Video));
        assert!(!RetrievalMode::Popular.is_valid_for(MediaKind::Photo));
        for kind in MediaKind::ALL {
            assert!(RetrievalMode::Search.is_valid_for(kind));
            assert!(RetrievalMode::Random.is_valid_for(kind));
            assert!(kind.default_mode().is_valid_for(kind));
        }
        assert!(!RetrievalMode::Random.is_paginated());
    }

    #[test]
    fn test_photo_deserialize_ignores_unknown_fields() {
        let photo: Photo = serde_json::from_str(sample_photo_json()).unwrap();
        assert_eq!(photo.id, 2014422);
        assert_eq!(photo.photographer, "Joey Farina");

        let item = Item::from(photo);
        assert_eq!(item.kind(), MediaKind::Photo);
        assert_eq!(item.dimensions(), (3024, 3024));
        assert_eq!(item.creator(), Some("Joey Farina"));
        assert!(item.best_url().unwrap().ends_with("large2x.jpeg"));
    }

    #[test]
    fn test_video_page_with_nullable_fields() {
        let json = r#"{
            "page": 1,
            "per_page": 2,
            "total_results": 8000,
            "url": "https://api-videos.pexels.com/popular-videos",
            "videos": [{
                "id": 7,
                "width": 1920,
                "height": 1080,
                "url": "https://www.pexels.com/video/7/",
                "image": "https://images.pexels.com/videos/7/preview.jpg",
                "full_res": null,
                "duration": 12,
                "user": {"id": 1, "name": "Ana", "url": "https://www.pexels.com/@ana"},
                "video_files": [
                    {
                        "id": 1,
                        "quality": "sd",
                        "file_type": "video/mp4",
                        "width": 640,
                        "height": 360,
                        "link": "https://v/sd.mp4"
                    },
                    {
                        "id": 2,
                        "quality": "hd",
                        "file_type": "video/mp4",
                        "width": 1920,
                        "height": 1080,
                        "link": "https://v/hd.mp4"
                    },
                    {
                        "id": 3,
                        "quality": null,
                        "file_type": "video/mp4",
                        "width": null,
                        "height": null,
                        "link": "https://v/hls"
                    }
                ],
                "video_pictures": [{"id": 1, "picture": "https://p/0.jpg", "nr": 0}]
            }]
        }"#;

        let page: VideoPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.videos.len(), 1);
        assert!(page.next_page.is_none());

        let item = Item::from(page.videos[0].clone());
        assert_eq!(item.creator(), Some("Ana"));
        assert_eq!(item.best_url(), Some("https://v/hd.mp4"));
    }

    #[test]
    fn test_content_state_defaults() {
        let photos = ContentState::new(MediaKind::Photo);
        assert_eq!(photos.mode, RetrievalMode::Curated);
        assert_eq!(photos.page, 1);
        assert!(photos.has_more);
        assert_eq!(photos.phase(), Phase::Idle);

        let videos = ContentState::new(MediaKind::Video);
        assert_eq!(videos.mode, RetrievalMode::Popular);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"page_size": 40}"#).unwrap();
        assert_eq!(cfg.page_size, 40);
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.default_query, "nature");
    }
}
