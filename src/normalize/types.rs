//! Caller-facing shapes
//!
//! Field names follow the JSON the proxy has always served (camelCase).

use serde::{Deserialize, Serialize};

/// A saved album as served by `/api/album-list`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedAlbum {
    /// Upstream album id
    pub id: String,
    /// Album title
    pub name: String,
    /// Artist names joined with `", "`
    pub artist: String,
    /// Release date as reported upstream (precision varies)
    pub release_date: String,
    /// Number of tracks
    pub total_tracks: u64,
    /// First cover image, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Link to the album on Spotify
    pub spotify_url: String,
    /// When the album was saved to the library
    pub added_at: String,
}

/// A playlist track as served by `/api/random-song`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInfo {
    /// Track title
    pub name: String,
    /// Artist names joined with `", "`
    pub artist: String,
    /// Album title
    pub album: String,
    /// Album release date
    pub release_date: String,
    /// 30 second preview, `null` when upstream has none
    pub preview_url: Option<String>,
    /// Link to the track on Spotify
    pub spotify_url: String,
}

/// Response body of `/api/album-list`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    /// Number of albums in `albums`
    pub total_albums: usize,
    /// Albums in library order
    pub albums: Vec<ProjectedAlbum>,
}

impl CollectionResponse {
    /// Wrap projected albums
    pub fn new(albums: Vec<ProjectedAlbum>) -> Self {
        Self {
            total_albums: albums.len(),
            albums,
        }
    }
}
