//! Result Normalizer
//!
//! Pure projections from raw upstream records to the caller-facing shapes.
//! Missing nested fields never fail a projection: strings fall back to
//! empty, counts to zero and optional URLs to `None`.

mod types;

pub use types::{CollectionResponse, ProjectedAlbum, SongInfo};

use crate::types::{JsonValue, RawItem};
use tracing::debug;

/// Projects raw upstream records
pub trait Normalizer {
    /// Caller-facing record
    type Output;

    /// Project one record
    fn project(&self, item: &RawItem) -> Self::Output;

    /// Project a whole collection, keeping order
    fn normalize(&self, items: &[RawItem]) -> Vec<Self::Output> {
        items.iter().map(|item| self.project(item)).collect()
    }
}

// ============================================================================
// Albums
// ============================================================================

/// Saved library albums (`{ added_at, album }`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlbumNormalizer;

impl Normalizer for AlbumNormalizer {
    type Output = ProjectedAlbum;

    fn project(&self, item: &RawItem) -> ProjectedAlbum {
        let album = item.get("album").unwrap_or(&JsonValue::Null);

        let image_url = string_at(album, "/images/0/url");
        if image_url.is_none() {
            debug!(album = %text_at(album, "/id"), "Album has no cover image");
        }

        ProjectedAlbum {
            id: text_at(album, "/id"),
            name: text_at(album, "/name"),
            artist: join_artists(album.get("artists")),
            release_date: text_at(album, "/release_date"),
            total_tracks: album
                .get("total_tracks")
                .and_then(JsonValue::as_u64)
                .unwrap_or(0),
            image_url,
            spotify_url: text_at(album, "/external_urls/spotify"),
            added_at: text_at(item, "/added_at"),
        }
    }
}

// ============================================================================
// Playlist Tracks
// ============================================================================

/// Playlist entries (`{ track }`); entries whose track is gone project to `None`
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackNormalizer;

impl Normalizer for TrackNormalizer {
    type Output = Option<SongInfo>;

    fn project(&self, item: &RawItem) -> Option<SongInfo> {
        let track = item.get("track").filter(|track| track.is_object())?;

        let preview_url = string_at(track, "/preview_url");
        if preview_url.is_none() {
            debug!(track = %text_at(track, "/name"), "Track has no preview");
        }

        Some(SongInfo {
            name: text_at(track, "/name"),
            artist: join_artists(track.get("artists")),
            album: text_at(track, "/album/name"),
            release_date: text_at(track, "/album/release_date"),
            preview_url,
            spotify_url: text_at(track, "/external_urls/spotify"),
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Artist names joined with `", "`; unnamed entries are skipped
pub fn join_artists(artists: Option<&JsonValue>) -> String {
    artists
        .and_then(JsonValue::as_array)
        .map(|artists| {
            artists
                .iter()
                .filter_map(|artist| artist.get("name").and_then(JsonValue::as_str))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

fn string_at(value: &JsonValue, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}

fn text_at(value: &JsonValue, pointer: &str) -> String {
    string_at(value, pointer).unwrap_or_default()
}
