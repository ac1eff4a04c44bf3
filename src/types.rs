//! Common types used throughout the proxy
//!
//! Shared type aliases for upstream payloads.

use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// An opaque upstream record (saved album, playlist entry, ...)
pub type RawItem = JsonValue;
