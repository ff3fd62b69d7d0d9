//! JSON navigation helpers for provider API responses.
//!
//! Provider payloads are deeply nested and only a handful of fields matter, so
//! parsers walk them with dot-separated paths instead of mirroring the whole
//! schema in structs.
//!
//! # Examples
//!
//! ```rust
//! use pingrab::net::json;
//! use serde_json::json;
//!
//! let data = json!({
//!     "resource_response": {
//!         "data": {
//!             "results": [
//!                 {"images": {"orig": {"url": "https://i.pinimg.com/originals/a.jpg"}}}
//!             ]
//!         }
//!     }
//! });
//!
//! let results = json::lookup_array(&data, "resource_response.data.results");
//! assert_eq!(results.len(), 1);
//! assert_eq!(
//!     json::lookup_str(&results[0], "images.orig.url"),
//!     Some("https://i.pinimg.com/originals/a.jpg")
//! );
//! ```

use serde_json::Value;

use crate::error::{Error, Result};

/// Follows a dot-separated path through nested objects.
///
/// Numeric segments index into arrays, so `"results.0.id"` reads the `id` of
/// the first result.
///
/// # Returns
///
/// * `Some(&Value)` - The value at the path
/// * `None` - If any segment of the path is missing
pub fn lookup<'a>(json: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(json, |current, key| match current {
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => current.get(key),
    })
}

/// Like [`lookup`], but fails with [`Error::Parse`] when the path is missing.
///
/// ```rust
/// use pingrab::net::json;
/// use serde_json::json;
///
/// let data = json!({"resource_response": {"status": "success"}});
/// assert!(json::require(&data, "resource_response.status").is_ok());
/// assert!(json::require(&data, "resource_response.data").is_err());
/// ```
pub fn require<'a>(json: &'a Value, path: &str) -> Result<&'a Value> {
    lookup(json, path).ok_or_else(|| Error::parse(format!("Path not found: {}", path)))
}

/// Reads a string at the given path, `None` if missing or not a string.
pub fn lookup_str<'a>(json: &'a Value, path: &str) -> Option<&'a str> {
    lookup(json, path).and_then(Value::as_str)
}

/// Reads an array at the given path.
///
/// Returns an empty slice if the path doesn't exist or isn't an array.
pub fn lookup_array<'a>(json: &'a Value, path: &str) -> &'a [Value] {
    lookup(json, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
