//! Destination resolution and streaming downloads for individual assets.
//!
//! This module covers the two per-asset steps of a cycle:
//!
//! - **Destination**: [`ensure_dir`] prepares the output folder, [`name_for`]
//!   and [`extension_for`] build a collision-free filename
//! - **Fetching**: [`StreamingFetcher`] streams a response body straight into a
//!   file and reports the persisted size
//!
//! # Examples
//!
//! ```rust
//! use pingrab::download::{extension_for, name_for};
//!
//! let ext = extension_for("https://i.pinimg.com/originals/ab/cd.png?v=3");
//! assert_eq!(ext, ".png");
//! assert_eq!(name_for("cats", 1700000000000, 1, &ext), "cats_1700000000000_1.png");
//! ```

use async_trait::async_trait;
use futures::StreamExt;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::net::{HttpClient, Timeouts};

/// Extension used when the URL path doesn't carry one.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Creates the destination directory, including missing parents.
///
/// Idempotent: an existing directory is left untouched.
///
/// # Errors
///
/// * [`Error::Filesystem`] - If the directory can't be created, or the path
///   exists but is not a directory
///
/// # Examples
///
/// ```rust,no_run
/// use pingrab::download::ensure_dir;
/// use std::path::Path;
///
/// # async fn example() -> pingrab::Result<()> {
/// ensure_dir(Path::new("./downloads/cats")).await?;
/// ensure_dir(Path::new("./downloads/cats")).await?; // no-op
/// # Ok(())
/// # }
/// ```
pub async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| Error::filesystem(path, e))?;

    let metadata = fs::metadata(path)
        .await
        .map_err(|e| Error::filesystem(path, e))?;
    if !metadata.is_dir() {
        return Err(Error::filesystem(
            path,
            std::io::Error::other("path exists and is not a directory"),
        ));
    }

    Ok(())
}

/// Builds the stored filename for one attempt.
///
/// The layout is `{keyword}_{timestamp_ms}_{index}{extension}`. The sequence
/// index keeps names distinct inside a cycle even when two attempts share the
/// same millisecond. The keyword is passed through [`sanitize_filename`].
pub fn name_for(keyword: &str, timestamp_ms: i64, index: usize, extension: &str) -> String {
    format!(
        "{}_{}_{}{}",
        sanitize_filename(keyword),
        timestamp_ms,
        index,
        extension
    )
}

/// Derives a file extension (with leading dot) from a URL's path.
///
/// Query strings and fragments are ignored and the case is kept as written.
/// Falls back to [`DEFAULT_EXTENSION`] when the last path segment has no
/// usable extension. Extensions longer than 10 characters or containing
/// anything but ASCII letters and digits are not usable, since they end up in
/// a filename.
///
/// # Examples
///
/// ```rust
/// use pingrab::download::extension_for;
///
/// assert_eq!(extension_for("https://example.com/image.JPEG"), ".JPEG");
/// assert_eq!(extension_for("https://example.com/image.webp#frag"), ".webp");
/// assert_eq!(extension_for("https://example.com/image"), ".jpg");
/// ```
pub fn extension_for(url: &str) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    last_segment
        .rfind('.')
        .map(|dot| &last_segment[dot + 1..])
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Sanitizes a filename component by replacing invalid characters.
///
/// # Examples
///
/// ```rust
/// use pingrab::download::sanitize_filename;
///
/// assert_eq!(sanitize_filename("cats/dogs: best?"), "cats_dogs_ best_");
/// assert_eq!(sanitize_filename("   "), "untitled");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let invalid_chars = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
    let mut sanitized: String = name
        .chars()
        .map(|c| {
            if invalid_chars.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    sanitized = sanitized.trim().to_string();
    if sanitized.len() > 200 {
        let mut cut = 200;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
    }

    if sanitized.is_empty() {
        sanitized = "untitled".to_string();
    }

    sanitized
}

/// Fetches one asset into a file on disk.
///
/// The orchestrator is generic over this trait so tests can swap in a fake
/// transport.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Downloads `url` into `destination` and returns the persisted size in
    /// bytes.
    ///
    /// # Errors
    ///
    /// * [`Error::Network`] / [`Error::Http`] - transport failure or non-2xx status
    /// * [`Error::Write`] - the body couldn't be written to `destination`
    async fn fetch(&self, url: &str, destination: &Path) -> Result<u64>;
}

/// Streams HTTP responses to disk chunk by chunk.
///
/// Memory use stays bounded by the chunk size regardless of the asset size.
/// There is no deadline on the transfer as a whole: only connecting and each
/// pause between chunks are bounded (see [`Timeouts::Streaming`]).
/// The reported size is read back from the written file, not taken from
/// `Content-Length`.
///
/// When a stream or write fails after the file was created, the partial file
/// is removed before the error is returned.
///
/// # Examples
///
/// ```rust,no_run
/// use pingrab::download::{AssetFetcher, StreamingFetcher};
/// use std::path::Path;
///
/// # async fn example() -> pingrab::Result<()> {
/// let fetcher = StreamingFetcher::new();
/// let bytes = fetcher
///     .fetch("https://i.pinimg.com/originals/a.jpg", Path::new("./a.jpg"))
///     .await?;
/// println!("Stored {} bytes", bytes);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StreamingFetcher {
    client: HttpClient,
}

impl Default for StreamingFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingFetcher {
    pub fn new() -> Self {
        Self::with_timeouts(Timeouts::streaming())
    }

    pub fn with_timeouts(timeouts: Timeouts) -> Self {
        Self {
            client: HttpClient::with_timeouts("downloader", timeouts),
        }
    }

    async fn stream_to_file(
        response: reqwest::Response,
        file: &mut fs::File,
        destination: &Path,
    ) -> Result<()> {
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| Error::write(destination, e))?;
        }

        file.flush().await.map_err(|e| Error::write(destination, e))
    }
}

#[async_trait]
impl AssetFetcher for StreamingFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        let response = self.client.get_response(url).await?;

        let mut file = fs::File::create(destination)
            .await
            .map_err(|e| Error::write(destination, e))?;

        if let Err(e) = Self::stream_to_file(response, &mut file, destination).await {
            drop(file);
            if let Err(remove_err) = fs::remove_file(destination).await {
                tracing::warn!(
                    path = %destination.display(),
                    error = %remove_err,
                    "Failed to remove partial download"
                );
            }
            return Err(e);
        }
        drop(file);

        let metadata = fs::metadata(destination)
            .await
            .map_err(|e| Error::write(destination, e))?;
        Ok(metadata.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Serves a single response by hand: the head with the declared
    /// `Content-Length`, then `body` one byte every `pace`, then closes.
    async fn raw_server(content_length: usize, body: &'static [u8], pace: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
                content_length
            );
            let _ = socket.write_all(head.as_bytes()).await;
            for byte in body {
                tokio::time::sleep(pace).await;
                if socket.write_all(&[*byte]).await.is_err() {
                    return;
                }
                let _ = socket.flush().await;
            }
        });
        format!("http://{}/asset.jpg", addr)
    }

    fn short_timeouts() -> Timeouts {
        Timeouts::Streaming {
            connect: Duration::from_secs(1),
            idle: Duration::from_millis(800),
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("normal name"), "normal name");
        assert_eq!(
            sanitize_filename("file/with\\bad:chars"),
            "file_with_bad_chars"
        );
        assert_eq!(sanitize_filename(""), "untitled");

        let long_name = "é".repeat(150);
        let sanitized = sanitize_filename(&long_name);
        assert!(sanitized.len() <= 200);
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("https://example.com/image.jpg"), ".jpg");
        assert_eq!(extension_for("https://example.com/image.PNG"), ".PNG");
        assert_eq!(extension_for("https://example.com/image.j%20g"), ".jpg");
        assert_eq!(extension_for("https://example.com/image.abcdefghijk"), ".jpg");
        assert_eq!(extension_for("https://example.com/image.gif?v=123"), ".gif");
        assert_eq!(extension_for("https://example.com/a.b/image"), ".jpg");
        assert_eq!(extension_for("https://example.com/image."), ".jpg");
        assert_eq!(extension_for("https://example.com/"), ".jpg");
        assert_eq!(extension_for("not a url/pic.webp?x=1"), ".webp");
        assert_eq!(extension_for(""), ".jpg");
    }

    #[test]
    fn test_name_for_is_unique_per_index() {
        let first = name_for("cats", 1_700_000_000_000, 1, ".jpg");
        let second = name_for("cats", 1_700_000_000_000, 2, ".jpg");
        assert_eq!(first, "cats_1700000000000_1.jpg");
        assert_ne!(first, second);
    }

    #[test]
    fn test_name_for_sanitizes_keyword() {
        assert_eq!(name_for("a/b", 5, 3, ".png"), "a_b_5_3.png");
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("one").join("two");

        ensure_dir(&nested).await.unwrap();
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_ensure_dir_rejects_file() {
        let temp = tempfile::tempdir().unwrap();
        let file_path = temp.path().join("occupied");
        std::fs::write(&file_path, b"x").unwrap();

        let err = ensure_dir(&file_path).await.unwrap_err();
        assert!(matches!(err, Error::Filesystem { .. }));
    }

    #[tokio::test]
    async fn test_fetch_streams_body_to_file() {
        let server = MockServer::start().await;
        let body = vec![7u8; 12_345];
        Mock::given(method("GET"))
            .and(path("/pin.jpg"))
            .and(header("referer", crate::net::DEFAULT_REFERER))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("pin.jpg");
        let size = StreamingFetcher::new()
            .fetch(&format!("{}/pin.jpg", server.uri()), &destination)
            .await
            .unwrap();

        assert_eq!(size, 12_345);
        assert_eq!(std::fs::read(&destination).unwrap(), body);
    }

    #[tokio::test]
    async fn test_fetch_http_error_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("missing.jpg");
        let err = StreamingFetcher::new()
            .fetch(&format!("{}/missing.jpg", server.uri()), &destination)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http { .. }));
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_fetch_into_missing_dir_is_write_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 16]))
            .mount(&server)
            .await;

        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("no-such-dir").join("a.jpg");
        let err = StreamingFetcher::new()
            .fetch(&format!("{}/a.jpg", server.uri()), &destination)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
        assert!(err.is_per_item());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_network_error() {
        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("a.jpg");
        let err = StreamingFetcher::new()
            .fetch("http://127.0.0.1:9/a.jpg", &destination)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_fetch_slow_steady_body_completes() {
        // 8 bytes at 300 ms each: well past the idle timeout in total, but
        // never idle for longer than it.
        let url = raw_server(8, b"abcdefgh", Duration::from_millis(300)).await;
        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("slow.jpg");

        let size = StreamingFetcher::with_timeouts(short_timeouts())
            .fetch(&url, &destination)
            .await
            .unwrap();

        assert_eq!(size, 8);
        assert_eq!(std::fs::read(&destination).unwrap(), b"abcdefgh");
    }

    #[tokio::test]
    async fn test_fetch_stalled_body_removes_partial_file() {
        let url = raw_server(4, b"ab", Duration::from_secs(3)).await;
        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("stalled.jpg");

        let err = StreamingFetcher::with_timeouts(short_timeouts())
            .fetch(&url, &destination)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_fetch_truncated_body_removes_partial_file() {
        // Declares 1000 bytes, sends 10, then hangs up.
        let url = raw_server(1000, b"0123456789", Duration::ZERO).await;
        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("truncated.jpg");

        let err = StreamingFetcher::new()
            .fetch(&url, &destination)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        assert!(err.is_per_item());
        assert!(!destination.exists());
    }
}
