//! Image prefetching and the image dimension cache.
//!
//! Layout itself never performs I/O. Before a layout pass the node tree is
//! walked once to collect every distinct image source, the sources are fetched
//! concurrently through an [`ImageFetcher`], and the results are stored in an
//! [`ImageCache`]. The synchronous layout pass then reads dimensions from the
//! cache, falling back to a placeholder size for anything missing.

use std::{
    collections::{BTreeSet, HashMap},
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use futures::future::join_all;
use log::{debug, warn};
use thiserror::Error;

use placard_core::{
    geometry::Size,
    node::{Node, NodeKind},
};

/// Error reported by an [`ImageFetcher`].
#[derive(Debug, Clone, Error)]
#[error("failed to fetch image `{source_ref}`: {reason}")]
pub struct ImageError {
    source_ref: String,
    reason: String,
}

impl ImageError {
    pub fn new(source_ref: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source_ref: source_ref.into(),
            reason: reason.into(),
        }
    }

    /// The image source that failed.
    pub fn source_ref(&self) -> &str {
        &self.source_ref
    }
}

/// Capability that resolves image sources. Implementations own any network or
/// file access, including timeouts.
pub trait ImageFetcher {
    /// Returns the pixel dimensions of the image at `source`.
    fn fetch_dimensions(&self, source: &str) -> impl Future<Output = Result<Size, ImageError>>;

    /// Returns the encoded image bytes. Only called for remote sources.
    fn fetch_encoded_bytes(&self, source: &str)
    -> impl Future<Output = Result<Vec<u8>, ImageError>>;
}

/// Returns `true` for sources fetched over the network.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Append-only caches keyed by image source.
///
/// The first successful write for a key wins; later writes for the same key
/// are ignored.
#[derive(Debug, Default)]
pub struct ImageCache {
    dimensions: Mutex<HashMap<String, Size>>,
    encoded: Mutex<HashMap<String, Arc<[u8]>>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached pixel dimensions for `source`.
    pub fn dimensions(&self, source: &str) -> Option<Size> {
        self.dimensions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
            .copied()
    }

    /// Cached encoded bytes for a remote `source`.
    pub fn encoded_bytes(&self, source: &str) -> Option<Arc<[u8]>> {
        self.encoded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
            .cloned()
    }

    pub fn contains(&self, source: &str) -> bool {
        self.dimensions(source).is_some()
    }

    /// Records dimensions for `source` unless already present.
    pub fn insert_dimensions(&self, source: &str, size: Size) {
        self.dimensions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(source.to_string())
            .or_insert(size);
    }

    /// Records encoded bytes for `source` unless already present.
    pub fn insert_encoded_bytes(&self, source: &str, bytes: Vec<u8>) {
        self.encoded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(source.to_string())
            .or_insert_with(|| bytes.into());
    }
}

/// Collects the distinct image sources of a tree in sorted order.
pub fn collect_image_sources(root: &Node) -> BTreeSet<&str> {
    let mut sources = BTreeSet::new();
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if let NodeKind::Image(image) = node.kind() {
            sources.insert(image.src.as_str());
        }
        pending.extend(node.children());
    }
    sources
}

/// Outcome of a prefetch pass.
#[derive(Debug, Default)]
pub struct PrefetchReport {
    fetched: Vec<String>,
    failed: Vec<ImageError>,
}

impl PrefetchReport {
    /// Sources fetched during this pass.
    pub fn fetched(&self) -> &[String] {
        &self.fetched
    }

    /// Sources that could not be fetched; layout will use the placeholder.
    pub fn failed(&self) -> &[ImageError] {
        &self.failed
    }
}

/// Fetches every uncached image of `root` concurrently and fills `cache`.
///
/// Failures are logged and reported, never returned as errors.
pub async fn prefetch_images<F: ImageFetcher>(
    root: &Node,
    fetcher: &F,
    cache: &ImageCache,
) -> PrefetchReport {
    let pending: Vec<&str> = collect_image_sources(root)
        .into_iter()
        .filter(|source| !cache.contains(source))
        .collect();
    debug!(pending = pending.len(); "Prefetching images");

    let results = join_all(pending.into_iter().map(|source| async move {
        let size = fetcher.fetch_dimensions(source).await?;
        let bytes = if is_remote(source) {
            Some(fetcher.fetch_encoded_bytes(source).await?)
        } else {
            None
        };
        Ok::<_, ImageError>((source, size, bytes))
    }))
    .await;

    let mut report = PrefetchReport::default();
    for result in results {
        match result {
            Ok((source, size, bytes)) => {
                cache.insert_dimensions(source, size);
                if let Some(bytes) = bytes {
                    cache.insert_encoded_bytes(source, bytes);
                }
                report.fetched.push(source.to_string());
            }
            Err(err) => {
                warn!(source = err.source_ref(), error = err.to_string(); "Image prefetch failed");
                report.failed.push(err);
            }
        }
    }

    debug!(
        fetched = report.fetched.len(),
        failed = report.failed.len();
        "Image prefetch finished"
    );
    report
}
