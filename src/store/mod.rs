//! Object-store listing.
//!
//! The store is consumed through the narrow [`ObjectStore`] trait: one page
//! of keys per call, driven by a continuation marker. [`list_all`] owns the
//! pagination loop and either returns the complete listing or fails; a
//! partial listing is never handed to the caller as if it were complete.

mod s3;

pub use s3::S3ObjectStore;

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

/// A page listing failed. Fatal to the worker that was listing.
#[derive(Debug, Error)]
#[error("object listing failed for bucket {bucket}: {message}")]
pub struct ObjectStoreError {
    pub bucket: String,
    pub message: String,
}

/// One page of an object listing.
#[derive(Debug, Clone)]
pub struct ListPage {
    /// Keys in listing order.
    pub keys: Vec<String>,

    /// Whether the store reports further pages after this one.
    pub is_truncated: bool,
}

/// Paginated bucket listing interface.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one page of keys under `prefix`, starting after `marker`.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        marker: Option<&str>,
    ) -> Result<ListPage, ObjectStoreError>;
}

/// List every key under `bucket`/`prefix`, in listing order, no duplicates.
///
/// The loop stops on a zero-entry page (the store has nothing more to say)
/// or when a page reports no truncation. The next marker is always the last
/// key of the current page.
pub async fn list_all(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<String>, ObjectStoreError> {
    let mut keys = Vec::new();
    let mut seen = HashSet::new();
    let mut marker: Option<String> = None;

    loop {
        let page = store.list_page(bucket, prefix, marker.as_deref()).await?;
        if page.keys.is_empty() {
            break;
        }
        marker = page.keys.last().cloned();
        for key in page.keys {
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }
        if !page.is_truncated {
            break;
        }
    }

    Ok(keys)
}
