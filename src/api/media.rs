//! Media store abstraction for profile and cover images.
//!
//! Profile updates hand image blobs to a `MediaStore` and persist only the
//! returned reference. Upload and delete are best-effort from the profile
//! update's perspective: a failed media call is logged and the rest of the
//! update proceeds.
//!
//! The default store for local dev is `LogMediaStore`, which logs the upload
//! and returns a content-addressed in-memory reference. A real CDN-backed
//! store only needs to implement the two methods.

use anyhow::Result;
use sha2::{Digest, Sha256};
use std::fmt::Write;
use tracing::info;

/// Image storage abstraction used by profile updates.
pub trait MediaStore: Send + Sync {
    /// Store a blob and return a stable reference to it.
    fn upload(&self, blob: &[u8]) -> Result<String>;

    /// Delete a previously uploaded blob by reference.
    fn delete(&self, image_ref: &str) -> Result<()>;
}

/// Local dev store that logs the payload instead of talking to a real CDN.
#[derive(Clone, Debug)]
pub struct LogMediaStore;

impl MediaStore for LogMediaStore {
    fn upload(&self, blob: &[u8]) -> Result<String> {
        let digest = Sha256::digest(blob);
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hex, "{byte:02x}");
        }
        let image_ref = format!("memory://media/{hex}");
        info!(bytes = blob.len(), image_ref = %image_ref, "media upload stub");
        Ok(image_ref)
    }

    fn delete(&self, image_ref: &str) -> Result<()> {
        info!(image_ref = %image_ref, "media delete stub");
        Ok(())
    }
}
