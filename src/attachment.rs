//! Image attachment encoding
//!
//! This module converts raw image files into provider-neutral attachment
//! records: the exact source bytes base64-encoded, the mime type detected
//! from the image magic bytes, and a display-only preview handle.
//!
//! The preview is a small PNG thumbnail written under the system temp
//! directory. Its lifetime is tied to [`PreviewHandle`]: the file is removed
//! when the last clone of the handle is dropped, which happens when the
//! attachment is discarded or the conversation is cleared. The preview never
//! participates in request building and is never sent to the provider.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::error::{NexusError, Result};

/// Subdirectory of the system temp dir holding preview thumbnails
const PREVIEW_DIR: &str = "nexus-previews";

/// Preview thumbnails are clamped to this edge length in pixels
const PREVIEW_EDGE: u32 = 96;

/// Display-only handle to a preview thumbnail on disk
///
/// Cloning shares the underlying file; the file is deleted when the last
/// clone is dropped. The handle has no bearing on what is sent to the
/// provider.
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    inner: Arc<PreviewInner>,
}

#[derive(Debug)]
struct PreviewInner {
    path: PathBuf,
}

impl Drop for PreviewInner {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::debug!("Failed to remove preview {}: {}", self.path.display(), e);
        }
    }
}

impl PreviewHandle {
    /// Path of the thumbnail file backing this handle
    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

/// An encoded image attachment
///
/// `data` holds the exact byte content of the source file, base64-encoded.
/// The preview handle is local state and is skipped during serialization;
/// a deserialized attachment simply has no preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Mime type detected from the image magic bytes (e.g. `image/png`)
    pub mime_type: String,
    /// Base64-encoded source bytes
    pub data: String,
    /// Local preview thumbnail; display-only, never sent to the provider
    #[serde(skip)]
    pub preview: Option<PreviewHandle>,
}

impl Attachment {
    /// Encodes an image file into an attachment
    ///
    /// Reads the file, detects the image format from its magic bytes, and
    /// base64-encodes the exact bytes. A preview thumbnail is written on a
    /// best-effort basis; preview failure is logged and never fails the
    /// encode.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the image file
    /// * `max_bytes` - Size ceiling; larger files are rejected
    ///
    /// # Errors
    ///
    /// Returns `NexusError::Encoding` if the file cannot be read, exceeds
    /// `max_bytes`, or is not a recognized image format.
    pub fn from_path(path: &Path, max_bytes: u64) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            NexusError::Encoding(format!("cannot read {}: {}", path.display(), e))
        })?;
        if metadata.len() > max_bytes {
            return Err(NexusError::Encoding(format!(
                "{} is {} which exceeds the {} attachment limit",
                path.display(),
                format_size(metadata.len()),
                format_size(max_bytes)
            ))
            .into());
        }

        let bytes = std::fs::read(path).map_err(|e| {
            NexusError::Encoding(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::from_bytes(&bytes, max_bytes)
    }

    /// Encodes raw image bytes into an attachment
    ///
    /// # Arguments
    ///
    /// * `bytes` - The exact source bytes of the image
    /// * `max_bytes` - Size ceiling; larger payloads are rejected
    ///
    /// # Errors
    ///
    /// Returns `NexusError::Encoding` if the payload exceeds `max_bytes` or
    /// is not a recognized image format.
    ///
    /// # Examples
    ///
    /// ```
    /// use nexus::attachment::Attachment;
    ///
    /// // Four arbitrary bytes are not a recognizable image.
    /// assert!(Attachment::from_bytes(&[0u8, 1, 2, 3], 1024).is_err());
    /// ```
    pub fn from_bytes(bytes: &[u8], max_bytes: u64) -> Result<Self> {
        if bytes.len() as u64 > max_bytes {
            return Err(NexusError::Encoding(format!(
                "payload is {} which exceeds the {} attachment limit",
                format_size(bytes.len() as u64),
                format_size(max_bytes)
            ))
            .into());
        }

        let format = image::guess_format(bytes).map_err(|e| {
            NexusError::Encoding(format!("not a recognized image format: {}", e))
        })?;
        let mime_type = format.to_mime_type().to_string();

        let data = base64::engine::general_purpose::STANDARD.encode(bytes);

        let preview = match write_preview(bytes) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Failed to create preview thumbnail: {}", e);
                None
            }
        };

        tracing::debug!(
            "Encoded attachment: {} ({} raw, {} base64)",
            mime_type,
            format_size(bytes.len() as u64),
            format_size(data.len() as u64)
        );

        Ok(Self {
            mime_type,
            data,
            preview,
        })
    }

    /// Approximate decoded size of the attachment in bytes
    pub fn size_bytes(&self) -> u64 {
        // base64 expands 3 raw bytes into 4 encoded characters
        (self.data.len() as u64 / 4) * 3
    }

    /// Short human-readable summary for terminal display
    ///
    /// # Examples
    ///
    /// ```
    /// use nexus::attachment::Attachment;
    ///
    /// let att = Attachment {
    ///     mime_type: "image/png".to_string(),
    ///     data: "aGVsbG8=".to_string(),
    ///     preview: None,
    /// };
    /// assert!(att.describe().starts_with("image/png"));
    /// ```
    pub fn describe(&self) -> String {
        format!("{}, {}", self.mime_type, format_size(self.size_bytes()))
    }
}

/// Decode the image and write a small PNG thumbnail under the temp dir
fn write_preview(bytes: &[u8]) -> Result<PreviewHandle> {
    let dir = std::env::temp_dir().join(PREVIEW_DIR);
    std::fs::create_dir_all(&dir)?;

    let path = dir.join(format!("{}.png", uuid::Uuid::new_v4()));
    let thumbnail = image::load_from_memory(bytes)
        .map_err(|e| NexusError::Encoding(format!("cannot decode image: {}", e)))?
        .thumbnail(PREVIEW_EDGE, PREVIEW_EDGE);
    thumbnail
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|e| NexusError::Encoding(format!("cannot write preview: {}", e)))?;

    Ok(PreviewHandle {
        inner: Arc::new(PreviewInner { path }),
    })
}

/// Format byte size for display
fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.1}{}", size, UNITS[unit_idx])
}
