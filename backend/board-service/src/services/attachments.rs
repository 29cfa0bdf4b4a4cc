/// Image attachment pipeline
///
/// Validates raw upload bytes (size ceiling, non-empty, sniffed image MIME)
/// and hands accepted bytes to object storage, returning the reference that
/// gets stored on the post or comment. Validation never touches the network.
use crate::clients::{with_deadline, ObjectStorage};
use crate::error::{AppError, Result};
use crate::models::ImageUpload;
use image::ImageFormat;
use std::sync::Arc;
use std::time::Duration;

/// Bytes inspected to derive the MIME type
pub const SNIFF_LEN: usize = 512;

/// Ceiling for a single image (metadata validation)
pub const IMAGE_MAX_BYTES: usize = 5 << 20;

/// Ceiling for a full request body read
pub const REQUEST_MAX_BYTES: usize = 10 << 20;

/// Image formats accepted for attachments
const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::Ico,
    ImageFormat::WebP,
];

/// `RIFF` container tag identifying a WebP bitstream, at bytes 8..14
const WEBP_TAG: &[u8] = b"WEBPVP";

/// Derive a MIME type from the leading bytes of a payload.
///
/// Only the formats in `ACCEPTED_FORMATS` are recognised; anything else,
/// including other `RIFF` containers and PNM text headers, is
/// `application/octet-stream`.
pub fn sniff_mime(bytes: &[u8]) -> mime::Mime {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    let format = match image::guess_format(head) {
        Ok(format) if ACCEPTED_FORMATS.contains(&format) => format,
        _ => return mime::APPLICATION_OCTET_STREAM,
    };
    if format == ImageFormat::WebP && head.get(8..14) != Some(WEBP_TAG) {
        return mime::APPLICATION_OCTET_STREAM;
    }

    format
        .to_mime_type()
        .parse::<mime::Mime>()
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

#[derive(Clone)]
pub struct AttachmentPipeline {
    storage: Arc<dyn ObjectStorage>,
    max_bytes: usize,
    remote_timeout: Duration,
}

impl AttachmentPipeline {
    pub fn new(storage: Arc<dyn ObjectStorage>, max_bytes: usize, remote_timeout: Duration) -> Self {
        Self {
            storage,
            max_bytes,
            remote_timeout,
        }
    }

    /// Check a payload without storing it. Returns the sniffed image type.
    pub fn validate(&self, bytes: &[u8]) -> Result<mime::Mime> {
        if bytes.is_empty() {
            return Err(AppError::InvalidContent("image payload is empty".to_string()));
        }

        if bytes.len() > self.max_bytes {
            return Err(AppError::PayloadTooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }

        let detected = sniff_mime(bytes);
        if detected.type_() != mime::IMAGE {
            return Err(AppError::UnsupportedMediaType(format!(
                "only images allowed, got {}",
                detected
            )));
        }

        Ok(detected)
    }

    /// Validate and store one image in `bucket`.
    pub async fn process(&self, upload: ImageUpload, bucket: &str) -> Result<String> {
        let detected = self.validate(&upload.bytes)?;

        with_deadline(
            self.remote_timeout,
            self.storage.put(bucket, upload.bytes, detected.essence_str()),
            AppError::RemoteUnavailable,
        )
        .await
    }

    /// Process images in order; the first failure aborts the whole batch.
    ///
    /// Images stored before the failing one are not removed.
    pub async fn process_all(&self, uploads: Vec<ImageUpload>, bucket: &str) -> Result<Vec<String>> {
        let total = uploads.len();
        let mut refs = Vec::with_capacity(total);

        for (index, upload) in uploads.into_iter().enumerate() {
            match self.process(upload, bucket).await {
                Ok(reference) => refs.push(reference),
                Err(e) => {
                    tracing::warn!(
                        index,
                        total,
                        already_stored = refs.len(),
                        error = %e,
                        "Image rejected, aborting request"
                    );
                    return Err(e);
                }
            }
        }

        Ok(refs)
    }
}
