/// Multipart form reader for thread and comment submissions
///
/// Text parts are collected by name; every `images` part becomes an
/// `ImageUpload`. Cumulative image bytes are checked while streaming so an
/// oversized request is rejected before it is fully buffered.
use crate::error::{AppError, Result};
use crate::models::ImageUpload;
use actix_multipart::Multipart;
use futures_util::StreamExt;
use std::collections::HashMap;

/// Multipart field name carrying image files
pub const IMAGES_FIELD: &str = "images";

/// Upper bound on a single text part
const TEXT_FIELD_MAX_BYTES: usize = 64 * 1024;

#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub images: Vec<ImageUpload>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Text value with surrounding whitespace removed; empty counts as absent
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.text(name).map(str::trim).filter(|v| !v.is_empty())
    }
}

pub async fn read_form(mut payload: Multipart, request_max_bytes: usize) -> Result<UploadForm> {
    let mut form = UploadForm::default();
    let mut image_bytes = 0usize;

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        let name = field.name().unwrap_or_default().to_string();
        // Browsers send an empty, unnamed file part when nothing was picked
        let has_filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map_or(false, |f| !f.is_empty());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Chunk read error: {}", e)))?;

            if name == IMAGES_FIELD {
                image_bytes += chunk.len();
                if image_bytes > request_max_bytes {
                    return Err(AppError::PayloadTooLarge {
                        size: image_bytes,
                        limit: request_max_bytes,
                    });
                }
            } else if data.len() + chunk.len() > TEXT_FIELD_MAX_BYTES {
                return Err(AppError::BadRequest(format!(
                    "field '{}' exceeds {} bytes",
                    name, TEXT_FIELD_MAX_BYTES
                )));
            }
            data.extend_from_slice(&chunk);
        }

        if name == IMAGES_FIELD {
            if data.is_empty() && !has_filename {
                continue;
            }
            form.images.push(ImageUpload::new(data));
        } else if !name.is_empty() {
            let value = String::from_utf8(data)
                .map_err(|_| AppError::BadRequest(format!("field '{}' is not UTF-8", name)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
