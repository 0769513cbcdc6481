//! Upload viewer: checks and decodes a user-supplied image for display.
//! Nothing is stored and nothing is transformed.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::constants::UPLOAD_EXTENSIONS;

/// Why an upload can't be shown.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum UploadError {
    /// No file was chosen.
    Missing,
    /// Not a PNG or JPEG.
    UnsupportedType(String),
    /// Looked like an image but didn't decode.
    Undecodable(String),
    /// Body went past the upload limit, in bytes.
    TooLarge(usize),
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "Please choose an image to upload."),
            Self::UnsupportedType(what) => write!(
                f,
                "Unsupported file type ({what}). Please upload a PNG or JPG image."
            ),
            Self::Undecodable(err) => write!(f, "Could not read the image: {err}"),
            Self::TooLarge(limit) => write!(
                f,
                "The image is too large. Please upload a file under {} MB.",
                limit / (1024 * 1024)
            ),
        }
    }
}

impl std::error::Error for UploadError {}

/// A decoded upload, alive only for the response that shows it.
#[derive(Debug)]
pub struct UploadedImage {
    file_name: String,
    format: ImageFormat,
    image: DynamicImage,
    bytes: Vec<u8>,
}

impl UploadedImage {
    /// Name the browser sent, or "upload" when it sent none.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Detected container format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// The decoded image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// MIME type for the detected format.
    pub fn mime(&self) -> &'static str {
        match self.format {
            ImageFormat::Png => "image/png",
            _ => "image/jpeg",
        }
    }

    /// The original bytes as a `data:` URI for inline display.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

fn extension_allowed(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            UPLOAD_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

fn content_type_allowed(content_type: &str) -> bool {
    matches!(
        content_type.trim().to_ascii_lowercase().as_str(),
        "image/png" | "image/jpeg" | "image/jpg"
    )
}

/// Filters by extension (or content type when there's no file name), then
/// sniffs and decodes the bytes.
pub fn accept_upload(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> Result<UploadedImage, UploadError> {
    let file_name = file_name.map(str::trim).filter(|name| !name.is_empty());
    if bytes.is_empty() {
        return Err(UploadError::Missing);
    }

    match (file_name, content_type) {
        (Some(name), _) if !extension_allowed(name) => {
            return Err(UploadError::UnsupportedType(name.to_string()));
        }
        (None, Some(content_type)) if !content_type_allowed(content_type) => {
            return Err(UploadError::UnsupportedType(content_type.to_string()));
        }
        (None, None) => {
            return Err(UploadError::UnsupportedType("unknown".to_string()));
        }
        _ => {}
    }

    let reader = image::ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(|err| UploadError::Undecodable(err.to_string()))?;
    let format = match reader.format() {
        Some(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => format,
        other => {
            debug!("Rejected upload with sniffed format {:?}", other);
            return Err(UploadError::UnsupportedType(
                other
                    .map(|format| format!("{format:?}"))
                    .unwrap_or_else(|| "unrecognised data".to_string()),
            ));
        }
    };
    let image = reader.decode().map_err(|err| {
        debug!("Failed to decode upload: {}", err);
        UploadError::Undecodable(err.to_string())
    })?;

    Ok(UploadedImage {
        file_name: file_name.unwrap_or("upload").to_string(),
        format,
        image,
        bytes,
    })
}
