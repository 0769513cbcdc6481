use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use axum::http::response::Builder;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use httpdate::{fmt_http_date, parse_http_date};

use crate::constants::HISTORY_IMAGE_CACHE_CONTROL;
use crate::error::BeautyError;
use crate::history::GenerationResult;

/// Cache headers for a history image. Entries never change once recorded,
/// so the generation time and sequence identify the bytes.
#[derive(Clone, Debug)]
pub(crate) struct ImageCacheHeaders {
    etag: Option<HeaderValue>,
    last_modified: Option<HeaderValue>,
    modified_at: SystemTime,
}

impl ImageCacheHeaders {
    pub(crate) fn for_result(result: &GenerationResult) -> Self {
        // http dates only carry whole seconds
        let seconds = u64::try_from(result.generated_at().timestamp()).unwrap_or(0);
        let modified_at = UNIX_EPOCH + Duration::from_secs(seconds);
        let etag = HeaderValue::from_str(&format!("W/\"{}-{}\"", result.sequence(), seconds)).ok();
        let last_modified = HeaderValue::from_str(&fmt_http_date(modified_at)).ok();
        Self {
            etag,
            last_modified,
            modified_at,
        }
    }

    pub(crate) fn etag(&self) -> Option<&HeaderValue> {
        self.etag.as_ref()
    }

    pub(crate) fn last_modified(&self) -> Option<&HeaderValue> {
        self.last_modified.as_ref()
    }
}

/// Applies image cache headers to a response builder.
pub(crate) fn apply_cache_headers(mut builder: Builder, cache: &ImageCacheHeaders) -> Builder {
    builder = builder.header(CACHE_CONTROL, HISTORY_IMAGE_CACHE_CONTROL.as_str());
    if let Some(etag) = cache.etag() {
        builder = builder.header(ETAG, etag.clone());
    }
    if let Some(last_modified) = cache.last_modified() {
        builder = builder.header(LAST_MODIFIED, last_modified.clone());
    }
    builder
}

/// Returns true when the request matches a not-modified response.
pub(crate) fn is_not_modified(headers: &HeaderMap, cache: &ImageCacheHeaders) -> bool {
    if let Some(if_none_match) = headers.get(IF_NONE_MATCH) {
        if let Ok(value) = if_none_match.to_str() {
            let value = value.trim();
            if value == "*" {
                return true;
            }
            if let Some(etag) = cache.etag().and_then(|value| value.to_str().ok())
                && value.split(',').any(|candidate| candidate.trim() == etag)
            {
                return true;
            }
        }
        return false;
    }

    if let Some(if_modified_since) = headers.get(IF_MODIFIED_SINCE)
        && let Ok(value) = if_modified_since.to_str()
        && let Ok(since) = parse_http_date(value)
        && cache.modified_at <= since
    {
        return true;
    }

    false
}

/// Builds a 304 response that preserves cache headers.
pub(crate) fn not_modified_response(cache: &ImageCacheHeaders) -> Result<Response, BeautyError> {
    let builder = Response::builder().status(StatusCode::NOT_MODIFIED);
    let builder = apply_cache_headers(builder, cache);
    builder.body(Body::empty()).map_err(BeautyError::from)
}
