use axum::body::Body;
use axum::http::HeaderMap;
use axum::http::header::CONTENT_DISPOSITION;
use axum::response::Response;

use crate::web::images::{
    ImageCacheHeaders, apply_cache_headers, is_not_modified, not_modified_response,
};
use crate::web::prelude::*;

/// Inline PNG for a history entry.
pub(crate) async fn history_image_handler(
    handle: StudioHandle,
    headers: HeaderMap,
    Path(sequence): Path<u64>,
) -> Result<Response, BeautyError> {
    let studio = handle.studio.lock().await;
    let result = studio
        .history()
        .get(sequence)
        .ok_or_else(|| BeautyError::NotFound(format!("history image {sequence}")))?;

    let cache_headers = ImageCacheHeaders::for_result(result);
    if is_not_modified(&headers, &cache_headers) {
        return not_modified_response(&cache_headers);
    }
    let bytes = result.png_bytes()?;
    let builder = Response::builder().header(CONTENT_TYPE, "image/png");
    apply_cache_headers(builder, &cache_headers)
        .body(Body::from(bytes))
        .map_err(BeautyError::from)
}

/// The save/export action: PNG as an attachment named after the generation time.
pub(crate) async fn history_download_handler(
    handle: StudioHandle,
    Path(sequence): Path<u64>,
) -> Result<Response, BeautyError> {
    let studio = handle.studio.lock().await;
    let result = studio
        .history()
        .get(sequence)
        .ok_or_else(|| BeautyError::NotFound(format!("history download {sequence}")))?;

    let bytes = result.png_bytes()?;
    debug!("Downloading {} ({} bytes)", result.download_filename(), bytes.len());
    Response::builder()
        .header(CONTENT_TYPE, "image/png")
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", result.download_filename()),
        )
        .body(Body::from(bytes))
        .map_err(BeautyError::from)
}
