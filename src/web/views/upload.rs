use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use crate::constants::MAX_UPLOAD_BYTES;
use crate::upload::{UploadError, accept_upload};
use crate::web::csrf::{csrf_token, validate_csrf};
use crate::web::prelude::*;
use crate::web::views::{FormSelection, HomeTemplate, UploadView};

/// Over-limit bodies become a notice, anything else malformed is a bad request.
fn multipart_failure(err: &MultipartError) -> Result<UploadError, BeautyError> {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        debug!("Upload over the limit: {}", err);
        Ok(UploadError::TooLarge(MAX_UPLOAD_BYTES))
    } else {
        debug!("Multipart error: {}", err);
        Err(BeautyError::BadRequest)
    }
}

/// Shows an uploaded image. It isn't kept or connected to the generator.
pub(crate) async fn upload_handler(
    State(state): State<AppState>,
    handle: StudioHandle,
    mut multipart: Multipart,
) -> Result<HomeTemplate, BeautyError> {
    let mut csrf_token_value: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut image_bytes: Vec<u8> = Vec::new();
    let mut rejected: Option<UploadError> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                rejected = Some(multipart_failure(&err)?);
                break;
            }
        };
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "csrf_token" => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| BeautyError::InternalServerError(err.to_string()))?;
                csrf_token_value = Some(value);
            }
            "image" => {
                file_name = field.file_name().map(str::to_string);
                content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => image_bytes = bytes.to_vec(),
                    Err(err) => {
                        rejected = Some(multipart_failure(&err)?);
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    match (&csrf_token_value, &rejected) {
        (Some(token), _) => validate_csrf(&handle.session, token).await?,
        // the body was cut off before the token arrived, only the notice is shown
        (None, Some(_)) => {}
        (None, None) => return Err(BeautyError::BadRequest),
    }
    let csrf_token = csrf_token(&handle.session).await?;

    let studio = handle.studio.lock().await;
    let mut page = HomeTemplate::new(
        csrf_token,
        studio.history(),
        &FormSelection::default(),
        state.pacer.total(),
    );
    let outcome = match rejected {
        Some(err) => Err(err),
        None => accept_upload(file_name.as_deref(), content_type.as_deref(), image_bytes),
    };
    match outcome {
        Ok(upload) => {
            info!(
                "Displaying upload {} ({}x{})",
                upload.file_name(),
                upload.image().width(),
                upload.image().height()
            );
            page.upload = Some(UploadView::from(&upload));
            page.notice(
                "success",
                "Image uploaded successfully! You can now apply transformations.",
            );
        }
        Err(err) => {
            debug!("Upload rejected: {}", err);
            page.notice("error", err.to_string());
        }
    }
    Ok(page)
}
