use std::str::FromStr;

use crate::error::GenerationError;
use crate::prompt::{ApiSource, GenerationRequest, Quality, Style};
use crate::web::csrf::{csrf_token, validate_csrf};
use crate::web::prelude::*;
use crate::web::views::{FormSelection, HomeTemplate, LatestView};

const RETRY_HINT: &str = "Please try again with a different prompt or style.";

#[derive(Deserialize)]
pub(crate) struct GenerateForm {
    csrf_token: String,
    #[serde(default)]
    prompt: String,
    style: String,
    quality: String,
    api_source: String,
}

impl GenerateForm {
    fn selection(&self) -> Result<FormSelection, BeautyError> {
        Ok(FormSelection {
            prompt: self.prompt.clone(),
            style: Style::from_str(&self.style).map_err(|_| BeautyError::BadRequest)?,
            quality: Quality::from_str(&self.quality).map_err(|_| BeautyError::BadRequest)?,
            api_source: ApiSource::from_str(&self.api_source)
                .map_err(|_| BeautyError::BadRequest)?,
        })
    }
}

/// The submit action: validate, pace, compose, fetch, record.
#[instrument(skip_all, fields(style = %form.style, quality = %form.quality, api_source = %form.api_source))]
pub(crate) async fn generate_handler(
    State(state): State<AppState>,
    handle: StudioHandle,
    Form(form): Form<GenerateForm>,
) -> Result<HomeTemplate, BeautyError> {
    validate_csrf(&handle.session, &form.csrf_token).await?;
    let selection = form.selection()?;
    let csrf_token = csrf_token(&handle.session).await?;

    // held for the whole action, one generation per visitor at a time
    let mut studio = handle.studio.lock().await;

    let outcome = match GenerationRequest::new(
        selection.prompt.as_str(),
        selection.style,
        selection.quality,
        selection.api_source,
    ) {
        Ok(request) => {
            state.pacer.run().await;
            studio
                .generate(&request, &state.fetcher)
                .await
                .map(LatestView::from)
        }
        Err(err) => Err(err),
    };

    let mut page = HomeTemplate::new(
        csrf_token,
        studio.history(),
        &selection,
        state.pacer.total(),
    );
    match outcome {
        Ok(latest) => {
            page.notice(
                "success",
                format!(
                    "✨ Beauty Art #{} generated successfully!",
                    latest.item.sequence
                ),
            );
            page.latest = Some(latest);
        }
        Err(GenerationError::Validation) => {
            debug!("Empty description, nothing fetched");
            page.notice("error", GenerationError::Validation.to_string());
        }
        Err(err) => {
            info!("Generation failed: {}", err);
            page.notice("error", format!("Generation failed: {err}"));
            if err.suggests_retry() {
                page.notice("info", RETRY_HINT);
            }
        }
    }
    Ok(page)
}
