use std::fmt::Display;
use std::time::Duration;

use axum::response::Redirect;

use super::csrf::{csrf_token, validate_csrf};
use super::flash;
use super::prelude::*;
use crate::constants::HISTORY_DISPLAY_LIMIT;
use crate::history::{GenerationResult, HistoryLog};
use crate::prompt::{ApiSource, Quality, Style};
use crate::upload::UploadedImage;

pub(crate) mod generate;
pub(crate) mod history;
pub(crate) mod upload;

#[derive(Clone, Debug)]
pub(crate) struct SelectOption {
    pub(crate) label: String,
    pub(crate) selected: bool,
}

fn select_options<T: Copy + PartialEq + Display>(all: &[T], selected: T) -> Vec<SelectOption> {
    all.iter()
        .map(|option| SelectOption {
            label: option.to_string(),
            selected: *option == selected,
        })
        .collect()
}

#[derive(Clone, Debug)]
pub(crate) struct Notice {
    pub(crate) text: String,
    pub(crate) class: &'static str,
}

impl Notice {
    pub(crate) fn new(class: &'static str, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }
}

/// What the generate form shows as picked.
#[derive(Clone, Debug, Default)]
pub(crate) struct FormSelection {
    pub(crate) prompt: String,
    pub(crate) style: Style,
    pub(crate) quality: Quality,
    pub(crate) api_source: ApiSource,
}

#[derive(Clone, Debug)]
pub(crate) struct HistoryItem {
    pub(crate) sequence: u64,
    pub(crate) prompt: String,
    pub(crate) style: &'static str,
    pub(crate) image_url: String,
    pub(crate) download_url: String,
}

impl From<&GenerationResult> for HistoryItem {
    fn from(result: &GenerationResult) -> Self {
        Self {
            sequence: result.sequence(),
            prompt: result.prompt().to_string(),
            style: result.style().label(),
            image_url: format!("/history/{}/image.png", result.sequence()),
            download_url: format!("/history/{}/download", result.sequence()),
        }
    }
}

/// The 10 most recent generations, newest first. Read only.
pub(crate) fn render_history(history: &HistoryLog) -> Vec<HistoryItem> {
    history
        .recent(HISTORY_DISPLAY_LIMIT)
        .map(HistoryItem::from)
        .collect()
}

#[derive(Clone, Debug)]
pub(crate) struct LatestView {
    pub(crate) item: HistoryItem,
    pub(crate) download_filename: String,
}

impl From<&GenerationResult> for LatestView {
    fn from(result: &GenerationResult) -> Self {
        Self {
            item: HistoryItem::from(result),
            download_filename: result.download_filename(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct UploadView {
    pub(crate) file_name: String,
    pub(crate) data_uri: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl From<&UploadedImage> for UploadView {
    fn from(upload: &UploadedImage) -> Self {
        Self {
            file_name: upload.file_name().to_string(),
            data_uri: upload.data_uri(),
            width: upload.image().width(),
            height: upload.image().height(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub(crate) struct HomeTemplate {
    pub(crate) csrf_token: String,
    pub(crate) prompt: String,
    pub(crate) styles: Vec<SelectOption>,
    pub(crate) qualities: Vec<SelectOption>,
    pub(crate) api_sources: Vec<SelectOption>,
    pub(crate) notices: Vec<Notice>,
    pub(crate) latest: Option<LatestView>,
    pub(crate) has_history: bool,
    pub(crate) history: Vec<HistoryItem>,
    pub(crate) total_generated: u64,
    pub(crate) upload: Option<UploadView>,
    pub(crate) progress_ms: u128,
}

impl HomeTemplate {
    pub(crate) fn new(
        csrf_token: String,
        history: &HistoryLog,
        selection: &FormSelection,
        progress: Duration,
    ) -> Self {
        let items = render_history(history);
        Self {
            csrf_token,
            prompt: selection.prompt.clone(),
            styles: select_options(&Style::ALL, selection.style),
            qualities: select_options(&Quality::ALL, selection.quality),
            api_sources: select_options(&ApiSource::ALL, selection.api_source),
            notices: Vec::new(),
            latest: None,
            has_history: !items.is_empty(),
            history: items,
            total_generated: history.total_generated(),
            upload: None,
            progress_ms: progress.as_millis(),
        }
    }

    pub(crate) fn notice(&mut self, class: &'static str, text: impl Into<String>) {
        self.notices.push(Notice::new(class, text));
    }
}

/// handles the / GET
pub(crate) async fn root_handler(
    State(state): State<AppState>,
    handle: StudioHandle,
) -> Result<HomeTemplate, BeautyError> {
    let csrf_token = csrf_token(&handle.session).await?;
    let flash = flash::take_flash_message(&handle.session).await?;

    let studio = handle.studio.lock().await;
    let mut page = HomeTemplate::new(
        csrf_token,
        studio.history(),
        &FormSelection::default(),
        state.pacer.total(),
    );
    if let Some(message) = flash {
        page.notice(message.class, message.text);
    }
    Ok(page)
}

#[derive(Deserialize)]
pub(crate) struct ResetForm {
    csrf_token: String,
}

/// Tears the visitor's studio down and starts over.
#[instrument(skip_all)]
pub(crate) async fn reset_handler(
    State(state): State<AppState>,
    handle: StudioHandle,
    Form(form): Form<ResetForm>,
) -> Result<Redirect, BeautyError> {
    validate_csrf(&handle.session, &form.csrf_token).await?;
    let session = handle.close(&state).await?;
    info!("Studio reset");
    flash::set_flash(&session, flash::FLASH_HISTORY_CLEARED).await?;
    Ok(Redirect::to("/"))
}
