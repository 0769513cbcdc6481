pub(crate) use crate::error::BeautyError;
pub(crate) use crate::web::{AppState, extract::StudioHandle};
pub(crate) use askama::Template;
pub(crate) use askama_web::WebTemplate;
pub(crate) use axum::extract::{Form, Path, State};
pub(crate) use axum::http::header::CONTENT_TYPE;
pub(crate) use serde::Deserialize;
pub(crate) use std::sync::Arc;
pub(crate) use tracing::{debug, info, instrument};
