//! Form tokens for the generate, reset and upload forms.

use rand::RngExt;
use rand::distr::Alphanumeric;
use tower_sessions::Session;
use tracing::debug;

use crate::constants::CSRF_TOKEN_LENGTH;
use crate::error::BeautyError;

const CSRF_TOKEN_KEY: &str = "csrf_token";

fn new_form_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CSRF_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// The token rendered into every studio form, minted on the first page view.
pub(crate) async fn csrf_token(session: &Session) -> Result<String, BeautyError> {
    if let Some(token) = session.get::<String>(CSRF_TOKEN_KEY).await? {
        return Ok(token);
    }
    let token = new_form_token();
    session.insert(CSRF_TOKEN_KEY, token.clone()).await?;
    Ok(token)
}

/// A form post is accepted only with the token this session was given.
pub(crate) async fn validate_csrf(session: &Session, submitted: &str) -> Result<(), BeautyError> {
    match session.get::<String>(CSRF_TOKEN_KEY).await? {
        Some(expected) if !submitted.is_empty() && expected == submitted => Ok(()),
        Some(_) => {
            debug!("Form token mismatch");
            Err(BeautyError::Unauthorized)
        }
        None => {
            debug!("Form posted before any page was served to this session");
            Err(BeautyError::Unauthorized)
        }
    }
}
