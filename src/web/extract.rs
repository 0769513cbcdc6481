use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rand::RngExt;
use rand::distr::Alphanumeric;
use tokio::sync::Mutex;
use tower_sessions::Session;

use super::prelude::*;
use crate::constants::STUDIO_KEY_LENGTH;
use crate::studio::Studio;

const STUDIO_KEY: &str = "studio_key";

/// Registry key for a new visitor. Never rendered into a page.
fn new_studio_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STUDIO_KEY_LENGTH)
        .map(char::from)
        .collect()
}

/// The visitor's session plus the studio it points at. Extracting this is what
/// creates a studio on first contact.
pub(crate) struct StudioHandle {
    pub(crate) session: Session,
    pub(crate) key: String,
    pub(crate) studio: Arc<Mutex<Studio>>,
}

impl StudioHandle {
    /// Drops the studio and forgets its key, the next request starts fresh.
    pub(crate) async fn close(self, state: &AppState) -> Result<Session, BeautyError> {
        state.studios.close(&self.key).await;
        self.session.remove::<String>(STUDIO_KEY).await?;
        Ok(self.session)
    }
}

impl FromRequestParts<AppState> for StudioHandle {
    type Rejection = BeautyError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| BeautyError::InternalServerError(message.to_string()))?;

        let key = match session.get::<String>(STUDIO_KEY).await? {
            Some(key) => key,
            None => {
                let key = new_studio_key();
                debug!("New visitor, assigning a studio");
                session.insert(STUDIO_KEY, key.clone()).await?;
                key
            }
        };
        let studio = state.studios.open(&key).await;

        Ok(Self {
            session,
            key,
            studio,
        })
    }
}
