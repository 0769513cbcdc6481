use tower_sessions::Session;

use crate::error::BeautyError;

const FLASH_FLAG_KEY: &str = "flash_flag";

pub(crate) const FLASH_HISTORY_CLEARED: u16 = 1;

#[derive(Clone, Debug)]
pub(crate) struct FlashMessage {
    pub(crate) text: &'static str,
    pub(crate) class: &'static str,
}

pub(crate) async fn set_flash(session: &Session, flag: u16) -> Result<(), BeautyError> {
    session.insert(FLASH_FLAG_KEY, flag).await?;
    Ok(())
}

pub(crate) async fn take_flash_message(
    session: &Session,
) -> Result<Option<FlashMessage>, BeautyError> {
    let flag = session
        .get::<u16>(FLASH_FLAG_KEY)
        .await?
        .filter(|flag| *flag != 0);
    if flag.is_some() {
        session.insert(FLASH_FLAG_KEY, 0u16).await?;
    }
    Ok(flag.and_then(message_for))
}

fn message_for(flag: u16) -> Option<FlashMessage> {
    match flag {
        FLASH_HISTORY_CLEARED => Some(FlashMessage {
            text: "Your studio was reset. Generated beauty arts have been cleared.",
            class: "info",
        }),
        _ => None,
    }
}
