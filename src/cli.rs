//! CLI parser
use clap::Parser;
use std::num::{NonZeroU16, NonZeroU64, NonZeroUsize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_PROGRESS_DURATION,
    DEFAULT_SESSION_IDLE_MINUTES,
};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "BEAUTY_DEBUG")]
    /// Enable debug logging. Env: BEAUTY_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "8501", env = "BEAUTY_PORT")]
    /// http listener, defaults to `8501`.
    /// Env: BEAUTY_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "BEAUTY_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: BEAUTY_LISTEN_ADDRESS
    pub listen_address: String,
    #[clap(long, default_value = DEFAULT_API_BASE_URL, env = "BEAUTY_API_BASE_URL")]
    /// Image endpoint the encoded prompt is appended to.
    /// Env: BEAUTY_API_BASE_URL
    pub api_base_url: String,
    #[clap(long, default_value = DEFAULT_FETCH_TIMEOUT_SECS, env = "BEAUTY_FETCH_TIMEOUT_SECS")]
    /// Timeout for each image request, in seconds, defaults to `15`.
    /// Env: BEAUTY_FETCH_TIMEOUT_SECS
    pub fetch_timeout_secs: NonZeroU64,
    #[clap(
        long,
        default_value_t = DEFAULT_PROGRESS_DURATION.as_millis() as u64,
        env = "BEAUTY_PROGRESS_MS"
    )]
    /// Length of the progress animation run before each fetch, `0` disables it.
    /// Env: BEAUTY_PROGRESS_MS
    pub progress_ms: u64,
    #[clap(long, env = "BEAUTY_HISTORY_RETAIN")]
    /// Keep at most this many generations per visitor. Unset keeps them all.
    /// Env: BEAUTY_HISTORY_RETAIN
    pub history_retain: Option<NonZeroUsize>,
    #[clap(long, default_value_t = DEFAULT_SESSION_IDLE_MINUTES, env = "BEAUTY_SESSION_IDLE_MINUTES")]
    /// Minutes of inactivity before a visitor's studio is dropped.
    /// Env: BEAUTY_SESSION_IDLE_MINUTES
    pub session_idle_minutes: u64,
}
