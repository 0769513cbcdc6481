//! Shared constants/setters for things
//!

use std::sync::LazyLock;
use std::time::Duration;

/// Where prompts are sent unless configured otherwise.
pub const DEFAULT_API_BASE_URL: &str = "https://image.pollinations.ai/prompt/";

/// Socket timeout for a single image fetch, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: &str = "15";

/// Total length of the fixed progress schedule run before each fetch.
pub const DEFAULT_PROGRESS_DURATION: Duration = Duration::from_millis(5000);

/// Number of ticks in the progress schedule.
pub const PROGRESS_STEPS: u32 = 100;

/// How many history entries the home page shows.
pub const HISTORY_DISPLAY_LIMIT: usize = 10;

/// Default idle time before a studio session is torn down.
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 60;

/// Prefix of the PNG file offered for download.
pub const DOWNLOAD_FILE_PREFIX: &str = "beauty_art_";

/// chrono format of the timestamp part of the download file name.
pub const DOWNLOAD_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Largest upload body accepted, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// File extensions the upload form accepts.
pub const UPLOAD_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Max age (in seconds) for history image cache entries.
pub const HISTORY_IMAGE_MAX_AGE_SECONDS: u64 = 60 * 60;

/// Cache-Control value for history image responses. They belong to one visitor.
pub static HISTORY_IMAGE_CACHE_CONTROL: LazyLock<String> =
    LazyLock::new(|| format!("private, max-age={}", HISTORY_IMAGE_MAX_AGE_SECONDS));

/// Length of the per-session token every studio form carries back.
pub const CSRF_TOKEN_LENGTH: usize = 32;

/// Length of the random key tying a session cookie to its studio.
pub const STUDIO_KEY_LENGTH: usize = 24;
