//! Session-scoped record of successful generations.

use std::collections::VecDeque;
use std::io::Cursor;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use image::{DynamicImage, ImageFormat};

use crate::constants::{DOWNLOAD_FILE_PREFIX, DOWNLOAD_TIMESTAMP_FORMAT};
use crate::prompt::Style;

/// One successful generation. Never changes after it's recorded.
#[derive(Clone, Debug)]
pub struct GenerationResult {
    sequence: u64,
    image: Arc<DynamicImage>,
    prompt: String,
    style: Style,
    generated_at: DateTime<Local>,
}

impl GenerationResult {
    /// 1-based position among all generations of the session.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The decoded image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// The composed prompt that produced the image.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Style picked for this generation.
    pub fn style(&self) -> Style {
        self.style
    }

    /// When the image arrived.
    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    /// `beauty_art_<YYYYMMDD_HHMMSS>.png`, stamped with the generation time.
    pub fn download_filename(&self) -> String {
        download_filename(self.generated_at)
    }

    /// PNG encoding of the image.
    pub fn png_bytes(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Writes the PNG into `dir` under its download filename.
    pub fn save_png(&self, dir: &Path) -> Result<PathBuf, image::ImageError> {
        let path = dir.join(self.download_filename());
        std::fs::write(&path, self.png_bytes()?)?;
        Ok(path)
    }
}

/// Download filename for a generation time.
pub fn download_filename(at: DateTime<Local>) -> String {
    format!(
        "{}{}.png",
        DOWNLOAD_FILE_PREFIX,
        at.format(DOWNLOAD_TIMESTAMP_FORMAT)
    )
}

/// Ordered generations plus the running total.
///
/// Without a retention cap every entry is kept for the life of the session,
/// so `len() == total_generated()`. With a cap, the oldest entries are evicted
/// once the cap is reached; the total and the sequence numbers are unaffected.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: VecDeque<GenerationResult>,
    total_generated: u64,
    retain: Option<NonZeroUsize>,
}

impl HistoryLog {
    /// Empty log that keeps everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty log that keeps at most `retain` entries when set.
    pub fn with_retention(retain: Option<NonZeroUsize>) -> Self {
        Self {
            retain,
            ..Self::default()
        }
    }

    /// Appends a generation stamped with the current local time.
    pub fn record(&mut self, image: DynamicImage, prompt: String, style: Style) -> &GenerationResult {
        self.record_at(image, prompt, style, Local::now())
    }

    /// Appends a generation with an explicit timestamp.
    pub fn record_at(
        &mut self,
        image: DynamicImage,
        prompt: String,
        style: Style,
        generated_at: DateTime<Local>,
    ) -> &GenerationResult {
        self.total_generated += 1;
        if let Some(retain) = self.retain {
            while self.entries.len() >= retain.get() {
                self.entries.pop_front();
            }
        }
        self.entries.push_back(GenerationResult {
            sequence: self.total_generated,
            image: Arc::new(image),
            prompt,
            style,
            generated_at,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first successful generation.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Successful generations this session, including evicted ones.
    pub fn total_generated(&self) -> u64 {
        self.total_generated
    }

    /// Up to `limit` entries, most recent first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &GenerationResult> {
        self.entries.iter().rev().take(limit)
    }

    /// Looks an entry up by its sequence number.
    pub fn get(&self, sequence: u64) -> Option<&GenerationResult> {
        let oldest = self.entries.front()?.sequence;
        let index = usize::try_from(sequence.checked_sub(oldest)?).ok()?;
        self.entries.get(index)
    }
}
