//! Generate a single beauty art image from the command line.
//!
//!   beauty_art "elegant eyeliner and rosy cheeks" --style Glamorous --quality Ultra

use std::num::NonZeroU64;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use beauty_studio::config::setup_logging;
use beauty_studio::constants::{DEFAULT_API_BASE_URL, DEFAULT_FETCH_TIMEOUT_SECS};
use beauty_studio::fetcher::ImageFetcher;
use beauty_studio::prompt::{ApiSource, GenerationRequest, Quality, Style, compose_prompt};
use beauty_studio::studio::Studio;
use clap::Parser;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "beauty_art")]
#[command(about = "Compose a beauty prompt and fetch one generated image")]
struct Args {
    /// Describe the beauty transformation
    prompt: String,

    /// Beauty style, e.g. "Bridal Makeup", "Korean Glass Skin"
    #[arg(long, default_value_t = Style::default())]
    style: Style,

    /// Standard, High or Ultra
    #[arg(long, default_value_t = Quality::default())]
    quality: Quality,

    /// Where the PNG is written
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Image endpoint the encoded prompt is appended to
    #[arg(long, default_value = DEFAULT_API_BASE_URL, env = "BEAUTY_API_BASE_URL")]
    api_base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value = DEFAULT_FETCH_TIMEOUT_SECS)]
    timeout_secs: NonZeroU64,

    /// Print the composed prompt and exit without fetching
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug).map_err(|err| anyhow!("{err}"))?;

    let request = GenerationRequest::new(
        args.prompt.as_str(),
        args.style,
        args.quality,
        ApiSource::Pollinations,
    )?;

    if args.dry_run {
        println!("{}", compose_prompt(&request));
        return Ok(());
    }

    let base_url = Url::parse(&args.api_base_url)
        .with_context(|| format!("Invalid API base URL {}", args.api_base_url))?;
    let fetcher = ImageFetcher::new(&base_url, Duration::from_secs(args.timeout_secs.get()))?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let mut studio = Studio::default();
    let result = studio
        .generate(&request, &fetcher)
        .await
        .context("Generation failed, please try again with a different prompt or style")?;
    let path = result
        .save_png(&args.out_dir)
        .with_context(|| format!("Failed to write into {}", args.out_dir.display()))?;

    eprintln!("Saved: {}", path.display());
    Ok(())
}
