use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use beauty_studio::config::setup_logging;
use beauty_studio::error::GenerationError;
use beauty_studio::fetcher::ImageFetcher;
use beauty_studio::prompt::{ApiSource, GenerationRequest, Quality, Style, compose_prompt};
use beauty_studio::studio::Studio;
use url::Url;

type Seen = Arc<Mutex<Vec<String>>>;

fn jpeg_bytes() -> Vec<u8> {
    let image = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        8,
        6,
        image::Rgb([200, 120, 140]),
    ));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    bytes
}

/// Pretends to be the image endpoint: 200 with a JPEG unless the prompt mentions "busy".
async fn endpoint() -> (Url, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route(
            "/prompt/{*prompt}",
            axum::routing::get(
                |State(seen): State<Seen>, Path(prompt): Path<String>| async move {
                    let busy = prompt.contains("busy");
                    if let Ok(mut seen) = seen.lock() {
                        seen.push(prompt);
                    }
                    if busy {
                        (axum::http::StatusCode::SERVICE_UNAVAILABLE, Vec::new())
                    } else {
                        (axum::http::StatusCode::OK, jpeg_bytes())
                    }
                },
            ),
        )
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (
        Url::parse(&format!("http://{addr}/prompt/")).expect("url"),
        seen,
    )
}

fn fetcher(base: &Url) -> ImageFetcher {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client");
    ImageFetcher::with_client(base, client).expect("fetcher")
}

#[tokio::test]
async fn studio_session_end_to_end() {
    let _ = setup_logging(true);
    let (base, seen) = endpoint().await;
    let fetcher = fetcher(&base);
    let mut studio = Studio::default();

    let request = GenerationRequest::new(
        "elegant eyeliner, 'rosy' cheeks & glitter?",
        Style::Glamorous,
        Quality::Ultra,
        ApiSource::StableDiffusion,
    )
    .expect("valid request");
    let result = studio
        .generate(&request, &fetcher)
        .await
        .expect("generated");
    assert_eq!((result.image().width(), result.image().height()), (8, 6));
    assert_eq!(result.sequence(), 1);

    let busy = GenerationRequest::new("busy", Style::BridalMakeup, Quality::Standard, ApiSource::Auto)
        .expect("valid request");
    let err = studio
        .generate(&busy, &fetcher)
        .await
        .expect_err("endpoint is busy");
    assert_eq!(err, GenerationError::RemoteStatus(503));

    assert_eq!(studio.history().len(), 1);
    assert_eq!(studio.history().total_generated(), 1);

    let seen = seen.lock().expect("lock").clone();
    assert_eq!(seen, vec![compose_prompt(&request), compose_prompt(&busy)]);
}

#[test]
fn empty_text_never_builds_a_request() {
    let err = GenerationRequest::new("", Style::BridalMakeup, Quality::High, ApiSource::Auto)
        .expect_err("empty text");
    assert_eq!(err, GenerationError::Validation);
    assert!(err.to_string().contains("Please enter a description"));
}
