//! CLI smoke tool: open (or create) a document file, optionally point its
//! background at a URL, print the state, and save it back.
//!
//! Usage: `emojiboard [FILE] [BACKGROUND_URL]`

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use emojiboard::document::{Document, DocumentConfig};
use emojiboard::fetch::{FetchStatus, HttpFetcher};
use emojiboard::model::Background;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let path = PathBuf::from(args.next().unwrap_or_else(|| "art.emojiboard".into()));
    let background_url = args.next();

    let fetcher = Arc::new(HttpFetcher::new()?);
    let config = DocumentConfig::default();

    let doc = match std::fs::read(&path) {
        Ok(bytes) => {
            tracing::info!(path = %path.display(), "opening existing document");
            Document::open(&bytes, config, fetcher).await?
        }
        Err(_) => {
            tracing::info!(path = %path.display(), "creating new document");
            let doc = Document::new(config, fetcher).await;
            // Seed a fresh document with sample content.
            doc.add_emoji("⚽️", (-200, -100), 80).await;
            doc.add_emoji("🥃", (50, 100), 40).await;
            doc
        }
    };

    if let Some(url) = background_url {
        doc.set_background(Background::Url(url)).await;
        let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
        while doc.fetch_status().await == FetchStatus::Fetching
            && tokio::time::Instant::now() < deadline
        {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    for emoji in doc.emojis().await {
        println!("#{} {} at ({}, {}) size {}", emoji.id, emoji.text, emoji.x, emoji.y, emoji.size);
    }
    println!("background: {:?}", doc.background().await);
    println!("fetch status: {:?}", doc.fetch_status().await);

    let bytes = doc.encode().await?;
    std::fs::write(&path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "document saved");
    Ok(())
}
