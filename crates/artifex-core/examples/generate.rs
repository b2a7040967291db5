//! Generate an image from the command line environment.
//!
//! ```sh
//! ARTIFEX_API_KEY=sk-... cargo run --example generate -- "a red fox in the snow"
//! ```

use std::sync::Arc;

use artifex_core::prelude::*;
use artifex_core::studio::GenerationRequest;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artifex_core=info".into()),
        )
        .init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "a red fox in the snow".to_string());

    let config = Config::load()?;
    let gateway = Arc::new(RemoteGateway::from_config(&config)?);
    let studio = Studio::new(gateway);

    let mut session = Session::new(Arc::new(JsonGalleryStore::new(config.gallery_path()?)));
    session.login();

    let request = GenerationRequest::new(
        prompt,
        StylePack::default_pack().clone(),
        AspectRatio::Square,
    );

    let outcome = studio.generate(&request).await?;
    if let Some(message) = &outcome.error {
        eprintln!("{}", message);
    } else {
        println!("boosted prompt: {}", outcome.result.boosted_prompt);
    }

    // Persist the result and dump the image next to us for a quick look.
    session.record_outcome(&outcome);
    if outcome.is_success() {
        let image = EncodedImage::from_data_url(&outcome.result.image_url)?;
        let path = format!("artifex-{}.png", &outcome.result.id[..8]);
        std::fs::write(&path, &image.data)?;
        println!("saved {}", path);
    }

    println!("gallery now holds {} result(s)", session.gallery().len());
    Ok(())
}
