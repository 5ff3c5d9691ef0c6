//! boxwatch — Binary Entrypoint
//! One invocation is one pass over all configured sources; run it from a
//! scheduler that does not overlap itself.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use boxwatch::config;
use boxwatch::notify::{
    pushbullet::{PushbulletNotifier, DEFAULT_CHANNEL_TAG},
    Notifier,
};
use boxwatch::pipeline;
use boxwatch::source::{fairyloot::FairyLoot, illumicrate::Illumicrate, owlcrate::OwlCrate, Source};
use boxwatch::summarize::{gemini::GeminiBackend, Summarizer};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("boxwatch=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Startup failures (config, client construction) are the only ones that
    // affect the exit status.
    let cfg = config::load_default()?;
    let backend = GeminiBackend::new(cfg.gemini_api_key.clone())?;
    let summarizer = Summarizer::new(backend);

    let notifier = cfg.notify.then(|| {
        PushbulletNotifier::new(cfg.pushbullet_api_key.clone())
            .with_channel_tag(DEFAULT_CHANNEL_TAG)
    });
    let notifier_ref = notifier.as_ref().map(|n| n as &dyn Notifier);

    let sources: Vec<Box<dyn Source>> = vec![
        Box::new(OwlCrate::new()?),
        Box::new(FairyLoot::new()?),
        Box::new(Illumicrate::new()?),
    ];

    let failures = pipeline::run_all(&sources, &cfg.ledger_dir, &summarizer, notifier_ref).await;
    if failures > 0 {
        tracing::warn!(failures, "some source cycles failed");
    }
    Ok(())
}
