//! Headless globe viewer: follows a running talent server and keeps the
//! derived layers current without drawing anything.

use std::sync::Arc;
use std::time::Duration;

use catalog::{AnalyticsKind, LiveChannels};
use clap::Parser;
use compute::{AnalyticsProcessor, MemorySink};
use scene::{GlobeView, HeadlessFactory, Surface};
use streaming::{ApiClient, HttpCatalog, PointStore, RemoteChangeFeed, changes_url};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use viewer::GlobeSession;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless voice talent globe")]
struct Args {
    /// Talent API base URL
    #[arg(long, env = "GLOBE_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    server_url: String,

    /// Frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Analytics batch interval, in milliseconds
    #[arg(long, default_value_t = 5000)]
    poll_interval_ms: u64,

    /// Stop after this many seconds; runs until interrupted otherwise
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Timeout for outbound HTTP calls, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 10)]
    http_timeout_secs: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run(Args::parse()).await {
        error!("viewer failed: {err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let live = LiveChannels::new();
    let client = ApiClient::with_timeout(
        args.server_url.clone(),
        Duration::from_secs(args.http_timeout_secs),
    )?;
    let store = Arc::new(PointStore::new(Arc::new(HttpCatalog::new(client))));

    let feed = match RemoteChangeFeed::connect(
        &changes_url(&args.server_url),
        live.remote_changes.clone(),
    )
    .await
    {
        Ok(feed) => Some(feed),
        Err(err) => {
            warn!("change feed unavailable, showing a static catalog: {err}");
            None
        }
    };

    let poll = Duration::from_millis(args.poll_interval_ms.max(1));
    let processor = AnalyticsProcessor::new(live.clone(), Arc::new(MemorySink::new()));
    let processor_handle = processor.start(poll);

    let view = GlobeView::new(Box::new(HeadlessFactory::new()));
    let mut session = GlobeSession::new(store, &live, view);
    session.start(Surface::new(args.width, args.height)).await?;

    let frame = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let mut frames = tokio::time::interval(frame);
    let mut analytics = tokio::time::interval(poll);
    let deadline = async {
        match args.duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            _ = frames.tick() => {
                session.tick(frame).await;
            }
            _ = analytics.tick() => {
                let samples = session.market_samples();
                if !samples.is_empty() {
                    processor.queue_analytics(AnalyticsKind::Market, serde_json::to_value(samples)?);
                }
            }
        }
    }

    info!(
        visible = session.datasets().visible.len(),
        transactions = session.transaction_log().len(),
        "viewer stopping"
    );
    session.shutdown();
    processor_handle.shutdown().await;
    if let Some(feed) = feed {
        feed.shutdown().await;
    }
    Ok(())
}
