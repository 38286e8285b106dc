// Terminal client: polls a pivitals endpoint and redraws on every tick

use anyhow::Result;
use pivitals::client::HttpSource;
use pivitals::config::{POLL_INTERVAL, WatchConfig};
use pivitals::poller::Poller;
use pivitals::{logging, render};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("warn");

    let watch_config = WatchConfig::from_env()?;
    let source = Arc::new(HttpSource::new(
        &watch_config.url,
        watch_config.request_timeout,
    )?);
    let poller = Poller::new(source);
    let mut updates = poller.subscribe();
    poller.start(POLL_INTERVAL)?;
    tracing::info!(url = %watch_config.url, "Watching");

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                // Clear screen, cursor home.
                print!("\x1b[2J\x1b[H{}", render::render_view(&view));
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }
    poller.stop();
    Ok(())
}
