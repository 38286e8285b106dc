use anyhow::Result;
use pivitals::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("info");

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        probe = %app_config.probe.command,
        thermal_policy = ?app_config.sampling.thermal_policy,
        cpu_usage = ?app_config.sampling.cpu_usage,
        "Starting {} {}",
        version::NAME,
        version::VERSION
    );

    let host = Arc::new(sampler::SystemHost::new(
        app_config.sampling.proc_path.clone(),
    ));
    let probe = Arc::new(sampler::CommandProbe::new(
        app_config.probe.command.clone(),
        app_config.probe.args.clone(),
        app_config.probe.timeout(),
    ));
    let sampler = Arc::new(sampler::Sampler::new(
        host,
        probe,
        sampler::SamplerOptions {
            thermal_policy: app_config.sampling.thermal_policy,
            cpu_usage: app_config.sampling.cpu_usage,
        },
    ));

    // The endpoint gets its own interval baseline; requests must not shift the poller's.
    let endpoint_sampler = Arc::new(sampler.fork());
    let poller = Arc::new(poller::Poller::new(sampler));
    poller.start(config::POLL_INTERVAL)?;

    let app = routes::app(endpoint_sampler, poller.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
        }
    }
    poller.stop();

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
