//! Run command implementation

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::display::{ConsoleReporter, SnapshotPublisher};
use crate::feed::FeedMonitor;
use crate::portfolio::MetricsProjection;
use crate::telemetry::PrometheusSink;
use crate::web::{self, UsdRateClient, WebState};
use crate::ws::TungsteniteConnector;
use clap::Args;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Stream and export metrics only, without the web page
    #[arg(long)]
    pub no_web: bool,
}

impl RunArgs {
    /// Wire the stream worker and the web server and run until Ctrl-C
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let cancel = CancellationToken::new();
        let position = config.position();

        let (snapshots, snapshot_rx) = SnapshotPublisher::new();
        let dispatcher = Dispatcher::new(position)
            .with_consumer(MetricsProjection::new(Arc::new(PrometheusSink::new())))
            .with_consumer(ConsoleReporter::new())
            .with_consumer(snapshots);

        let ws_config = config.ws_config();
        let monitor = FeedMonitor::new(
            TungsteniteConnector::from_config(&ws_config),
            ws_config,
            dispatcher,
        );
        let feed_state = monitor.state();

        let web_task = if self.no_web {
            None
        } else {
            let usd_rates = config
                .web
                .usd_rate_url
                .as_deref()
                .map(UsdRateClient::new)
                .transpose()?;
            let state = WebState::new(
                position,
                snapshot_rx,
                feed_state,
                usd_rates,
                config.web.refresh_secs,
            );
            let listener = TcpListener::bind(config.web.bind).await?;
            Some(tokio::spawn(web::serve(listener, state, cancel.clone())))
        };

        let feed_task = tokio::spawn(monitor.run(cancel.clone()));

        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown requested");
        cancel.cancel();

        let stats = feed_task.await?;
        tracing::info!(?stats, "Feed worker finished");

        if let Some(task) = web_task {
            task.await??;
        }

        Ok(())
    }
}
