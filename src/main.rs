mod app;
mod config;
mod topology;
mod util;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::Config;
use topology::TopologyClient;

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config.log_level);

    let client = TopologyClient::new(&config.api_url, config.request_timeout())?;
    tracing::info!(endpoint = client.endpoint(), "starting topology viewer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "vCenter Topology",
        options,
        Box::new(move |cc| Ok(Box::new(app::TopologyViewerApp::new(cc, &config, client)))),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
