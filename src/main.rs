//! FleetDash operator console.

use fleetdash::api::HttpBackend;
use fleetdash::catalog::ServiceCatalog;
use fleetdash::config::DashboardConfig;
use fleetdash::console;
use fleetdash::dashboard::{Dashboard, Timings};
use fleetdash::view::RenderTree;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Diagnostics go to stderr; stdout belongs to the console
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("fleetdash=info".parse()?))
        .init();

    // Load configuration
    let cfg = DashboardConfig::load();
    tracing::info!("Starting FleetDash against {}", cfg.base_url);

    let catalog = ServiceCatalog::load(&cfg.services_path)?;
    tracing::info!("Loaded {} services from {}", catalog.len(), cfg.services_path);
    if catalog.is_empty() {
        tracing::warn!("Service catalog is empty; only activator controls are available");
    }

    let view = Arc::new(RenderTree::new(catalog.keys().cloned()));
    let backend = Arc::new(HttpBackend::new(&cfg.base_url, cfg.request_timeout)?);

    let dashboard = Dashboard::new(backend, view.clone(), &catalog, Timings::from(&cfg));
    dashboard.start();

    console::run(&dashboard, &catalog, &view, cfg.confirm_restart).await?;

    dashboard.shutdown();
    Ok(())
}
