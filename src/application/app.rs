use crate::config::Settings;
use crate::domain::AuctionConfig;
use crate::error::{Error, Result};
use crate::proxy::types::RequestSizeLimit;
use crate::proxy::{AuctionService, ProxyConfig};
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Main application struct that coordinates all components
pub struct Application {
    settings: Settings,
    auction_config: AuctionConfig,
}

impl Application {
    /// Load settings from the environment and build the auction configuration
    #[instrument]
    pub fn new() -> Result<Self> {
        Self::from_settings(Settings::new()?)
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let auction_config = AuctionConfig::from_settings(&settings.auction)?;

        if auction_config.publisher_id.to_string().is_empty() {
            warn!(
                "auction.publisher_id is empty; bidder parameters will carry an empty publisherId"
            );
        }

        info!(
            bidder_url = %auction_config.bidder_url,
            dsp_url = %auction_config.dsp_url,
            mapped_bundles = auction_config.slots.bundle_count(),
            "Auction configuration loaded"
        );

        Ok(Self {
            settings,
            auction_config,
        })
    }

    fn proxy_config(&self) -> Result<ProxyConfig> {
        let max_request_size = RequestSizeLimit::try_new(self.settings.proxy.max_request_size)
            .map_err(|e| Error::invalid_configuration("proxy.max_request_size", e.to_string()))?;
        Ok(ProxyConfig { max_request_size })
    }

    /// Serve the auction endpoint until Ctrl-C
    #[instrument(skip(self))]
    pub async fn run(self) -> Result<()> {
        let service = AuctionService::new(&self.auction_config, self.proxy_config()?)?;
        let router = service.into_router();

        let address = self.settings.listen_address();
        let listener = TcpListener::bind(&address).await?;
        info!(address = %address, "Starting RTB arbiter server");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn auction_config(&self) -> &AuctionConfig {
        &self.auction_config
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
