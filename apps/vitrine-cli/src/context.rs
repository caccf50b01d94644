//! Connection options and collaborator wiring.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use vitrine_sync::{
    CatalogApi, FeedSource, ItemStore, JsonFeedSource, ModeController, RestCatalog,
    RestCatalogConfig, SqliteItemStore, SyncConfig, SyncOrchestrator,
};

use crate::error::{CliError, CliResult};

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// SQLite database URL for the local item store
    #[arg(
        long,
        env = "VITRINE_DATABASE_URL",
        default_value = "sqlite://vitrine.db",
        global = true
    )]
    pub database_url: String,

    /// Path to the vendor feed JSON file
    #[arg(long, env = "VITRINE_FEED", default_value = "feed.json", global = true)]
    pub feed: PathBuf,

    /// Base URL of the storefront admin API
    #[arg(long, env = "VITRINE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Token for the storefront admin API
    #[arg(long, env = "VITRINE_API_TOKEN", hide_env_values = true, global = true)]
    pub api_token: Option<String>,

    /// Items per batch during sync runs
    #[arg(long, global = true)]
    pub batch_size: Option<usize>,

    /// Pause between batches, in milliseconds
    #[arg(long, global = true)]
    pub batch_pause_ms: Option<u64>,
}

/// Wires stores, feed, and catalog clients for command execution.
pub struct AppContext {
    args: ConnectionArgs,
}

impl AppContext {
    #[must_use]
    pub fn new(args: ConnectionArgs) -> Self {
        Self { args }
    }

    pub fn sync_config(&self) -> SyncConfig {
        let mut config = SyncConfig::default();
        if let Some(batch_size) = self.args.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(pause) = self.args.batch_pause_ms {
            config.batch_pause_ms = pause;
        }
        config
    }

    pub async fn store(&self) -> CliResult<Arc<dyn ItemStore>> {
        let store = SqliteItemStore::connect(&self.args.database_url)
            .await
            .map_err(|e| CliError::Database(e.to_string()))?;
        Ok(Arc::new(store))
    }

    pub fn feed(&self) -> Arc<dyn FeedSource> {
        Arc::new(JsonFeedSource::new(self.args.feed.clone()))
    }

    /// Build the catalog client. Requires API credentials.
    pub fn catalog(&self) -> CliResult<Arc<dyn CatalogApi>> {
        let base_url = self.args.api_url.clone().ok_or_else(|| {
            CliError::Config("missing API base URL (set --api-url or VITRINE_API_URL)".into())
        })?;
        let api_token = self.args.api_token.clone().ok_or_else(|| {
            CliError::Config("missing API token (set --api-token or VITRINE_API_TOKEN)".into())
        })?;

        let config = RestCatalogConfig {
            base_url,
            api_token,
            timeout_secs: self.sync_config().request_timeout_secs,
            page_size: 50,
        };
        let catalog = RestCatalog::new(&config).map_err(|e| CliError::Config(e.to_string()))?;
        Ok(Arc::new(catalog))
    }

    /// Controller for commands that talk to the backend.
    pub async fn controller(&self) -> CliResult<ModeController> {
        let catalog = self.catalog()?;
        self.controller_with(catalog).await
    }

    /// Controller for analyze and stage, which never issue catalog calls.
    /// A placeholder client keeps construction uniform without demanding
    /// credentials.
    pub async fn offline_controller(&self) -> CliResult<ModeController> {
        let catalog: Arc<dyn CatalogApi> = Arc::new(RestCatalog::with_http_client(
            "http://unconfigured.invalid".into(),
            String::new(),
            reqwest::Client::new(),
        ));
        self.controller_with(catalog).await
    }

    async fn controller_with(&self, catalog: Arc<dyn CatalogApi>) -> CliResult<ModeController> {
        let store = self.store().await?;
        let orchestrator = SyncOrchestrator::new(catalog, Arc::clone(&store), self.sync_config());
        Ok(ModeController::new(self.feed(), store, orchestrator))
    }
}
