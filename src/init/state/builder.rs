use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::bb8::Pool;

use crate::{
    init::config::AppConfig,
    repository::{BlogStore, PgBlogStore},
    util::{crypto::token::TokenService, file_store::FileStore},
};

use super::deployment_environment::DeploymentEnvironment;
use super::server_state::ServerState;

#[derive(Default)]
pub struct ServerStateBuilder {
    app_name_version: Option<String>,
    server_start_time: Option<tokio::time::Instant>,
    pool: Option<Pool<AsyncPgConnection>>,
    store: Option<Arc<dyn BlogStore>>,
    config: Option<AppConfig>,
    deployment_environment: Option<DeploymentEnvironment>,
}

impl ServerStateBuilder {
    pub fn app_name_version(mut self, app_name_version: String) -> Self {
        self.app_name_version = Some(app_name_version);
        self
    }

    pub fn server_start_time(mut self, server_start_time: tokio::time::Instant) -> Self {
        self.server_start_time = Some(server_start_time);
        self
    }

    /// Also backs the store with PostgreSQL unless [`Self::store`] overrides it.
    pub fn pool(mut self, pool: Pool<AsyncPgConnection>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn store(mut self, store: Arc<dyn BlogStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn deployment_environment(mut self, env: DeploymentEnvironment) -> Self {
        self.deployment_environment = Some(env);
        self
    }

    pub fn build(self) -> anyhow::Result<ServerState> {
        let config = self
            .config
            .ok_or_else(|| anyhow::anyhow!("config is required"))?;

        let store: Arc<dyn BlogStore> = match (self.store, &self.pool) {
            (Some(store), _) => store,
            (None, Some(pool)) => Arc::new(PgBlogStore::new(pool.clone())),
            (None, None) => return Err(anyhow::anyhow!("pool or store is required")),
        };

        Ok(ServerState {
            app_name_version: self
                .app_name_version
                .unwrap_or_else(|| format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))),
            server_start_time: self
                .server_start_time
                .ok_or_else(|| anyhow::anyhow!("server_start_time is required"))?,
            pool: self.pool,
            store,
            tokens: TokenService::new(&config.secret_key, config.token_ttl()),
            files: FileStore::new(config.static_dir.clone()),
            config,
            responses_handled: AtomicU64::new(0u64),
            deployment_environment: self
                .deployment_environment
                .unwrap_or(DeploymentEnvironment::Prod),
        })
    }
}
