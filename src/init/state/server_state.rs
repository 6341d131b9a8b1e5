use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use crate::{
    init::config::AppConfig,
    repository::BlogStore,
    util::{crypto::token::TokenService, file_store::FileStore},
};

use super::builder::ServerStateBuilder;
use super::deployment_environment::DeploymentEnvironment;

pub struct ServerState {
    pub(crate) app_name_version: String,
    pub(crate) server_start_time: tokio::time::Instant,
    pub(crate) pool: Option<Pool<AsyncPgConnection>>,
    pub(crate) store: Arc<dyn BlogStore>,
    pub(crate) tokens: TokenService,
    pub(crate) files: FileStore,
    pub(crate) config: AppConfig,
    pub(crate) responses_handled: AtomicU64,
    pub(crate) deployment_environment: DeploymentEnvironment,
}

impl ServerState {
    pub fn builder() -> ServerStateBuilder {
        ServerStateBuilder::default()
    }

    pub fn get_app_name_version(&self) -> String {
        self.app_name_version.clone()
    }

    pub fn get_uptime(&self) -> tokio::time::Duration {
        self.server_start_time.elapsed()
    }

    /// Raw pool access for startup probes; request paths go through [`Self::store`].
    pub async fn get_conn(&self) -> anyhow::Result<PooledConnection<'_, AsyncPgConnection>> {
        let pool = self
            .pool
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no database pool configured"))?;
        Ok(pool.get().await?)
    }

    pub fn store(&self) -> &dyn BlogStore {
        self.store.as_ref()
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn deployment_environment(&self) -> DeploymentEnvironment {
        self.deployment_environment
    }

    pub fn get_responses_handled(&self) -> u64 {
        self.responses_handled.load(Ordering::SeqCst)
    }

    pub fn add_responses_handled(&self) {
        self.responses_handled.fetch_add(1, Ordering::SeqCst);
    }
}
