use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use diesel::{QueryableByName, sql_types::Text};
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::{AsyncPgConnection, RunQueryDsl, pooled_connection::AsyncDieselConnectionManager};
use tracing::info;

use crate::routers::main_router::build_router;

use super::{
    config::{AppConfig, DbConfig},
    logging::init_logging,
    state::{DeploymentEnvironment, ServerState},
};

#[derive(QueryableByName)]
struct PgVersion {
    #[diesel(sql_type = Text)]
    version: String,
}

/// Reads `.env` unless `IS_CONTAINER` is set; containers get their
/// environment injected.
pub fn load_env() -> anyhow::Result<()> {
    if std::env::var("IS_CONTAINER").is_err() {
        dotenvy::dotenv().context("could not load .env; set IS_CONTAINER to skip it")?;
    }
    Ok(())
}

pub async fn build_pool(db_config: &DbConfig) -> anyhow::Result<Pool<AsyncPgConnection>> {
    let num_cores: u32 = num_cpus::get_physical() as u32;

    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_config.to_url());

    Ok(Pool::builder()
        .min_idle(Some(num_cores))
        .max_size(num_cores * 10u32)
        .build(manager)
        .await?)
}

pub async fn server_init_proc(start: tokio::time::Instant) -> anyhow::Result<()> {
    load_env()?;

    let config = AppConfig::from_env()?;
    let _log_guard = init_logging(&config)?;

    info!("Initializing server...");

    let pool = build_pool(&DbConfig::from_env()?).await?;

    let deployment_environment =
        DeploymentEnvironment::from_value(std::env::var("CURR_ENV").ok().as_deref());

    let state = Arc::new(
        ServerState::builder()
            .app_name_version(format!(
                "{} {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .pool(pool)
            .config(config.clone())
            .deployment_environment(deployment_environment)
            .server_start_time(start)
            .build()?,
    );

    let mut conn = state.get_conn().await?;
    let pg_version: PgVersion = diesel::sql_query("SELECT version()")
        .get_result(&mut conn)
        .await?;
    info!(version = %pg_version.version, "Connected to PostgreSQL");
    drop(conn);

    tokio::fs::create_dir_all(&config.static_dir)
        .await
        .with_context(|| format!("could not create {}", config.static_dir.display()))?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;

    info!(
        addr = %config.bind_addr(),
        env = ?deployment_environment,
        elapsed = ?start.elapsed(),
        "Backend server starting..."
    );

    axum::serve(
        listener,
        build_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
