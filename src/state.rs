use std::sync::Arc;

use quizhub_config::{CorsConfig, InferenceConfig, JwtConfig, RateLimitConfig, ServerConfig};
use quizhub_db::PgPool;

use crate::hints::{HintProvider, hint_provider};

/// Shared, read-only after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub server_config: ServerConfig,
    pub hints: Arc<dyn HintProvider>,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = quizhub_db::init_db_pool().await?;
    quizhub_db::run_migrations(&db).await?;

    Ok(AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        server_config: ServerConfig::from_env(),
        hints: hint_provider(&InferenceConfig::from_env())?,
    })
}
