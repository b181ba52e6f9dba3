mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{DeleteResult, ICallLogRepo, IReminderRepo, Repos};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::warn;

/// Everything the usecases need to run: repositories, configuration, the
/// clock and the telephony capability.
#[derive(Clone)]
pub struct CallmeContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub telephony: Arc<dyn ITelephonyService>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl CallmeContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        Self {
            repos,
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            telephony: telephony_from_env(),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> CallmeContext {
    CallmeContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

/// Context backed by in-memory repositories and a stub telephony service.
/// Used by tests.
pub fn setup_inmemory_context() -> CallmeContext {
    CallmeContext {
        repos: Repos::create_inmemory(),
        config: Config::new(),
        sys: Arc::new(RealSys {}),
        telephony: Arc::new(StubTelephonyService {}),
    }
}

fn telephony_from_env() -> Arc<dyn ITelephonyService> {
    match VapiCallerService::from_env() {
        Some(vapi) => Arc::new(vapi),
        None => {
            warn!(
                "VAPI_API_KEY / VAPI_PHONE_NUMBER_ID are not set, outbound calls will be recorded as failed"
            );
            Arc::new(UnconfiguredTelephonyService {})
        }
    }
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
