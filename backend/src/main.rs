//! Backend entry-point: wires REST endpoints, persistence, and OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::Trace;
use backend::domain::{AccountService, AdmissionService, EventService};
use backend::inbound::http::events::{
    create_event, delete_event, get_event, leave_event, list_events, rsvp_event, update_event,
};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{login, signup};
use backend::outbound::persistence::{
    DbPool, DieselAttendanceLedger, DieselEventStore, DieselUserRepository, PoolConfig,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    run_migrations(&database_url).await?;

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
    let http_state = web::Data::new(build_http_state(&pool));

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays accessible.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .service(signup)
            .service(login)
            .service(create_event)
            .service(list_events)
            .service(get_event)
            .service(update_event)
            .service(delete_event)
            .service(rsvp_event)
            .service(leave_event);

        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

/// Wire the domain services over Diesel-backed adapters.
fn build_http_state(pool: &DbPool) -> HttpState {
    let events = Arc::new(DieselEventStore::new(pool.clone()));
    let ledger = Arc::new(DieselAttendanceLedger::new(pool.clone()));
    let users = Arc::new(DieselUserRepository::new(pool.clone()));

    HttpState::new(
        Arc::new(AccountService::new(users)),
        Arc::new(EventService::new(Arc::clone(&events), Arc::clone(&ledger))),
        Arc::new(EventService::new(Arc::clone(&events), Arc::clone(&ledger))),
        Arc::new(AdmissionService::new(events, ledger)),
    )
}

/// Load the session signing key, generating an ephemeral one in dev builds.
fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Apply pending migrations before accepting traffic.
async fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = diesel::PgConnection::establish(&url)
            .map_err(|e| std::io::Error::other(format!("database connection failed: {e}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))
    })
    .await
    .map_err(|e| std::io::Error::other(format!("migration task panicked: {e}")))?
}
