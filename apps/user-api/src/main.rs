use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use user_api::app::{apply_middleware, build_router};
use user_api::config::{AuthConfig, ConfigError, MiddlewareConfig};
use user_api::constants::{ENV, LOCAL_ENV, SERVICE, USER_API_PORT};
use user_api::keycloak::{KeycloakClient, KeycloakConfig};
use user_api::middleware::JwtVerifier;
use user_api::shutdown::{shutdown_signal, with_drain_deadline};
use user_api::state::AppState;
use user_lib::user_service::UserService;

const DEFAULT_PORT: u16 = 3333;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let env = std::env::var(ENV).map_err(|_| ConfigError::Missing(ENV))?;

    let registry = tracing_subscriber::registry().with(filter);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true);

    if env == LOCAL_ENV {
        let pretty_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .pretty();
        registry.with(json_layer).with(pretty_layer).init();
    } else {
        registry.with(json_layer).init();
    }

    tracing::info!(service = SERVICE, env = %env, "tracing initialized");

    let middleware_config = MiddlewareConfig::from_env();
    tracing::info!(
        rate_limit_per_minute = middleware_config.rate_limit_per_minute,
        rate_limit_burst = middleware_config.rate_limit_burst,
        request_timeout_secs = middleware_config.request_timeout.as_secs(),
        max_body_size = middleware_config.max_body_size,
        shutdown_timeout_secs = middleware_config.shutdown_timeout.as_secs(),
        cors_origins = ?middleware_config.cors_allowed_origins,
        "middleware configuration loaded"
    );

    let auth_config = AuthConfig::from_env()?;
    let verifier = JwtVerifier::from_config(&auth_config)?;
    tracing::info!(
        required_role = %auth_config.required_role,
        issuer = ?auth_config.issuer,
        "bearer token verification configured"
    );

    let keycloak = KeycloakClient::new(KeycloakConfig::from_env())?;
    if !keycloak.is_configured() {
        tracing::warn!(
            realm = %keycloak.realm(),
            "keycloak client secret is empty; user endpoints will fail until it is set"
        );
    } else {
        tracing::info!(realm = %keycloak.realm(), "keycloak admin client configured");
    }

    let app_state = AppState {
        user_service: Arc::new(UserService::new(Arc::new(keycloak))),
        verifier: Arc::new(verifier),
        env: env.clone(),
    };

    let app = apply_middleware(build_router(app_state), &middleware_config);

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(middleware_config.replenish_interval_ms())
            .burst_size(middleware_config.rate_limit_burst)
            .finish()
            .ok_or("invalid rate limit configuration")?,
    );
    let app = app.layer(GovernorLayer {
        config: governor_conf,
    });

    let port: u16 = std::env::var(USER_API_PORT)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr = format!("0.0.0.0:{}", port);
    let public_url = format!("http://127.0.0.1:{}", port);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("user-api is ready to accept requests at: {}", public_url);

    let shutdown_started = Arc::new(Notify::new());
    let signalled = Arc::clone(&shutdown_started);

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        signalled.notify_one();
    })
    .into_future();

    if let Some(result) =
        with_drain_deadline(server, shutdown_started, middleware_config.shutdown_timeout).await
    {
        result.map_err(|e| format!("Server error: {}", e))?;
    }

    Ok(())
}
