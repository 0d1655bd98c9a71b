use axum::{
    http::{header, HeaderName, Method, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::MiddlewareConfig;
use crate::methods::create_user::{__path_create_user, create_user};
use crate::methods::entities::{UserRequest, UserResponse};
use crate::methods::get_user_by_id::{__path_get_user_by_id, get_user_by_id};
use crate::methods::health_check::{__path_health_check, health_check};
use crate::methods::hello::{__path_hello, hello};
use crate::methods::routes::{
    OPENAPI_JSON_PATH, SERVICE_DOCS_PATH, SERVICE_HEALTH_PATH, USERS_BY_ID_PATH,
    USERS_HELLO_PATH, USERS_PATH,
};
use crate::middleware::require_moderator;
use crate::state::AppState;

const X_REQUEST_ID: &str = "x-request-id";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(create_user, get_user_by_id, hello, health_check),
    components(schemas(UserRequest, UserResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "User management endpoints (moderator role required)"),
        (name = "health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

/// Routes with state applied. User routes sit behind the bearer-token guard;
/// health and docs stay open.
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(USERS_PATH, post(create_user))
        .route(USERS_HELLO_PATH, get(hello))
        .route(USERS_BY_ID_PATH, get(get_user_by_id))
        .route_layer(from_fn_with_state(state.clone(), require_moderator));

    Router::new()
        .merge(user_routes)
        .route(SERVICE_HEALTH_PATH, get(health_check))
        .merge(SwaggerUi::new(SERVICE_DOCS_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .with_state(state)
}

fn cors_layer(config: &MiddlewareConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(X_REQUEST_ID),
        ]);

    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        base.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        base.allow_origin(origins)
    }
}

// Applied inner to outer:
// Handler ← Trace ← Request ID ← Body Limit ← CORS ← Timeout
// Rate limiting is layered on last in main, since it keys on the peer address.
pub fn apply_middleware(app: Router, config: &MiddlewareConfig) -> Router {
    let x_request_id = HeaderName::from_static(X_REQUEST_ID);

    app.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(tracing::Level::DEBUG))
            .on_response(DefaultOnResponse::new().level(tracing::Level::DEBUG)),
    )
    .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
    .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
    .layer(RequestBodyLimitLayer::new(config.max_body_size))
    .layer(cors_layer(config))
    .layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        config.request_timeout,
    ))
}
