//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::directory::PrincipalDirectory;
use crate::auth::gate::{authorization_gate, default_route_rules, GateState};
use crate::auth::gateway::AuthGateway;
use crate::auth::refresh::RefreshTokenStore;
use crate::auth::token::TokenConfig;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::{auth, health};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer access token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::refresh,
        auth::logout,
    ),
    components(
        schemas(
            ApiResponse<String>,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RefreshRequest,
            auth::RefreshResponse,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Login (JWT), access-token refresh, refresh-token revocation"),
    ),
    info(
        title = "Electricity Business API",
        version = "1.0.0",
        description = "REST API for an EV-charging-station business",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// Every `/api` route sits behind the authorization gate; whether a request
/// needs a token is decided by the ordered rule table, not by which router a
/// handler happens to be mounted on.
pub fn create_api_router(
    db: DatabaseConnection,
    access_config: TokenConfig,
    refresh_config: TokenConfig,
) -> Router {
    let directory = PrincipalDirectory::new(db.clone());
    let refresh_store = RefreshTokenStore::new(db.clone(), refresh_config);
    let gateway = AuthGateway::new(directory.clone(), refresh_store, access_config.clone());

    let auth_state = auth::AuthHandlerState {
        gateway,
        access_ttl_secs: access_config.ttl_secs,
    };

    let gate_state = GateState::new(directory, access_config, default_route_rules());

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .with_state(auth_state)
        .layer(middleware::from_fn_with_state(gate_state, authorization_gate));

    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
