//! Authorization gate
//!
//! Request-scoped middleware that fronts every `/api` route. A request is
//! either let through unauthenticated (public route), rejected with 401/403,
//! or passed on with the resolved principal attached to the request
//! extensions.
//!
//! Route access is decided by an ordered rule table evaluated top to bottom;
//! the first matching pattern wins and the table ends in a catch-all that
//! requires authentication. Registration order is part of the contract:
//! reordering rules can silently expose protected routes.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use super::directory::PrincipalDirectory;
use super::token::{verify_token, TokenConfig};
use crate::infrastructure::database::entities::user::UserRole;
use crate::interfaces::http::common::ApiResponse;

/// Access requirement attached to a route pattern
#[derive(Clone, Debug)]
pub enum RouteAccess {
    /// No token required; requests pass with no principal attached
    Public,
    /// Valid token whose principal holds one of these roles
    Roles(Vec<UserRole>),
    /// Any valid token
    Authenticated,
}

/// One entry of the ordered authorization table
#[derive(Clone, Debug)]
pub struct RouteRule {
    pattern: String,
    access: RouteAccess,
}

impl RouteRule {
    pub fn new(pattern: impl Into<String>, access: RouteAccess) -> Self {
        Self {
            pattern: pattern.into(),
            access,
        }
    }

    /// Match a request path against the pattern. A trailing `/**` matches
    /// the prefix itself and everything below it; any other pattern must
    /// match exactly.
    pub fn matches(&self, path: &str) -> bool {
        match self.pattern.strip_suffix("/**") {
            Some(prefix) => {
                path == prefix || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
            }
            None => path == self.pattern,
        }
    }

    pub fn access(&self) -> &RouteAccess {
        &self.access
    }
}

/// The production rule table, ordered. Specific admin-only paths come before
/// the broad public patterns that would otherwise swallow them.
pub fn default_route_rules() -> Vec<RouteRule> {
    vec![
        // Admin-gated surface
        RouteRule::new("/api/admin/**", RouteAccess::Roles(vec![UserRole::Admin])),
        RouteRule::new("/api/technicians/**", RouteAccess::Roles(vec![UserRole::Admin])),
        RouteRule::new("/api/users/banned", RouteAccess::Roles(vec![UserRole::Admin])),
        RouteRule::new("/api/users/role", RouteAccess::Roles(vec![UserRole::Admin])),
        // Standard-user surface
        RouteRule::new("/api/user/**", RouteAccess::Roles(vec![UserRole::User])),
        // Public surface
        RouteRule::new("/api/auth/**", RouteAccess::Public),
        RouteRule::new("/api/users/register", RouteAccess::Public),
        RouteRule::new("/api/stations/**", RouteAccess::Public),
        RouteRule::new("/api/options/**", RouteAccess::Public),
        RouteRule::new("/api/locations/**", RouteAccess::Public),
        RouteRule::new("/api/reservations/**", RouteAccess::Public),
        RouteRule::new("/api/vehicles/**", RouteAccess::Public),
        RouteRule::new("/api/media/**", RouteAccess::Public),
        RouteRule::new("/api/users/**", RouteAccess::Public),
        RouteRule::new("/api/addresses/**", RouteAccess::Public),
        // Catch-all: anything else requires a valid token
        RouteRule::new("/**", RouteAccess::Authenticated),
    ]
}

/// State carried by the gate middleware
#[derive(Clone)]
pub struct GateState {
    pub directory: PrincipalDirectory,
    pub access_config: TokenConfig,
    pub rules: Arc<Vec<RouteRule>>,
}

impl GateState {
    pub fn new(
        directory: PrincipalDirectory,
        access_config: TokenConfig,
        rules: Vec<RouteRule>,
    ) -> Self {
        Self {
            directory,
            access_config,
            rules: Arc::new(rules),
        }
    }
}

/// Principal attached to the request extensions after verification
#[derive(Clone, Debug)]
pub struct AuthenticatedPrincipal {
    pub email: String,
    pub role: UserRole,
}

/// Why a request was turned away
#[derive(Debug)]
enum GateRejection {
    MissingToken,
    InvalidToken,
    UnknownPrincipal,
    Forbidden,
}

fn rejection_response(rejection: GateRejection) -> Response {
    let (status, message) = match rejection {
        GateRejection::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        GateRejection::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        GateRejection::UnknownPrincipal => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        GateRejection::Forbidden => (StatusCode::FORBIDDEN, "Insufficient permissions"),
    };

    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Authorization middleware applied to the whole `/api` surface.
pub async fn authorization_gate(
    State(state): State<GateState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let rule = state.rules.iter().find(|r| r.matches(&path));

    // Public routes skip authentication entirely; no principal is attached.
    if matches!(rule.map(RouteRule::access), Some(RouteAccess::Public)) {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return rejection_response(GateRejection::MissingToken);
    };

    let Some(token) = extract_bearer(&auth_header) else {
        return rejection_response(GateRejection::InvalidToken);
    };

    let claims = match verify_token(token, &state.access_config) {
        Ok(claims) => claims,
        Err(_) => return rejection_response(GateRejection::InvalidToken),
    };

    // Re-resolve the principal on every request. No caching: staleness is
    // bounded by one lookup, which the short access-token lifetime assumes.
    let principal = match state.directory.find_by_email(&claims.sub).await {
        Ok(Some(principal)) => principal,
        Ok(None) => return rejection_response(GateRejection::UnknownPrincipal),
        Err(_) => return rejection_response(GateRejection::UnknownPrincipal),
    };

    let authenticated = AuthenticatedPrincipal {
        email: principal.email().to_string(),
        role: principal.role(),
    };

    let allowed = match rule.map(RouteRule::access) {
        Some(RouteAccess::Roles(roles)) => roles.contains(&authenticated.role),
        // Public was handled before token extraction
        Some(RouteAccess::Authenticated) | Some(RouteAccess::Public) => true,
        // The default table ends in a catch-all, so an unmatched path means
        // a misconfigured table; deny rather than expose it.
        None => false,
    };

    if !allowed {
        return rejection_response(GateRejection::Forbidden);
    }

    request.extensions_mut().insert(authenticated);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::issue_token;
    use crate::infrastructure::database::entities::{technician, user};
    use crate::infrastructure::database::migrator::Migrator;
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use sea_orm_migration::MigratorTrait;
    use tower::Service;

    const ACCESS_SECRET: &str = "gate-test-secret";

    #[test]
    fn pattern_matching() {
        let rule = RouteRule::new("/api/auth/**", RouteAccess::Public);
        assert!(rule.matches("/api/auth"));
        assert!(rule.matches("/api/auth/login"));
        assert!(rule.matches("/api/auth/refresh/deep"));
        assert!(!rule.matches("/api/authx"));
        assert!(!rule.matches("/api/users"));

        let exact = RouteRule::new("/api/users/role", RouteAccess::Authenticated);
        assert!(exact.matches("/api/users/role"));
        assert!(!exact.matches("/api/users/role/extra"));

        let catch_all = RouteRule::new("/**", RouteAccess::Authenticated);
        assert!(catch_all.matches("/anything/at/all"));
    }

    #[test]
    fn first_match_wins_over_later_rules() {
        let rules = default_route_rules();

        // /api/users/role and /api/users/banned sit before the broad public
        // /api/users/** rule; both must resolve to the admin-gated entries.
        let matched = rules.iter().find(|r| r.matches("/api/users/role")).unwrap();
        assert!(matches!(matched.access(), RouteAccess::Roles(_)));

        let matched = rules.iter().find(|r| r.matches("/api/users/banned")).unwrap();
        assert!(matches!(matched.access(), RouteAccess::Roles(_)));

        let matched = rules.iter().find(|r| r.matches("/api/users/42")).unwrap();
        assert!(matches!(matched.access(), RouteAccess::Public));

        let matched = rules.iter().find(|r| r.matches("/api/billing")).unwrap();
        assert!(matches!(matched.access(), RouteAccess::Authenticated));
    }

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn insert_user(db: &DatabaseConnection, email: &str, role: user::UserRole) {
        let now = Utc::now();
        user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            username: Set(email.split('@').next().unwrap().to_string()),
            email: Set(email.to_string()),
            password_hash: Set("$2b$12$placeholderplaceholderplace".to_string()),
            role: Set(role),
            banned: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .unwrap();
    }

    async fn insert_technician(db: &DatabaseConnection, email: &str) {
        technician::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set("Tech".to_string()),
            email: Set(email.to_string()),
            password_hash: Set("$2b$12$placeholderplaceholderplace".to_string()),
            role: Set(user::UserRole::Technician),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .unwrap();
    }

    async fn whoami(principal: Option<Extension<AuthenticatedPrincipal>>) -> String {
        match principal {
            Some(Extension(p)) => p.email,
            None => "anonymous".to_string(),
        }
    }

    fn app(db: DatabaseConnection) -> Router {
        let state = GateState::new(
            PrincipalDirectory::new(db),
            TokenConfig::new(ACCESS_SECRET, 60),
            default_route_rules(),
        );

        Router::new()
            .route("/api/stations", get(whoami))
            .route("/api/admin/stats", get(whoami))
            .route("/api/user/profile", get(whoami))
            .route("/api/users/role", get(whoami))
            .route("/api/billing", get(whoami))
            .layer(middleware::from_fn_with_state(state, authorization_gate))
    }

    async fn send(
        app: &Router,
        path: &str,
        bearer: Option<&str>,
    ) -> axum::http::Response<Body> {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = builder.body(Body::empty()).unwrap();

        let mut svc = app.clone().into_service::<Body>();
        svc.call(req).await.unwrap()
    }

    fn token_for(email: &str) -> String {
        issue_token(email, &TokenConfig::new(ACCESS_SECRET, 60)).unwrap()
    }

    #[tokio::test]
    async fn public_route_passes_without_token() {
        let db = setup_db().await;
        let app = app(db);

        let resp = send(&app, "/api/stations", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_401() {
        let db = setup_db().await;
        let app = app(db);

        let resp = send(&app, "/api/admin/stats", None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_401() {
        let db = setup_db().await;
        let app = app(db);

        let resp = send(&app, "/api/admin/stats", Some("garbage")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_for_unknown_principal_is_401() {
        let db = setup_db().await;
        let app = app(db);

        let token = token_for("ghost@example.com");
        let resp = send(&app, "/api/admin/stats", Some(&token)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_route_requires_admin_role() {
        let db = setup_db().await;
        insert_user(&db, "alice@example.com", user::UserRole::Admin).await;
        insert_user(&db, "bob@example.com", user::UserRole::User).await;
        let app = app(db);

        let admin = token_for("alice@example.com");
        let resp = send(&app, "/api/admin/stats", Some(&admin)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let user = token_for("bob@example.com");
        let resp = send(&app, "/api/admin/stats", Some(&user)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn role_management_route_is_admin_gated_not_public() {
        let db = setup_db().await;
        insert_user(&db, "alice@example.com", user::UserRole::Admin).await;
        insert_user(&db, "bob@example.com", user::UserRole::User).await;
        let app = app(db);

        // Despite the public /api/users/** entry, the exact /api/users/role
        // rule is registered earlier and wins.
        let resp = send(&app, "/api/users/role", None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let user = token_for("bob@example.com");
        let resp = send(&app, "/api/users/role", Some(&user)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let admin = token_for("alice@example.com");
        let resp = send(&app, "/api/users/role", Some(&admin)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rejection_body_is_the_standard_envelope() {
        let db = setup_db().await;
        let app = app(db);

        let resp = send(&app, "/api/admin/stats", None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert_eq!(body["error"], "Missing authentication token");
    }

    #[tokio::test]
    async fn technician_is_forbidden_on_user_routes_but_authenticated_elsewhere() {
        let db = setup_db().await;
        insert_technician(&db, "tech@example.com").await;
        let app = app(db);

        let token = token_for("tech@example.com");
        let resp = send(&app, "/api/user/profile", Some(&token)).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // Catch-all only requires authentication
        let resp = send(&app, "/api/billing", Some(&token)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn principal_is_attached_to_the_request() {
        let db = setup_db().await;
        insert_user(&db, "alice@example.com", user::UserRole::Admin).await;
        let app = app(db);

        let token = token_for("alice@example.com");
        let resp = send(&app, "/api/admin/stats", Some(&token)).await;
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"alice@example.com");
    }
}
