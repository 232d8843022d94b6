//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::JwtConfig;
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::StatusPolicy;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{health, users};

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
                        .description(Some("JWT Bearer token carrying an `is_admin` claim"))
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
        health::health_check,
        users::get_users,
        users::get_user,
        users::delete_user,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ComponentHealth,
            users::UserDto,
            users::UsersPayload,
            users::UserPayload,
            users::DeleteUserRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Users", description = "User listing, lookup and admin deletion"),
    ),
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "REST API for managing users. Every response is an `{error, msg, ...}` envelope.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    status_policy: StatusPolicy,
) -> Router {
    let middleware_state = AuthState::new(jwt_config);
    let user_state = users::UserHandlerState::new(Arc::clone(&repos), status_policy);
    let health_state = health::HealthState::new(repos);

    // User routes (public)
    let user_routes = Router::new()
        .route("/api/v1/users", get(users::get_users))
        .route("/api/v1/user/{id}", get(users::get_user))
        .with_state(user_state.clone());

    // User routes (protected)
    let user_protected_routes = Router::new()
        .route("/api/v1/user", delete(users::delete_user))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(user_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(user_routes)
        .merge(user_protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}
