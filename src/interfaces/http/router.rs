//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{ParkingService, RideService};
use crate::domain::parking::{BookingStatus, VehicleType};
use crate::domain::ride::{RideStatus, RideVehicleType};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{auth, health, metrics, parking, rides};

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
                        .description(Some("JWT Bearer token"))
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
        auth::signup,
        auth::login,
        auth::get_current_user,
        auth::update_profile,
        auth::change_password,
        auth::update_avatar,
        // Parking
        parking::search_locations,
        parking::get_location,
        parking::book_slot,
        parking::cancel_booking,
        parking::booking_history,
        parking::active_bookings,
        // Rides
        rides::search_rides,
        rides::create_ride,
        rides::ride_history,
        rides::active_rides,
        rides::get_ride,
        rides::update_ride_status,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<rides::RideDto>,
            PaginationParams,
            // Auth
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            auth::UserInfo,
            auth::UpdateProfileRequest,
            auth::ChangePasswordRequest,
            auth::AvatarRequest,
            // Domain enums
            BookingStatus,
            VehicleType,
            RideStatus,
            RideVehicleType,
            // Parking
            parking::ParkingLocationDto,
            parking::LocationDetailDto,
            parking::SlotDto,
            parking::BookingDto,
            parking::BookSlotRequest,
            parking::BookingRecordDto,
            // Rides
            rides::RideDto,
            rides::RideStopDto,
            rides::CreateRideRequest,
            rides::UpdateRideStatusRequest,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User signup, login (JWT), profile management"),
        (name = "Parking", description = "Parking location search, slot availability and bookings"),
        (name = "Rides", description = "Ride quoting, booking and lifecycle"),
    ),
    info(
        title = "Park & Ride API",
        version = "1.0.0",
        description = "REST API for parking slot reservations and ride bookings",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    metrics_handle: PrometheusHandle,
    started_at: Arc<Instant>,
) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    let parking_service = Arc::new(ParkingService::new(repos.parking_locations()));
    let ride_service = Arc::new(RideService::new(repos.rides(), repos.users()));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── Auth ───────────────────────────────────────────────────
    let auth_state = auth::AuthHandlerState {
        users: repos.users(),
        jwt_config,
    };

    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .with_state(auth_state.clone());

    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .route("/profile", patch(auth::update_profile))
        .route("/change-password", post(auth::change_password))
        .route("/avatar", post(auth::update_avatar))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // ── Parking ────────────────────────────────────────────────
    let parking_state = parking::ParkingHandlerState {
        service: parking_service,
    };

    let parking_routes = Router::new()
        .route("/search", get(parking::search_locations))
        .route("/{id}", get(parking::get_location))
        .with_state(parking_state.clone());

    let parking_protected_routes = Router::new()
        .route("/bookings/history", get(parking::booking_history))
        .route("/bookings/active", get(parking::active_bookings))
        .route(
            "/{parking_id}/slots/{slot_id}/book",
            post(parking::book_slot),
        )
        .route(
            "/{parking_id}/slots/{slot_id}/bookings/{booking_id}/cancel",
            post(parking::cancel_booking),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(parking_state);

    // ── Rides ──────────────────────────────────────────────────
    let ride_state = rides::RideHandlerState {
        service: ride_service,
    };

    let ride_routes = Router::new()
        .route("/search", get(rides::search_rides))
        .with_state(ride_state.clone());

    let ride_protected_routes = Router::new()
        .route("/", post(rides::create_ride))
        .route("/history", get(rides::ride_history))
        .route("/active", get(rides::active_rides))
        .route("/{id}", get(rides::get_ride))
        .route("/{ride_id}/status", patch(rides::update_ride_status))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(ride_state);

    // ── Health / metrics ───────────────────────────────────────
    let health_state = health::HealthState { db, started_at };
    let metrics_state = metrics::MetricsState {
        handle: metrics_handle,
    };

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check).with_state(health_state))
        // Metrics
        .route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(metrics_state),
        )
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Parking
        .nest("/api/v1/parking", parking_routes)
        .nest("/api/v1/parking", parking_protected_routes)
        // Rides
        .nest("/api/v1/rides", ride_routes)
        .nest("/api/v1/rides", ride_protected_routes)
        // Middleware
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
