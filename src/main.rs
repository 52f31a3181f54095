//!
//! Park & Ride reservation service.
//! Reads configuration from TOML file (~/.config/parkride/config.toml).

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use parkride::config::AppConfig;
use parkride::domain::parking::{ParkingLocation, Slot};
use parkride::domain::{GeoPoint, RepositoryProvider};
use parkride::infrastructure::crypto::jwt::JwtConfig;
use parkride::infrastructure::database::migrator::Migrator;
use parkride::shared::shutdown::ShutdownCoordinator;
use parkride::{
    create_api_router, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PARKRIDE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Park & Ride service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "parkride".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Initialize repository provider
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    // Seed sample parking locations if the database is empty
    if app_cfg.seed.enabled {
        seed_parking_locations(repos.as_ref()).await;
    }

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // Create REST API router
    let started_at = Arc::new(Instant::now());
    let api_router = create_api_router(
        repos,
        db.clone(),
        jwt_config,
        prometheus_handle,
        started_at,
    );

    // Start REST API server with graceful shutdown
    let api_addr = app_cfg.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    axum::serve(listener, api_router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    // Perform final cleanup
    info!("Performing final cleanup...");

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Park & Ride service shutdown complete");
    Ok(())
}

/// Seed the three sample parking facilities when no locations exist yet.
async fn seed_parking_locations(repos: &dyn RepositoryProvider) {
    let locations = repos.parking_locations();

    let count = match locations.count().await {
        Ok(count) => count,
        Err(e) => {
            error!("Failed to count parking locations: {}", e);
            return;
        }
    };
    if count > 0 {
        return;
    }

    info!("Seeding sample parking locations...");
    for location in sample_locations() {
        let name = location.name.clone();
        match locations.insert(location).await {
            Ok(()) => info!("Seeded parking location: {}", name),
            Err(e) => error!("Failed to seed {}: {}", name, e),
        }
    }
}

fn sample_locations() -> Vec<ParkingLocation> {
    let specs: [(&str, &str, f64, f64, i32, f64, f64, i32, &[&str], &str); 3] = [
        (
            "Central Metro Station Parking",
            "123 Metro Street, Downtown",
            77.2090,
            28.6139,
            50,
            30.0,
            4.5,
            120,
            &["24/7", "Security", "CCTV", "Well-lit"],
            "CMS",
        ),
        (
            "North Terminal Parking",
            "456 Terminal Road, North District",
            77.2295,
            28.7041,
            30,
            25.0,
            4.2,
            85,
            &["Covered", "Security", "CCTV"],
            "NTP",
        ),
        (
            "South Plaza Parking",
            "789 Plaza Avenue, South District",
            77.1885,
            28.5275,
            40,
            35.0,
            4.7,
            150,
            &["24/7", "Security", "CCTV", "Valet Service"],
            "SPP",
        ),
    ];

    specs
        .into_iter()
        .map(
            |(name, address, longitude, latitude, total, price, rating, reviews, features, prefix)| {
                let now = Utc::now();
                ParkingLocation {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    address: address.to_string(),
                    location: GeoPoint::new(longitude, latitude),
                    total_slots: total,
                    available_slots: total,
                    price_per_hour: price,
                    rating,
                    reviews,
                    features: features.iter().map(|f| f.to_string()).collect(),
                    slots: (1..=total)
                        .map(|i| Slot {
                            id: format!("{}-{}", prefix, i),
                            number: i.to_string(),
                            slot_type: "standard".to_string(),
                            available: true,
                            bookings: vec![],
                        })
                        .collect(),
                    created_at: now,
                    updated_at: now,
                }
            },
        )
        .collect()
}
