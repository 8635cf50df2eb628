//! Portfolio CMS backend - library for app logic and testing

pub mod db;
pub mod error;
pub mod logging;
pub mod routes;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    services::ServeDir, trace::TraceLayer,
};

/// Requests above this size are rejected before any handler runs.
/// Leaves headroom over the 5 MB upload cap for multipart framing.
const MAX_REQUEST_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN.
/// Falls back to the local dev frontend.
pub fn configure_cors() -> CorsLayer {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let origins: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                None
            } else {
                Some(origins)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            vec![
                "http://localhost:3000".parse().unwrap(),
                "http://127.0.0.1:3000".parse().unwrap(),
            ]
        });

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Everything behind the bearer guard: admin CRUD, the settings and inbox
/// surfaces, profile, and uploads.
fn admin_routes() -> Router {
    Router::new()
        .route("/api/profile", get(routes::auth::profile))
        .route("/api/upload", post(routes::upload::upload_image))
        .route("/api/admin/projects", post(routes::projects::create_project))
        .route(
            "/api/admin/projects/{id}",
            patch(routes::projects::update_project).delete(routes::projects::delete_project),
        )
        .route("/api/admin/skills", post(routes::skills::create_skill))
        .route(
            "/api/admin/skills/{id}",
            patch(routes::skills::update_skill).delete(routes::skills::delete_skill),
        )
        .route(
            "/api/admin/activities",
            post(routes::activities::create_activity),
        )
        .route(
            "/api/admin/activities/{id}",
            patch(routes::activities::update_activity).delete(routes::activities::delete_activity),
        )
        .route(
            "/api/admin/pricing",
            post(routes::pricing::create_pricing_plan),
        )
        .route(
            "/api/admin/pricing/{id}",
            patch(routes::pricing::update_pricing_plan)
                .delete(routes::pricing::delete_pricing_plan),
        )
        .route(
            "/api/admin/social-links",
            post(routes::social_links::upsert_social_link),
        )
        .route(
            "/api/admin/social-links/{id}",
            patch(routes::social_links::update_social_link)
                .delete(routes::social_links::delete_social_link),
        )
        .route(
            "/api/admin/articles",
            post(routes::articles::create_article),
        )
        .route(
            "/api/admin/articles/{id}",
            patch(routes::articles::update_article).delete(routes::articles::delete_article),
        )
        .route(
            "/api/admin/education",
            post(routes::education::create_education),
        )
        .route(
            "/api/admin/education/{id}",
            patch(routes::education::update_education).delete(routes::education::delete_education),
        )
        .route("/api/admin/messages", get(routes::messages::list_messages))
        .route(
            "/api/admin/messages/{id}/read",
            patch(routes::messages::mark_message_read),
        )
        .route(
            "/api/admin/messages/{id}",
            axum::routing::delete(routes::messages::delete_message),
        )
        .route(
            "/api/admin/settings",
            patch(routes::settings::update_settings),
        )
        .layer(middleware::from_fn(routes::auth::require_admin))
}

/// Create and configure the application router.
pub fn create_app() -> Router {
    let cors = configure_cors();
    tracing::info!("CORS configured");

    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/projects", get(routes::projects::list_projects))
        .route("/api/projects/{id}", get(routes::projects::get_project))
        .route("/api/skills", get(routes::skills::list_skills))
        .route("/api/activities", get(routes::activities::list_activities))
        .route("/api/pricing", get(routes::pricing::list_pricing_plans))
        .route("/api/settings", get(routes::settings::get_settings))
        // Alias kept for older frontend builds.
        .route("/api/site-settings", get(routes::settings::get_settings))
        .route(
            "/api/social-links",
            get(routes::social_links::list_social_links),
        )
        .route("/api/articles", get(routes::articles::list_articles))
        .route("/api/articles/{id}", get(routes::articles::get_article))
        .route("/api/education", get(routes::education::list_education))
        .route(
            "/api/contact",
            post(routes::messages::submit_contact_message),
        )
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/logout", post(routes::auth::logout))
        .route("/rss.xml", get(routes::rss::rss_feed))
        .merge(admin_routes())
        .nest_service("/uploads", ServeDir::new("uploads"))
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip/br/zstd automatically
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        // Raise axum's own extractor cap to the same ceiling so multipart
        // uploads are not cut off at the 2 MB default.
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(cors)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init();

    routes::health::init_start_time();

    // Refuse to start in production with the insecure default JWT secret.
    let environment = std::env::var("ENVIRONMENT").unwrap_or_default();
    if environment == "production" {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        if secret.is_empty() || secret == "default-jwt-secret-change-in-production" {
            panic!(
                "FATAL: JWT_SECRET must be set to a secure, unique value in production. \
                 Refusing to start with the default secret."
            );
        }

        // Warn (don't panic) about default admin credentials in production.
        let admin_password_set = std::env::var("ADMIN_PASSWORD_HASH").is_ok()
            || std::env::var("ADMIN_PASSWORD").is_ok();

        if !admin_password_set {
            tracing::warn!(
                "SECURITY: Neither ADMIN_PASSWORD_HASH nor ADMIN_PASSWORD is set. \
                 The fallback default password 'password' is insecure. \
                 Set ADMIN_PASSWORD_HASH to a bcrypt hash of a strong password."
            );
        }
    }

    if std::env::var("DATABASE_URL").is_ok() {
        match db::init_pool(None).await {
            Ok(pool) => {
                if let Err(e) = db::run_migrations(&pool).await {
                    tracing::error!("Failed to run database migrations: {}", e);
                }
                if let Err(e) = routes::auth::seed_admin_user(&pool).await {
                    tracing::error!("Failed to seed admin account: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize database pool: {}. Continuing without database.",
                    e
                );
            }
        }
    } else {
        tracing::info!("DATABASE_URL not set. Running without database connection.");
    }

    let app = create_app();

    // Bind address is configurable via HOST / PORT env vars, defaulting to
    // 127.0.0.1:3001 so existing dev setups keep working unchanged.
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3001);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Invalid HOST/PORT configuration");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Server error");
}
