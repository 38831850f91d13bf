use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use lifetag_server::{api, config::Config, migrator, notifications, security};
use sea_orm::{Database, DatabaseConnection};

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    lifetag_server::telemetry::init_telemetry("lifetag_server");

    // Probe the hashing backend once, up front, so the selection is logged
    // before the first signup.
    security::init();

    let config = Arc::new(Config::from_env());

    // Database Connection
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    use sea_orm_migration::MigratorTrait;
    migrator::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    tokio::fs::create_dir_all(&config.upload_folder)
        .await
        .expect("Failed to create upload folder");

    // Outbound notification worker
    let notifier = notifications::start_mailer(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = app(Arc::new(db), config, notifier);

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn health_check() -> &'static str {
    "OK"
}

fn app(
    db: Arc<DatabaseConnection>,
    config: Arc<Config>,
    notifier: notifications::Notifier,
) -> Router {
    let cors = cors_layer(&config);
    let body_limit = (config.max_upload_bytes() as usize) + 2 * 1024 * 1024;

    Router::new()
        .route("/health", get(health_check))
        .route("/signup/farmer", post(api::auth::signup_farmer))
        .route("/signup/vet", post(api::auth::signup_vet))
        .route("/signup/shelter", post(api::auth::signup_shelter))
        .route("/login", post(api::auth::login))
        .route("/delete-user", delete(api::auth::delete_user))
        .route("/farmer-info", get(api::inaph::farmer_info))
        .route("/inaph/login", post(api::inaph::inaph_login))
        .route("/inaph/check-password", get(api::inaph::check_password))
        .route("/inaph/create-password", post(api::inaph::create_password))
        .route("/add-new-cattle", post(api::cattle::add_new_cattle))
        .route(
            "/complaints",
            post(api::complaints::create_cattle_complaint)
                .get(api::complaints::list_cattle_complaints),
        )
        .route("/complaints/:id", get(api::complaints::get_cattle_complaint))
        .route(
            "/complaints/:id/status",
            put(api::complaints::update_complaint_status),
        )
        .layer(Extension(db))
        .layer(Extension(config))
        .layer(Extension(notifier))
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());

                    // Dynamic span name: "METHOD /path" (e.g., "POST /login")
                    let span_name = if let Some(path) = matched_path {
                        format!("{} {}", request.method(), path)
                    } else {
                        format!("{} {}", request.method(), request.uri().path())
                    };

                    tracing::info_span!(
                        "request",
                        endpoint = span_name,
                        method = ?request.method(),
                        uri = ?request.uri(),
                    )
                },
            ),
        )
        .layer(cors)
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

fn cors_layer(config: &Config) -> tower_http::cors::CorsLayer {
    let origins: Vec<axum::http::HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    tower_http::cors::CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static("x-owner-id"),
            axum::http::HeaderName::from_static("x-user-id"),
        ])
        .allow_credentials(true)
}
