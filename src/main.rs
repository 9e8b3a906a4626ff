use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Extension, Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cafeteria_api::{config::Config, db, middleware::auth::JwtSecret, routes, services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    services::metrics::start(pool.clone());

    let state = AppState {
        db: pool,
        config: config.clone(),
    };

    // CORS: localhost is always allowed for local development; a deployed
    // frontend origin comes from configuration.
    let frontend_origin = config.frontend_origin.clone();
    let cors_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
            return true;
        }
        frontend_origin.as_deref() == Some(o)
    });

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(cors_origin);

    let jwt_secret = JwtSecret(config.jwt_secret.clone());

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        // Menu
        .route("/menu/weekly", get(routes::menu::weekly_menu))
        // Auth
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::me))
        .route("/user/me", put(routes::auth::update_me))
        // Payment/subscription ledger
        .route("/pay-meal", post(routes::meals::pay_meal))
        .route("/buy-subscription", post(routes::meals::buy_subscription))
        .route("/paid-students", get(routes::meals::paid_students))
        // Reviews
        .route("/reviews", post(routes::reviews::create_review))
        .route("/user/reviews", get(routes::reviews::my_reviews))
        // Kitchen staff
        .route("/cook/dashboard", get(routes::cook::dashboard))
        .route("/cook/issue-meal", post(routes::cook::issue_meal))
        .route(
            "/cook/issue-meal-for-user",
            post(routes::cook::issue_meal_for_user),
        )
        .route(
            "/cook/purchase-requests",
            post(routes::cook::create_purchase_request),
        )
        // Admin
        .route("/admin/stats", get(routes::admin::stats))
        .route("/admin/reports/daily", get(routes::admin::daily_report))
        .route(
            "/admin/purchase-requests",
            get(routes::admin::list_purchase_requests),
        )
        .route(
            "/admin/approve-request/{id}",
            post(routes::admin::approve_request),
        )
        .route("/admin/menu", put(routes::admin::upsert_menu_item))
        .route("/admin/menu/{id}", delete(routes::admin::delete_menu_item))
        .layer(Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("cafeteria API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
