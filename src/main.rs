mod bot;
mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AuthService, TokenService};
use crate::features::cart::{routes as cart_routes, CartService};
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::favorites::{routes as favorites_routes, FavoriteService};
use crate::features::media::{routes as media_routes, MediaService};
use crate::features::orders::{routes as orders_routes, OrderService};
use crate::features::pages::{routes as pages_routes, PageService};
use crate::features::products::{routes as products_routes, ProductService};
use crate::features::promocodes::{routes as promocodes_routes, PromocodeService};
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::storage::LocalStorage;
use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Users and auth
    let user_service = Arc::new(UserService::new(pool.clone()));
    let token_service = Arc::new(TokenService::new(&config.auth));
    let auth_service = Arc::new(AuthService::new(
        config.auth.clone(),
        Arc::clone(&token_service),
        Arc::clone(&user_service),
    ));
    tracing::info!(
        "Auth initialized ({} admin id(s) configured)",
        config.auth.admin_telegram_ids.len()
    );

    // Catalog
    let category_service = Arc::new(CategoryService::new(pool.clone()));
    let product_service = Arc::new(ProductService::new(
        pool.clone(),
        Arc::clone(&category_service),
    ));

    // Shopping
    let cart_service = Arc::new(CartService::new(pool.clone(), Arc::clone(&product_service)));
    let favorite_service = Arc::new(FavoriteService::new(
        pool.clone(),
        Arc::clone(&product_service),
    ));
    let promocode_service = Arc::new(PromocodeService::new(
        pool.clone(),
        Arc::clone(&cart_service),
    ));
    let order_service = Arc::new(OrderService::new(pool.clone(), Arc::clone(&user_service)));
    tracing::info!("Catalog and shopping services initialized");

    // Content
    let page_service = Arc::new(PageService::new(pool.clone()));
    let storage = Arc::new(
        LocalStorage::new(&config.media)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize media storage: {}", e))?,
    );
    let media_service = Arc::new(MediaService::new(pool.clone(), Arc::clone(&storage)));
    tracing::info!("Content services initialized");

    // Telegram bot shares the services above
    if config.bot.enabled {
        let deps = bot::BotDeps::new(
            Arc::clone(&user_service),
            Arc::clone(&product_service),
            Arc::clone(&cart_service),
            Arc::clone(&order_service),
            config.bot.webapp_url.as_deref(),
        );
        let telegram = teloxide::Bot::new(&config.auth.bot_token);
        tokio::spawn(bot::run(telegram, deps));
    } else {
        tracing::info!("Telegram bot disabled (BOT_ENABLED=false)");
    }

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Admin routes; role is enforced per handler by RequireAdmin
    let admin_routes = Router::new()
        .merge(categories_routes::admin_routes(Arc::clone(&category_service)))
        .merge(products_routes::admin_routes(Arc::clone(&product_service)))
        .merge(promocodes_routes::admin_routes(Arc::clone(&promocode_service)))
        .merge(orders_routes::admin_routes(Arc::clone(&order_service)))
        .merge(users_routes::admin_routes(Arc::clone(&user_service)))
        .merge(pages_routes::admin_routes(Arc::clone(&page_service)))
        .merge(media_routes::admin_routes(media_service));

    // Protected routes (require a session token)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&auth_service)))
        .merge(cart_routes::routes(Arc::clone(&cart_service)))
        .merge(favorites_routes::routes(favorite_service))
        .merge(promocodes_routes::routes(promocode_service))
        .merge(orders_routes::routes(Arc::clone(&order_service)))
        .nest("/api/admin", admin_routes)
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_service))
        .merge(categories_routes::routes(category_service))
        .merge(products_routes::routes(product_service))
        .merge(pages_routes::routes(page_service))
        .nest_service(&config.media.url_prefix, ServeDir::new(storage.root()));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
