use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, Method};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use sitenav_api::{auth::JwtManager, router, state::AppState};
use sitenav_core::domain::UrlKwargs;
use sitenav_core::repositories::{BreadcrumbStore, MenuRepository, RecordStore};
use sitenav_core::routing::{LazyUrl, UrlResolver};
use sitenav_core::services::{BreadcrumbService, MenuAdminService, MenuService, RootUrl};
use sitenav_infrastructure::{
    create_pool, load_fixture, run_migrations, InMemoryBreadcrumbStore, InMemoryMenuRepository,
    InMemoryRecordStore, MenuFixture, PatternRouter, PgBreadcrumbStore, PgMenuRepository, PgRecordStore,
};
use sitenav_shared::config::{AppConfig, StorageBackend};
use sitenav_shared::telemetry::init_telemetry;

struct Stores {
    menus: Arc<dyn MenuRepository>,
    records: Arc<dyn RecordStore>,
    breadcrumbs: Arc<dyn BreadcrumbStore>,
}

async fn memory_stores(fixture: &MenuFixture) -> anyhow::Result<Stores> {
    let menus = Arc::new(InMemoryMenuRepository::new());
    let records = Arc::new(InMemoryRecordStore::new());

    fixture.seed_records(&records)?;
    fixture.seed_menus(&MenuAdminService::new(menus.clone())).await?;

    Ok(Stores {
        menus,
        records,
        breadcrumbs: Arc::new(InMemoryBreadcrumbStore::new()),
    })
}

async fn postgres_stores(config: &AppConfig, fixture: &MenuFixture) -> anyhow::Result<Stores> {
    info!("Connecting to database...");
    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    run_migrations(&pool).await?;
    info!("Database connection established.");

    let menus = Arc::new(PgMenuRepository::new(pool.clone()));
    let records = Arc::new(PgRecordStore::new(pool.clone()));

    for content in &fixture.content_types {
        records.register(&content.schema, content.table_name()).await?;
    }
    records.refresh().await?;

    // Seed an empty database once
    if menus.find_group_by_name(&config.navigation.page_menu).await?.is_none() {
        fixture.seed_menus(&MenuAdminService::new(menus.clone())).await?;
    }

    Ok(Stores {
        menus,
        records,
        breadcrumbs: Arc::new(PgBreadcrumbStore::new(pool)),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize telemetry
    let _log_guard = init_telemetry(&config.log)?;

    info!("Sitenav server starting ({})...", config.app.env);
    if config.uses_default_jwt_secret() {
        warn!("jwt.secret is the built-in default; set APP__JWT__SECRET before exposing this server");
    }

    // 1. Routes and breadcrumb policies
    let fixture = match &config.navigation.fixture_path {
        Some(path) => load_fixture(path)?,
        None => MenuFixture::default(),
    };
    let routes = Arc::new(PatternRouter::new());
    fixture.register_routes(&routes)?;
    if routes.is_empty() {
        warn!("No routes registered; named and model options will not render");
    }
    let route_count = routes.len();
    let urls: Arc<dyn UrlResolver> = routes;

    // 2. Storage
    let stores = match config.navigation.backend {
        StorageBackend::Memory => memory_stores(&fixture).await?,
        StorageBackend::Postgres => postgres_stores(&config, &fixture).await?,
    };
    fixture.check_content_types(stores.records.as_ref()).await?;

    // 3. Services
    let menus = MenuService::new(stores.menus, stores.records, urls.clone(), config.navigation.site_id);

    let root_url = match &config.breadcrumbs.root_route {
        Some(name) => RootUrl::Route(LazyUrl::new(name.clone(), UrlKwargs::new(), urls.clone())),
        None => RootUrl::Literal(config.breadcrumbs.root_url.clone().unwrap_or_else(|| "/".to_string())),
    };
    let breadcrumbs = BreadcrumbService::new(
        stores.breadcrumbs,
        fixture.breadcrumb_registry(),
        root_url,
        config.breadcrumbs.root_title.clone(),
    );

    // Create App State
    let state = AppState {
        menus: Arc::new(menus),
        breadcrumbs: Arc::new(breadcrumbs),
        urls,
        route_count,
        jwt: Arc::new(JwtManager::new(&config.jwt.secret, config.jwt.expiration_seconds)),
        config: config.clone(),
    };

    // Build router
    let app = router(state).layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    );

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
