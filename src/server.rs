use std::{path::Path, sync::Arc};

use anyhow::Context;
use poem::{
    Endpoint, EndpointExt, IntoResponse, Response, Route, Server,
    listener::TcpListener,
    middleware::{Cors, Tracing as PoemTracing},
    web::Json,
};
use poem_openapi::OpenApiService;

use crate::{
    VintageResult,
    api::{VintageApi, services::catalog::CatalogService},
    config::Config,
    domain::models::NewBook,
    storage::CatalogRepo,
};

/// Assemble the API under `/api`, plus the RapiDoc UI and the raw OpenAPI document.
pub fn build_route(api: VintageApi, public_url: &str) -> impl Endpoint + use<> {
    let version = env!("CARGO_PKG_VERSION");
    let api_service = OpenApiService::new(api, "Vintage Reads API", version)
        .server(format!("{}/api", public_url.trim_end_matches('/')));
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    Route::new()
        .nest("/api", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .catch_all_error(|err: poem::Error| async move { error_response(err) })
        .with(Cors::new())
        .with(PoemTracing)
}

/// Framework errors (unparseable body, wrong content type, unknown path) as `{message}` JSON.
fn error_response(err: poem::Error) -> Response {
    let status = err.status();
    tracing::debug!(%status, error = %err, "request rejected");
    (status, Json(serde_json::json!({ "message": err.to_string() }))).into_response()
}

pub async fn run_poem(api: VintageApi, config: Arc<Config>) -> VintageResult<()> {
    let route = build_route(api, &config.public_url);
    let bind_addr = config.bind_addr.clone();
    tracing::info!(%bind_addr, "starting HTTP server");
    Server::new(TcpListener::bind(bind_addr)).run(route).await?;
    Ok(())
}

pub fn load_seed_books(path: &Path) -> VintageResult<Vec<NewBook>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog seed {}", path.display()))?;
    let books: Vec<NewBook> = serde_yml::from_str(&raw)
        .with_context(|| format!("Invalid catalog seed {}", path.display()))?;
    Ok(books)
}

pub async fn seed_catalog(catalog: &dyn CatalogRepo, path: &Path) -> VintageResult<usize> {
    let books = load_seed_books(path)?;
    let added = CatalogService::new(catalog)
        .seed_if_empty(books)
        .await
        .with_context(|| "Failed to seed catalog")?;
    Ok(added)
}
