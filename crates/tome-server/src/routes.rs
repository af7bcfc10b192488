//! HTTP routes for the Tome server.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tome_core::markdown::DEFAULT_WORDS_PER_MINUTE;
use tome_core::{
    Author, CompileRequest, DependencyGraph, Module, ModuleLibrary, ModuleType, ModuleVersion,
    reading_time_minutes, word_count,
};
use tome_render::{Artifact, ChromePaginator, Paginator, compile};

use crate::error::{ServerError, ServerResult};

/// Filename offered for paginated downloads.
pub const PDF_FILENAME: &str = "textbook.pdf";

/// Application state shared across handlers.
pub struct AppState<P = ChromePaginator> {
    /// Module library. Compile calls only hold the read lock while
    /// snapshotting.
    pub library: RwLock<ModuleLibrary>,
    /// Renders paginated output; one engine instance per call.
    pub paginator: P,
}

impl<P: Paginator> AppState<P> {
    pub fn new(library: ModuleLibrary, paginator: P) -> Self {
        Self {
            library: RwLock::new(library),
            paginator,
        }
    }
}

/// Create the router with all routes.
pub fn create_router<P: Paginator + 'static>(state: Arc<AppState<P>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/modules", get(list_handler::<P>))
        .route("/api/modules/{id}", get(module_handler::<P>))
        .route("/api/modules/{id}/content", put(update_handler::<P>))
        .route("/api/modules/{id}/restore", post(restore_handler::<P>))
        .route("/api/dependency-graph/{id}", get(graph_handler::<P>))
        .route("/api/compile", post(compile_handler::<P>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// One row of the module listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleListing {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub author: Author,
    pub latest_version: u32,
    pub word_count: usize,
    pub reading_minutes: usize,
}

impl ModuleListing {
    fn of(module: &Module) -> Self {
        let markdown = module.latest().markdown();
        Self {
            id: module.id().to_string(),
            title: module.title().to_string(),
            module_type: module.module_type(),
            author: module.author().clone(),
            latest_version: module.latest().number(),
            word_count: word_count(markdown),
            reading_minutes: reading_time_minutes(markdown, DEFAULT_WORDS_PER_MINUTE),
        }
    }
}

async fn list_handler<P: Paginator>(State(state): State<Arc<AppState<P>>>) -> Json<Vec<ModuleListing>> {
    let library = state.library.read().await;
    Json(library.modules().map(ModuleListing::of).collect())
}

async fn module_handler<P: Paginator>(
    State(state): State<Arc<AppState<P>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Module>> {
    let library = state.library.read().await;
    Ok(Json(library.get(&id)?.clone()))
}

#[derive(Debug, Deserialize)]
struct ContentUpdate {
    markdown: String,
}

async fn update_handler<P: Paginator>(
    State(state): State<Arc<AppState<P>>>,
    Path(id): Path<String>,
    payload: Result<Json<ContentUpdate>, JsonRejection>,
) -> ServerResult<Json<ModuleVersion>> {
    let Json(update) = payload?;
    let mut library = state.library.write().await;
    let version = library.update_content(&id, update.markdown)?;
    tracing::info!("Module {} updated to version {}", id, version.number());
    Ok(Json(version))
}

#[derive(Debug, Deserialize)]
struct RestoreRequest {
    version: u32,
}

async fn restore_handler<P: Paginator>(
    State(state): State<Arc<AppState<P>>>,
    Path(id): Path<String>,
    payload: Result<Json<RestoreRequest>, JsonRejection>,
) -> ServerResult<Json<ModuleVersion>> {
    let Json(restore) = payload?;
    let mut library = state.library.write().await;
    let version = library.restore_version(&id, restore.version)?;
    tracing::info!(
        "Module {} restored from version {} as version {}",
        id,
        restore.version,
        version.number()
    );
    Ok(Json(version))
}

#[derive(Debug, Serialize)]
struct GraphResponse {
    graph: DependencyGraph,
}

async fn graph_handler<P: Paginator>(
    State(state): State<Arc<AppState<P>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<GraphResponse>> {
    let library = state.library.read().await;
    let graph = library.dependency_graph(&id)?;
    Ok(Json(GraphResponse { graph }))
}

async fn compile_handler<P: Paginator>(
    State(state): State<Arc<AppState<P>>>,
    payload: Result<Json<CompileRequest>, JsonRejection>,
) -> ServerResult<Response> {
    let Json(request) = payload?;
    if request.module_ids.is_empty() {
        return Err(ServerError::BadRequest("moduleIds must not be empty".to_string()));
    }

    let modules = {
        let library = state.library.read().await;
        library.snapshot(&request.module_ids)?
    };
    tracing::info!(
        "Compiling {} of {} requested modules as {}",
        modules.len(),
        request.module_ids.len(),
        request.format
    );

    let artifact = compile(&request, &modules, &state.paginator).await?;
    let content_type = artifact.content_type();
    let response = match artifact {
        Artifact::Html(html) => ([(header::CONTENT_TYPE, content_type)], html).into_response(),
        Artifact::Pdf(bytes) => (
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{PDF_FILENAME}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
    };
    Ok(response)
}
