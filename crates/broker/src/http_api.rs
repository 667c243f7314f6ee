use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use termzilla_index::docstore::DocDisplay;

use crate::search::{SearchRequest, SearchResponse, SearchService};

#[derive(Clone)]
pub struct AppState {
    pub svc: Arc<SearchService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", post(search))
        .route("/doc/:id", get(doc))
        .with_state(state)
}

pub async fn search(
    State(st): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    st.svc.search(&req).map(Json).map_err(internal)
}

/// Витрина документа по id. Отсутствие id, который вернул поиск, означало бы
/// рассинхрон витрин с индексом на сборке; обычный же неизвестный id — 404.
pub async fn doc(
    State(st): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocDisplay>, (StatusCode, String)> {
    match st.svc.doc(&id) {
        Some(d) => Ok(Json(d.clone())),
        None => Err((StatusCode::NOT_FOUND, format!("doc {id} not found"))),
    }
}

fn internal<E: ToString>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
