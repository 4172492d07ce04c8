use crate::{
    api::{
        error::ApiError,
        extract::CurrentUser,
        response::{created, ApiResponse},
    },
    service,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// POST /addresses body
#[derive(Deserialize)]
pub struct SubmitAddressBody {
    pub address: String,
}

// GET /addresses/{address}/transactions query parameters
#[derive(Deserialize)]
pub struct TransactionsQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

// PUT /addresses/{address}/alias body; null clears the alias
#[derive(Deserialize)]
pub struct AliasBody {
    pub alias: Option<String>,
}

// POST /folders body
#[derive(Deserialize)]
pub struct CreateFolderBody {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
    pub address: Option<String>,
}

// PATCH /folders/{id} body
#[derive(Deserialize)]
pub struct UpdateFolderBody {
    pub name: Option<String>,
    pub is_public: Option<bool>,
}

// GET /folders/search query parameters
#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/addresses", post(submit_address).get(list_addresses))
        .route("/addresses/{address}/transactions", get(address_transactions))
        .route("/addresses/{address}/alias", put(set_alias))
        .route("/folders", get(list_folders).post(create_folder))
        .route("/folders/search", get(search_folders))
        .route(
            "/folders/{id}",
            get(show_folder).patch(update_folder).delete(delete_folder),
        )
        .route("/folders/{id}/addresses", post(save_address_to_folder))
        .with_state(app_state)
        .layer(cors)
}

// POST /addresses handler
async fn submit_address(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<SubmitAddressBody>,
) -> Result<Response, ApiError> {
    info!("Processing submit request for address: {}", body.address);

    let submitted = service::submit_address(&state, user_id, &body.address).await?;
    if submitted.created {
        Ok(created(submitted))
    } else {
        Ok(ApiResponse::new(submitted).into_response())
    }
}

async fn list_addresses(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Response, ApiError> {
    let addresses = service::tracked_addresses(&state, user_id).await?;
    Ok(ApiResponse::new(addresses).into_response())
}

async fn address_transactions(
    State(state): State<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Path(address): Path<String>,
    Query(params): Query<TransactionsQuery>,
) -> Result<Response, ApiError> {
    let page = service::address_transactions(&state, &address, params.offset, params.limit).await?;
    Ok(ApiResponse::new(page).into_response())
}

async fn set_alias(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(address): Path<String>,
    Json(body): Json<AliasBody>,
) -> Result<Response, ApiError> {
    let tracked = service::set_alias(&state, user_id, &address, body.alias.as_deref()).await?;
    Ok(ApiResponse::new(tracked).into_response())
}

async fn list_folders(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Response, ApiError> {
    let folders = service::list_folders(&state, user_id).await?;
    Ok(ApiResponse::new(folders).into_response())
}

async fn create_folder(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<CreateFolderBody>,
) -> Result<Response, ApiError> {
    let folder = service::create_folder(
        &state,
        user_id,
        &body.name,
        body.is_public,
        body.address.as_deref(),
    )
    .await?;
    Ok(created(folder))
}

async fn search_folders(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let folders = service::search_folders(&state, user_id, &params.q).await?;
    Ok(ApiResponse::new(folders).into_response())
}

async fn show_folder(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let view = service::folder_details(&state, user_id, id).await?;
    Ok(ApiResponse::new(view).into_response())
}

async fn update_folder(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateFolderBody>,
) -> Result<Response, ApiError> {
    if body.name.is_none() && body.is_public.is_none() {
        return Err(ApiError::BadRequest("nothing to update".to_string()));
    }

    let mut folder = None;
    if let Some(name) = body.name.as_deref() {
        folder = Some(service::rename_folder(&state, user_id, id, name).await?);
    }
    if let Some(is_public) = body.is_public {
        folder = Some(service::set_folder_visibility(&state, user_id, id, is_public).await?);
    }

    Ok(ApiResponse::new(folder).into_response())
}

async fn delete_folder(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    service::delete_folder(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn save_address_to_folder(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<SubmitAddressBody>,
) -> Result<Response, ApiError> {
    let view = service::save_address_to_folder(&state, user_id, id, &body.address).await?;
    Ok(ApiResponse::new(view).into_response())
}
