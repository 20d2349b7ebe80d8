//! `/clients`: client records with an optional profile image (admin only)

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::live::LiveAction;
use shared::models::{Client, ClientCreate, ClientStatus, ClientUpdate};
use shared::query::{ListQuery, PaginatedResponse};
use shared::ApiResponse;

use crate::api::form::MultipartForm;
use crate::api::{ApiResult, Created, announce, validate};
use crate::auth::CurrentAdmin;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::upload::UploadCategory;
use crate::util::normalize_email;

const RESOURCE: &str = "client";

#[derive(Debug, Default, Deserialize)]
pub struct ClientFilter {
    pub status: Option<ClientStatus>,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::ClientNotFound)
}

fn create_payload(form: &MultipartForm) -> Result<ClientCreate, AppError> {
    Ok(ClientCreate {
        first_name: form.required("first_name")?,
        last_name: form.required("last_name")?,
        email: form.required("email")?,
        phone: form.text("phone"),
        company: form.text("company"),
        address: form.text("address"),
        national_id: form.text("national_id"),
        status: form.parse("status")?,
        notes: form.text("notes"),
    })
}

fn update_payload(form: &MultipartForm) -> Result<ClientUpdate, AppError> {
    Ok(ClientUpdate {
        first_name: form.text("first_name"),
        last_name: form.text("last_name"),
        email: form.text("email"),
        phone: form.text("phone"),
        company: form.text("company"),
        address: form.text("address"),
        national_id: form.text("national_id"),
        status: form.parse("status")?,
        notes: form.text("notes"),
    })
}

/// GET /clients
pub async fn list(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Query(query): Query<ListQuery>,
    Query(filter): Query<ClientFilter>,
) -> ApiResult<PaginatedResponse<Client>> {
    let (rows, total) = db::clients::list(&state.pool, filter.status, &query)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(PaginatedResponse::from_query(rows, total, &query)))
}

/// GET /clients/{id}
pub async fn get(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Path(id): Path<i64>,
) -> ApiResult<Client> {
    let client = db::clients::find_by_id(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    Ok(Json(client))
}

/// POST /clients (multipart: fields + optional `profileImg`)
pub async fn create(
    State(state): State<AppState>,
    current: CurrentAdmin,
    multipart: Multipart,
) -> Created<Client> {
    let mut form = MultipartForm::read(multipart).await?;
    let req = create_payload(&form)?;
    validate(&req)?;
    let email = normalize_email(&req.email);

    let stored = match form.take_file("profile_img") {
        Some(file) => Some(state.uploads.save(UploadCategory::Clients, &file).await?),
        None => None,
    };

    let client = match db::clients::create(&state.pool, &req, &email, stored.as_deref()).await {
        Ok(client) => client,
        Err(e) => {
            state.uploads.remove_opt(stored.as_deref()).await;
            return Err(ServiceError::from(e).into());
        }
    };

    tracing::info!(client_id = client.id, "Client created");
    announce(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Created,
        client.id,
        Some(&client),
        format!("Created client {} {}", client.first_name, client.last_name),
    )
    .await;

    Ok((StatusCode::CREATED, Json(client)))
}

/// PUT /clients/{id} (multipart: changed fields + optional `profileImg`)
pub async fn update(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> ApiResult<Client> {
    let mut form = MultipartForm::read(multipart).await?;
    let req = update_payload(&form)?;
    validate(&req)?;
    let email = req.email.as_deref().map(normalize_email);

    let existing = db::clients::find_by_id(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    let stored = match form.take_file("profile_img") {
        Some(file) => Some(state.uploads.save(UploadCategory::Clients, &file).await?),
        None => None,
    };

    let result = db::clients::update(&state.pool, id, &req, email.as_deref(), stored.as_deref()).await;
    let client = match result {
        Ok(Some(client)) => client,
        Ok(None) => {
            state.uploads.remove_opt(stored.as_deref()).await;
            return Err(not_found());
        }
        Err(e) => {
            state.uploads.remove_opt(stored.as_deref()).await;
            return Err(ServiceError::from(e).into());
        }
    };

    if stored.is_some() {
        state.uploads.remove_opt(existing.profile_img.as_deref()).await;
    }

    announce(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Updated,
        client.id,
        Some(&client),
        format!("Updated client {} {}", client.first_name, client.last_name),
    )
    .await;

    Ok(Json(client))
}

/// DELETE /clients/{id}
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    let client = db::clients::delete(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    state.uploads.remove_opt(client.profile_img.as_deref()).await;

    announce::<Client>(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Deleted,
        client.id,
        None,
        format!("Deleted client {} {}", client.first_name, client.last_name),
    )
    .await;

    Ok(Json(ApiResponse::ok()))
}
