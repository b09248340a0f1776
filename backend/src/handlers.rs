use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::PropertyError;
use crate::models::{NewProperty, PropertyPage, PropertyPatch, PropertyQuery, PropertyResponse};
use crate::AppState;

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data: Some(data),
        })
    }
}

impl ApiResponse<()> {
    fn message(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.to_string()),
            data: None,
        })
    }
}

// Extractor failures (bad JSON, wrong types, unknown status) are caller errors.
fn rejected(message: String) -> PropertyError {
    PropertyError::Validation(message)
}

// An id segment axum cannot even decode matches no record.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, PropertyError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            log::info!("Unusable property id: {}", rejection.body_text());
            Err(PropertyError::NotFound)
        }
    }
}

pub async fn create_property(
    State(state): State<AppState>,
    payload: Result<Json<NewProperty>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<PropertyResponse>>), PropertyError> {
    let Json(input) = payload.map_err(|e| rejected(e.body_text()))?;
    log::info!("Creating new property: {:?}", input.title);

    let property = state.store.create(input)?;
    log::info!(
        "Successfully created property {} ({} stored)",
        property.id,
        state.store.len()
    );
    Ok((StatusCode::CREATED, ApiResponse::data(property.to_response())))
}

/// Lists properties, filtered by `status` and windowed by `limit`/`offset`.
pub async fn get_properties(
    State(state): State<AppState>,
    query: Result<Query<PropertyQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<PropertyPage>>, PropertyError> {
    let Query(query) = query.map_err(|e| rejected(e.body_text()))?;
    match query.status {
        Some(status) => log::info!("Fetching properties with status {:?}", status),
        None => log::info!("Fetching all properties"),
    }

    let page = state.store.list_page(&query);
    log::info!(
        "Successfully fetched {} of {} properties",
        page.properties.len(),
        page.total
    );
    Ok(ApiResponse::data(page))
}

pub async fn get_property(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<PropertyResponse>>, PropertyError> {
    let id = path_id(path)?;
    log::info!("Fetching property with ID: {}", id);
    let property = state.store.get_by_id(&id).ok_or(PropertyError::NotFound)?;
    Ok(ApiResponse::data(property.to_response()))
}

pub async fn update_property(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<PropertyPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<PropertyResponse>>, PropertyError> {
    let id = path_id(path)?;
    let Json(patch) = payload.map_err(|e| rejected(e.body_text()))?;
    log::info!("Updating property with ID: {}", id);

    let property = state.store.update(&id, patch)?;
    log::info!("Successfully updated property {}", property.id);
    Ok(Json(ApiResponse {
        success: true,
        message: Some("Property updated successfully".to_string()),
        data: Some(property.to_response()),
    }))
}

pub async fn delete_property(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, PropertyError> {
    let id = path_id(path)?;
    log::info!("Deleting property with ID: {}", id);
    let removed = state.store.delete(&id)?;
    log::info!(
        "Successfully deleted property {} ({} remaining)",
        removed.id,
        state.store.len()
    );
    Ok(ApiResponse::message("Property deleted successfully"))
}

pub async fn health() -> Json<ApiResponse<()>> {
    ApiResponse::message("ok")
}
