use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery, CategoriaId};
use crate::features::categorias::dtos::{CategoriaDto, CategoriaResponseDto};
use crate::features::categorias::services::CategoriaService;
use crate::shared::types::{DeleteResponse, ErrorResponse, PaginationQuery};

/// List categorias
///
/// `count` falls back to 10 when missing, unparsable or outside 1-10;
/// `start` falls back to 0 when missing, unparsable or negative. Repeated
/// keys take their first value.
#[utoipa::path(
    get,
    path = "/categorias",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of categorias", body = Vec<CategoriaResponseDto>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn list_categorias(
    State(service): State<Arc<CategoriaService>>,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> Result<Json<Vec<CategoriaResponseDto>>> {
    let query = PaginationQuery::from_pairs(&pairs);
    let categorias = service.list(query.offset(), query.limit()).await?;
    Ok(Json(categorias))
}

/// Create a categoria
#[utoipa::path(
    post,
    path = "/categoria",
    request_body = CategoriaDto,
    responses(
        (status = 201, description = "Categoria created", body = CategoriaResponseDto),
        (status = 400, description = "Invalid request payload", body = ErrorResponse),
        (status = 409, description = "No free id could be allocated", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn create_categoria(
    State(service): State<Arc<CategoriaService>>,
    AppJson(dto): AppJson<CategoriaDto>,
) -> Result<(StatusCode, Json<CategoriaResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let categoria = service.create(dto.into()).await?;
    Ok((StatusCode::CREATED, Json(categoria)))
}

/// Get a categoria by ID
#[utoipa::path(
    get,
    path = "/categoria/{id}",
    params(
        ("id" = i32, Path, description = "Categoria ID")
    ),
    responses(
        (status = 200, description = "Categoria found", body = CategoriaResponseDto),
        (status = 400, description = "Invalid categoria ID", body = ErrorResponse),
        (status = 404, description = "Categoria not found", body = ErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn get_categoria(
    State(service): State<Arc<CategoriaService>>,
    CategoriaId(id): CategoriaId,
) -> Result<Json<CategoriaResponseDto>> {
    let categoria = service.get(id).await?;
    Ok(Json(categoria))
}

/// Replace a categoria's name and type
#[utoipa::path(
    put,
    path = "/categoria/{id}",
    params(
        ("id" = i32, Path, description = "Categoria ID")
    ),
    request_body = CategoriaDto,
    responses(
        (status = 200, description = "Categoria updated", body = CategoriaResponseDto),
        (status = 400, description = "Invalid categoria ID or payload", body = ErrorResponse),
        (status = 404, description = "Categoria not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn update_categoria(
    State(service): State<Arc<CategoriaService>>,
    CategoriaId(id): CategoriaId,
    AppJson(dto): AppJson<CategoriaDto>,
) -> Result<Json<CategoriaResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let categoria = service.update(id, dto.into()).await?;
    Ok(Json(categoria))
}

/// Delete a categoria
#[utoipa::path(
    delete,
    path = "/categoria/{id}",
    params(
        ("id" = i32, Path, description = "Categoria ID")
    ),
    responses(
        (status = 200, description = "Categoria deleted", body = DeleteResponse),
        (status = 400, description = "Invalid categoria ID", body = ErrorResponse),
        (status = 404, description = "Categoria not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn delete_categoria(
    State(service): State<Arc<CategoriaService>>,
    CategoriaId(id): CategoriaId,
) -> Result<Json<DeleteResponse>> {
    service.delete(id).await?;
    Ok(Json(DeleteResponse::success()))
}
