use axum::{
    body::Body,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::shared::validation::CATEGORIA_ID_REGEX;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid request payload: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid request payload: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Invalid request payload: {}", err)
            }
            _ => "Invalid request payload".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Query string extractor whose rejections use the JSON error body
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(query_rejection(rejection)),
        }
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    match rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => {
            AppError::BadRequest(format!("Invalid query string: {}", err.body_text()))
        }
        _ => AppError::BadRequest("Invalid query string".to_string()),
    }
}

/// Numeric categoria id taken from the `{id}` path segment.
///
/// Anything that is not a run of ASCII digits fitting in an `i32` is
/// rejected with `400 Invalid categoria ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoriaId(pub i32);

impl CategoriaId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if !CATEGORIA_ID_REGEX.is_match(raw) {
            return Err(invalid_id());
        }
        raw.parse::<i32>().map(Self).map_err(|_| invalid_id())
    }
}

fn invalid_id() -> AppError {
    AppError::BadRequest("Invalid categoria ID".to_string())
}

impl<S> FromRequestParts<S> for CategoriaId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_id())?;
        Self::parse(&raw)
    }
}
