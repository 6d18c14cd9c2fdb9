//! JSON extractor that runs `validator` rules after decoding.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Decodes a JSON body and validates it.
///
/// Every rejection is a 400 with the shared error body: decode failures
/// (bad syntax, wrong types, missing `Content-Type`) as `JSON_EXTRACTION`,
/// rule violations as `VALIDATION_ERROR` with per-field details.
///
/// ```ignore
/// async fn create(ValidatedJson(user): ValidatedJson<User>) -> StatusCode { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}
