//! Axum extractor for validated JSON payloads

use super::field_errors;
use crate::core::error::{OrdersError, RequestError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Axum extractor that deserializes and validates a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_order(
///     ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
/// ) -> Result<Json<Order>, OrdersError> {
///     // payload already passed the `Validate` rules
/// }
/// ```
///
/// Malformed JSON is rejected as [`RequestError::InvalidJson`], rule
/// violations as a field-level validation error; both become `400`.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = OrdersError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| RequestError::InvalidJson {
                message: e.body_text(),
            })?;

        payload
            .validate()
            .map_err(|errors| OrdersError::Validation(field_errors(&errors)))?;

        Ok(ValidatedJson(payload))
    }
}
