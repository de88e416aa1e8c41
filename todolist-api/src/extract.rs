/// Request extractors
///
/// [`ApiJson`] behaves like `axum::Json` but reports malformed bodies
/// through [`ApiError`], so clients always get the JSON error envelope.

use axum::extract::FromRequest;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// JSON body extractor with envelope-shaped rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Runs `validator` rules and turns the first failure into a 400
///
/// Fields are checked in the order given by `field_order` so that the
/// reported message is deterministic when several fields fail.
pub fn validate_body<T: Validate>(body: &T, field_order: &[&str]) -> Result<(), ApiError> {
    body.validate()
        .map_err(|errors| ApiError::BadRequest(first_message(&errors, field_order)))
}

fn first_message(errors: &ValidationErrors, field_order: &[&str]) -> String {
    let field_errors = errors.field_errors();

    field_order
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .chain(field_errors.values())
        .flat_map(|errs| errs.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Validation failed".to_string())
}
