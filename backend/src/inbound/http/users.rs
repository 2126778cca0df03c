//! Login handler establishing the session identity.
//!
//! ```text
//! POST /login {"email":"reader@example.com"}
//! ```
//!
//! There is no credential check: the service trusts the email and only
//! resolves it to a registered user, mirroring the identity model the rest
//! of the API assumes. Registration is out of scope.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{EmailAddress, EmailValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Registered email address.
    #[schema(example = "reader@example.com")]
    pub email: String,
}

fn map_email_validation_error(err: EmailValidationError) -> Error {
    let code = match err {
        EmailValidationError::Empty => "empty_email",
        EmailValidationError::MissingAtSign => "missing_at_sign",
    };
    Error::invalid_request("email must be a valid address")
        .with_details(json!({ "field": "email", "code": code }))
}

/// Resolve an email to a registered user and persist the id in the session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unknown email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let email =
        EmailAddress::new(payload.into_inner().email).map_err(map_email_validation_error)?;
    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|error| Error::service_unavailable(error.to_string()))?
        .ok_or_else(|| Error::unauthorized("No registered user with the provided email"))?;

    session.persist_user(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(HttpResponse::Ok().finish())
}
