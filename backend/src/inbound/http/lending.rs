//! Lending API handlers.
//!
//! ```text
//! GET /pickup/{bookId}
//! GET /dropoff/{bookId}
//! GET /list/currentpicks
//! GET /my-history
//! ```
//!
//! The two transitions resolve the session identity up front but pass it to
//! the coordinator as an `Option`, so a request for a missing book answers
//! `404` even when nobody is logged in. The listings require a session
//! outright.

use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{DropOffRequest, LoanListResponse, LoanPayload, PickUpRequest};
use crate::domain::{BookId, Error, LoanId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Confirmation body returned by a successful pick-up.
pub const PICKED_MESSAGE: &str = "Book picked";
/// Confirmation body returned by a successful drop-off.
pub const DROPPED_MESSAGE: &str = "This book has been dropped off";

/// Loan as exposed over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanBody {
    /// Loan identifier.
    pub id: LoanId,
    /// Book this loan references.
    pub book_id: BookId,
    /// User holding (or having held) the book.
    pub user_id: UserId,
    /// Pick-up timestamp.
    pub picked_at: DateTime<Utc>,
    /// Whether the book has been returned.
    pub dropped_off: bool,
    /// Return timestamp, present iff the loan is closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped_at: Option<DateTime<Utc>>,
}

impl From<LoanPayload> for LoanBody {
    fn from(loan: LoanPayload) -> Self {
        Self {
            id: loan.id,
            book_id: loan.book_id,
            user_id: loan.user_id,
            picked_at: loan.picked_at,
            dropped_off: loan.dropped_off,
            dropped_at: loan.dropped_at,
        }
    }
}

fn into_bodies(response: LoanListResponse) -> Vec<LoanBody> {
    response.loans.into_iter().map(LoanBody::from).collect()
}

/// Pick up a book for the session user.
#[utoipa::path(
    get,
    path = "/pickup/{bookId}",
    params(("bookId" = uuid::Uuid, Path, description = "Book to pick up")),
    responses(
        (status = 200, description = "Book picked", body = String),
        (status = 401, description = "No logged in user", body = Error),
        (status = 404, description = "Unknown book, or already held by this user", body = Error),
        (status = 451, description = "Book is on loan to someone else", body = Error),
        (status = 503, description = "Store unavailable or transition kept conflicting", body = Error)
    ),
    tags = ["lending"],
    operation_id = "pickUp"
)]
#[get("/pickup/{book_id}")]
pub async fn pick_up(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<BookId>,
) -> ApiResult<HttpResponse> {
    let request = PickUpRequest {
        book_id: path.into_inner(),
        requesting_user: session.user_id()?,
    };
    state.lending.pick_up(request).await?;
    Ok(HttpResponse::Ok().body(PICKED_MESSAGE))
}

/// Drop off a book previously picked up by the session user.
#[utoipa::path(
    get,
    path = "/dropoff/{bookId}",
    params(("bookId" = uuid::Uuid, Path, description = "Book to drop off")),
    responses(
        (status = 200, description = "Book dropped off", body = String),
        (status = 401, description = "No logged in user", body = Error),
        (status = 404, description = "Unknown book, or no active loan for this user", body = Error),
        (status = 503, description = "Store unavailable or transition kept conflicting", body = Error)
    ),
    tags = ["lending"],
    operation_id = "dropOff"
)]
#[get("/dropoff/{book_id}")]
pub async fn drop_off(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<BookId>,
) -> ApiResult<HttpResponse> {
    let request = DropOffRequest {
        book_id: path.into_inner(),
        requesting_user: session.user_id()?,
    };
    state.lending.drop_off(request).await?;
    Ok(HttpResponse::Ok().body(DROPPED_MESSAGE))
}

/// List the session user's open loans.
#[utoipa::path(
    get,
    path = "/list/currentpicks",
    responses(
        (status = 200, description = "Open loans", body = [LoanBody]),
        (status = 401, description = "No logged in user", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["lending"],
    operation_id = "currentPicks"
)]
#[get("/list/currentpicks")]
pub async fn current_picks(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<LoanBody>>> {
    let user_id = session.require_user_id()?;
    let response = state.lending_query.current_loans(user_id).await?;
    Ok(web::Json(into_bodies(response)))
}

/// List every loan the session user has ever held.
#[utoipa::path(
    get,
    path = "/my-history",
    responses(
        (status = 200, description = "All loans, open and closed", body = [LoanBody]),
        (status = 401, description = "No logged in user", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["lending"],
    operation_id = "loanHistory"
)]
#[get("/my-history")]
pub async fn loan_history(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<LoanBody>>> {
    let user_id = session.require_user_id()?;
    let response = state.lending_query.loan_history(user_id).await?;
    Ok(web::Json(into_bodies(response)))
}

#[cfg(test)]
#[path = "lending_tests.rs"]
mod tests;
