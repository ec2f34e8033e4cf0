//! Loan management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::Book,
        loan::{LoanQuery, LoanRecord},
    },
};

use super::PageResponse;

/// Create loan request
#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateLoanRequest {
    /// ISBN of the book to lend
    #[validate(length(min = 1, message = "isbn is required"))]
    pub isbn: String,
    /// Borrower name
    #[validate(length(min = 1, message = "customer is required"))]
    pub customer: String,
}

/// Return request: the new value of the returned flag
#[derive(Deserialize, ToSchema)]
pub struct ReturnLoanRequest {
    pub returned: bool,
}

/// Loan with its book, as listed by the filtered search
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanResponse {
    /// Loan ID
    pub id: i64,
    /// ISBN of the lent book
    pub isbn: String,
    /// Borrower name
    pub customer: String,
    /// Date the loan was created
    pub loan_date: NaiveDate,
    /// The lent book
    pub book: Book,
}

impl From<LoanRecord> for LoanResponse {
    fn from(record: LoanRecord) -> Self {
        Self {
            id: record.id,
            isbn: record.book.isbn.clone(),
            customer: record.customer,
            loan_date: record.loan_date,
            book: record.book,
        }
    }
}

/// Create a new loan (lend a book). Responds with the bare numeric loan id.
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoanRequest,
    responses(
        (status = 201, description = "Loan created, body is the new loan id", body = i64),
        (status = 400, description = "Unknown ISBN or book already loaned", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateLoanRequest>,
) -> AppResult<(StatusCode, Json<i64>)> {
    request.validate()?;

    let loan_id = state
        .services
        .loans
        .create(&request.isbn, &request.customer)
        .await?;

    Ok((StatusCode::CREATED, Json(loan_id)))
}

/// Mark a loan as returned (or un-flag it)
#[utoipa::path(
    patch,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i64, Path, description = "Loan ID")
    ),
    request_body = ReturnLoanRequest,
    responses(
        (status = 200, description = "Returned flag updated"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ReturnLoanRequest>,
) -> AppResult<StatusCode> {
    state.services.loans.return_book(id, request.returned).await?;
    Ok(StatusCode::OK)
}

/// List loans matching the ISBN or customer filter
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(
        ("isbn" = Option<String>, Query, description = "Match loans of the book with this ISBN"),
        ("customer" = Option<String>, Query, description = "Match loans by this customer"),
        ("page" = Option<i64>, Query, description = "Page number, zero-based (default: 0)"),
        ("size" = Option<i64>, Query, description = "Page size (default: 20)")
    ),
    responses(
        (status = 200, description = "Page of loans", body = PageResponse<LoanResponse>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<PageResponse<LoanResponse>>> {
    let (filter, page) = query.into_parts();
    let (loans, total) = state.services.loans.find(filter, page).await?;

    let content = loans.into_iter().map(LoanResponse::from).collect();
    Ok(Json(PageResponse::new(content, total, &page)))
}
