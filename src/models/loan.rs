//! Loan (borrow) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::book::Book;

/// Loan model from database.
///
/// `returned` is tri-state on the wire and in the store: NULL and `false` both
/// count as an active loan, only `true` releases the book.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: i64,
    pub book_id: i64,
    pub customer: String,
    pub loan_date: NaiveDate,
    pub returned: Option<bool>,
}

/// Loan joined with its book, as produced by the filtered search.
#[derive(Debug, Clone)]
pub struct LoanRecord {
    pub id: i64,
    pub customer: String,
    pub loan_date: NaiveDate,
    pub returned: Option<bool>,
    pub book: Book,
}

/// New loan to persist. `loan_date` is set by the service at creation time.
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub book_id: i64,
    pub customer: String,
    pub loan_date: NaiveDate,
}

/// Loan search filter: populated fields are combined with OR (a loan matches
/// when its book isbn equals `isbn` or its customer equals `customer`).
/// An empty filter matches every loan.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoanFilter {
    pub isbn: Option<String>,
    pub customer: Option<String>,
}

/// Query parameters for GET /loans
#[derive(Debug, Default, Deserialize)]
pub struct LoanQuery {
    pub isbn: Option<String>,
    pub customer: Option<String>,
    #[serde(default, deserialize_with = "super::page::empty_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "super::page::empty_as_none")]
    pub size: Option<i64>,
}

impl LoanQuery {
    /// Splits into filter and page request, dropping empty-string criteria.
    pub fn into_parts(self) -> (LoanFilter, super::page::PageRequest) {
        let filter = LoanFilter {
            isbn: self.isbn.filter(|s| !s.is_empty()),
            customer: self.customer.filter(|s| !s.is_empty()),
        };
        (filter, super::page::PageRequest::from_params(self.page, self.size))
    }
}
