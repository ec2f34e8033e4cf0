//! Repository layer for database operations

pub mod books;
pub mod loans;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookFilter, CreateBook},
        loan::{Loan, LoanFilter, LoanRecord, NewLoan},
        page::PageRequest,
    },
};

/// Persistence boundary for books. Services depend on this trait so unit
/// tests can substitute a mock store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn create(&self, book: &CreateBook) -> AppResult<Book>;
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Book>>;
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;
    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool>;
    async fn update(&self, id: i64, book: &CreateBook) -> AppResult<Option<Book>>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
    async fn find(&self, filter: &BookFilter, page: &PageRequest)
        -> AppResult<(Vec<Book>, i64)>;
}

/// Persistence boundary for loans.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn create(&self, loan: &NewLoan) -> AppResult<i64>;
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Loan>>;
    async fn exists_active_for_book(&self, book_id: i64) -> AppResult<bool>;
    async fn set_returned(&self, id: i64, returned: bool) -> AppResult<()>;
    async fn find(&self, filter: &LoanFilter, page: &PageRequest)
        -> AppResult<(Vec<LoanRecord>, i64)>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Maps a unique-constraint violation on `constraint` to a business error,
/// leaving every other database error untouched.
pub(crate) fn on_unique_violation(err: sqlx::Error, constraint: &str, business: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_unique_violation() && db.constraint() == Some(constraint) =>
        {
            AppError::Business(business.to_string())
        }
        _ => AppError::Database(err),
    }
}
