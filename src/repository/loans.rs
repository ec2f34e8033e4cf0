//! Loans repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::AppResult,
    models::{
        book::Book,
        loan::{Loan, LoanFilter, LoanRecord, NewLoan},
        page::PageRequest,
    },
};

use super::{on_unique_violation, LoanStore};

/// Partial unique index on loans(book_id) WHERE returned IS NOT TRUE.
/// Backstops the service-level existence check under concurrent creates.
const ONE_ACTIVE_PER_BOOK: &str = "loans_one_active_per_book";

pub(crate) const ALREADY_LOANED: &str = "Book already loaned";

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanStore for LoansRepository {
    /// Create a new loan. A concurrent create for the same book loses here
    /// with the same business error the pre-check produces.
    async fn create(&self, loan: &NewLoan) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO loans (book_id, customer, loan_date)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(loan.book_id)
        .bind(&loan.customer)
        .bind(loan.loan_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, ONE_ACTIVE_PER_BOOK, ALREADY_LOANED))
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            "SELECT id, book_id, customer, loan_date, returned FROM loans WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(loan)
    }

    /// True when the book has a loan whose returned flag is unset or false.
    async fn exists_active_for_book(&self, book_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE book_id = $1 AND returned IS NOT TRUE)",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn set_returned(&self, id: i64, returned: bool) -> AppResult<()> {
        sqlx::query("UPDATE loans SET returned = $1 WHERE id = $2")
            .bind(returned)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Filtered search: populated criteria are OR'ed; an empty filter
    /// matches all loans. Total counts the full matching set.
    async fn find(
        &self,
        filter: &LoanFilter,
        page: &PageRequest,
    ) -> AppResult<(Vec<LoanRecord>, i64)> {
        let mut conditions: Vec<String> = Vec::new();
        let mut binds: Vec<&str> = Vec::new();

        if let Some(ref isbn) = filter.isbn {
            binds.push(isbn);
            conditions.push(format!("b.isbn = ${}", binds.len()));
        }
        if let Some(ref customer) = filter.customer {
            binds.push(customer);
            conditions.push(format!("l.customer = ${}", binds.len()));
        }

        let where_clause = if conditions.is_empty() {
            "1=1".to_string()
        } else {
            conditions.join(" OR ")
        };

        let count_query = format!(
            "SELECT COUNT(*) FROM loans l JOIN books b ON b.id = l.book_id WHERE {}",
            where_clause
        );
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        for bind in &binds {
            count = count.bind(*bind);
        }
        let total = count.fetch_one(&self.pool).await?;

        let select_query = format!(
            r#"
            SELECT l.id, l.customer, l.loan_date, l.returned,
                   b.id as book_id, b.title, b.author, b.isbn
            FROM loans l
            JOIN books b ON b.id = l.book_id
            WHERE {}
            ORDER BY l.id
            LIMIT {} OFFSET {}
            "#,
            where_clause,
            page.size,
            page.offset()
        );
        let mut query = sqlx::query(&select_query);
        for bind in &binds {
            query = query.bind(*bind);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let loans = rows
            .into_iter()
            .map(|row| LoanRecord {
                id: row.get("id"),
                customer: row.get("customer"),
                loan_date: row.get("loan_date"),
                returned: row.get("returned"),
                book: Book {
                    id: row.get("book_id"),
                    title: row.get("title"),
                    author: row.get("author"),
                    isbn: row.get("isbn"),
                },
            })
            .collect();

        Ok((loans, total))
    }
}
