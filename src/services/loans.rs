//! Loan management service
//!
//! Owns the one-active-loan-per-book rule: a book with a loan whose returned
//! flag is unset or false cannot be lent again until that loan is returned.

use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{LoanFilter, LoanRecord, NewLoan},
        page::PageRequest,
    },
    repository::{loans::ALREADY_LOANED, BookStore, LoanStore},
};

pub(crate) const BOOK_NOT_FOUND: &str = "Book not found for passed isbn";

#[derive(Clone)]
pub struct LoansService {
    books: Arc<dyn BookStore>,
    store: Arc<dyn LoanStore>,
}

impl LoansService {
    pub fn new(books: Arc<dyn BookStore>, store: Arc<dyn LoanStore>) -> Self {
        Self { books, store }
    }

    /// Create a new loan for the book with the given ISBN.
    ///
    /// The existence check and the insert are two statements; the partial
    /// unique index on loans(book_id) makes the loser of a concurrent create
    /// fail with the same business error instead of double-lending.
    pub async fn create(&self, isbn: &str, customer: &str) -> AppResult<i64> {
        let book = self
            .books
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| AppError::BadRequest(BOOK_NOT_FOUND.to_string()))?;

        if self.store.exists_active_for_book(book.id).await? {
            return Err(AppError::Business(ALREADY_LOANED.to_string()));
        }

        let loan = NewLoan {
            book_id: book.id,
            customer: customer.to_string(),
            loan_date: Utc::now().date_naive(),
        };
        self.store.create(&loan).await
    }

    /// Set the returned flag on a loan. Re-returning an already-returned
    /// loan is permitted and simply re-persists the flag.
    pub async fn return_book(&self, id: i64, returned: bool) -> AppResult<()> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        self.store.set_returned(id, returned).await
    }

    /// Filtered, paginated loan search (OR across populated filter fields)
    pub async fn find(
        &self,
        filter: LoanFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<LoanRecord>, i64)> {
        self.store.find(&filter, &page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::book::Book,
        models::loan::Loan,
        repository::{MockBookStore, MockLoanStore},
    };
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn book() -> Book {
        Book {
            id: 1,
            title: "As aventuras".to_string(),
            author: "Fulano".to_string(),
            isbn: "123".to_string(),
        }
    }

    fn loan(returned: Option<bool>) -> Loan {
        Loan {
            id: 7,
            book_id: 1,
            customer: "Fulano".to_string(),
            loan_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            returned,
        }
    }

    #[tokio::test]
    async fn create_returns_new_loan_id() {
        let mut books = MockBookStore::new();
        books
            .expect_find_by_isbn()
            .with(eq("123"))
            .return_once(|_| Ok(Some(book())));

        let mut store = MockLoanStore::new();
        store
            .expect_exists_active_for_book()
            .with(eq(1))
            .return_once(|_| Ok(false));
        store
            .expect_create()
            .withf(|loan| loan.book_id == 1 && loan.customer == "Fulano")
            .return_once(|_| Ok(7));

        let service = LoansService::new(Arc::new(books), Arc::new(store));
        let id = service.create("123", "Fulano").await.unwrap();
        assert_eq!(id, 7);
    }

    #[tokio::test]
    async fn create_fails_for_unknown_isbn() {
        let mut books = MockBookStore::new();
        books
            .expect_find_by_isbn()
            .with(eq("999"))
            .return_once(|_| Ok(None));

        let mut store = MockLoanStore::new();
        store.expect_exists_active_for_book().never();
        store.expect_create().never();

        let service = LoansService::new(Arc::new(books), Arc::new(store));
        let err = service.create("999", "Fulano").await.unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Book not found for passed isbn"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_fails_when_book_already_loaned() {
        let mut books = MockBookStore::new();
        books
            .expect_find_by_isbn()
            .with(eq("123"))
            .return_once(|_| Ok(Some(book())));

        let mut store = MockLoanStore::new();
        store
            .expect_exists_active_for_book()
            .with(eq(1))
            .return_once(|_| Ok(true));
        // The store must not gain a loan when the rule fires.
        store.expect_create().never();

        let service = LoansService::new(Arc::new(books), Arc::new(store));
        let err = service.create("123", "Outro").await.unwrap_err();
        match err {
            AppError::Business(msg) => assert_eq!(msg, "Book already loaned"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn return_book_fails_for_unknown_loan() {
        let books = MockBookStore::new();
        let mut store = MockLoanStore::new();
        store.expect_get_by_id().with(eq(99)).return_once(|_| Ok(None));
        store.expect_set_returned().never();

        let service = LoansService::new(Arc::new(books), Arc::new(store));
        assert!(matches!(
            service.return_book(99, true).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn return_book_persists_the_flag() {
        let books = MockBookStore::new();
        let mut store = MockLoanStore::new();
        store
            .expect_get_by_id()
            .with(eq(7))
            .return_once(|_| Ok(Some(loan(None))));
        store
            .expect_set_returned()
            .with(eq(7), eq(true))
            .return_once(|_, _| Ok(()));

        let service = LoansService::new(Arc::new(books), Arc::new(store));
        service.return_book(7, true).await.unwrap();
    }

    #[tokio::test]
    async fn returning_an_already_returned_loan_is_permitted() {
        let books = MockBookStore::new();
        let mut store = MockLoanStore::new();
        store
            .expect_get_by_id()
            .with(eq(7))
            .return_once(|_| Ok(Some(loan(Some(true)))));
        store
            .expect_set_returned()
            .with(eq(7), eq(true))
            .return_once(|_, _| Ok(()));

        let service = LoansService::new(Arc::new(books), Arc::new(store));
        service.return_book(7, true).await.unwrap();
    }

    #[tokio::test]
    async fn find_passes_or_filter_through() {
        let books = MockBookStore::new();
        let mut store = MockLoanStore::new();
        store
            .expect_find()
            .withf(|filter, page| {
                filter.isbn.as_deref() == Some("123")
                    && filter.customer.as_deref() == Some("Fulano")
                    && page.page == 0
                    && page.size == 10
            })
            .return_once(|_, _| {
                Ok((
                    vec![LoanRecord {
                        id: 7,
                        customer: "Fulano".to_string(),
                        loan_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                        returned: None,
                        book: book(),
                    }],
                    1,
                ))
            });

        let service = LoansService::new(Arc::new(books), Arc::new(store));
        let filter = LoanFilter {
            isbn: Some("123".to_string()),
            customer: Some("Fulano".to_string()),
        };
        let (loans, total) = service
            .find(filter, PageRequest { page: 0, size: 10 })
            .await
            .unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(total, 1);
    }
}
