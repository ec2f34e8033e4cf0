//! Business logic services

pub mod books;
pub mod loans;

use std::sync::Arc;

use crate::repository::{BookStore, LoanStore, Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        let book_store: Arc<dyn BookStore> = Arc::new(repository.books);
        let loan_store: Arc<dyn LoanStore> = Arc::new(repository.loans);
        Self {
            books: books::BooksService::new(book_store.clone()),
            loans: loans::LoansService::new(book_store, loan_store),
        }
    }
}
