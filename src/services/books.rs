//! Book management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookFilter, CreateBook},
        page::PageRequest,
    },
    repository::{books::DUPLICATE_ISBN, BookStore},
};

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Create a new book, rejecting duplicate ISBNs.
    ///
    /// The pre-check gives the friendly error on the common path; the unique
    /// index in the store catches the remaining race and maps to the same
    /// message.
    pub async fn create(&self, book: CreateBook) -> AppResult<Book> {
        if self.store.exists_by_isbn(&book.isbn).await? {
            return Err(AppError::Business(DUPLICATE_ISBN.to_string()));
        }
        self.store.create(&book).await
    }

    /// Get a book by ID
    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Resolve a book by its ISBN; used by loan creation.
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        self.store.find_by_isbn(isbn).await
    }

    /// Full-replace update of an existing book
    pub async fn update(&self, id: i64, book: CreateBook) -> AppResult<Book> {
        self.store
            .update(id, &book)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book by ID
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Filtered, paginated book search (AND across populated filter fields)
    pub async fn find(
        &self,
        filter: BookFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<Book>, i64)> {
        self.store.find(&filter, &page).await
    }
}
