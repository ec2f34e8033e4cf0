//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookFilter, CreateBook},
        page::PageRequest,
    },
};

use super::{on_unique_violation, BookStore};

/// Name of the unique index backing ISBN uniqueness (see migrations).
const ISBN_UNIQUE: &str = "books_isbn_key";

pub(crate) const DUPLICATE_ISBN: &str = "Isbn already registered";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    /// Create a new book
    async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, ISBN_UNIQUE, DUPLICATE_ISBN))
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, isbn FROM books WHERE isbn = $1",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Full-replace update; returns None when the id does not exist.
    async fn update(&self, id: i64, book: &CreateBook) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $1, author = $2, isbn = $3
            WHERE id = $4
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, ISBN_UNIQUE, DUPLICATE_ISBN))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Example-style filtered search: equality per populated field, AND'ed,
    /// with the total count of the full matching set.
    async fn find(
        &self,
        filter: &BookFilter,
        page: &PageRequest,
    ) -> AppResult<(Vec<Book>, i64)> {
        let mut conditions = vec!["1=1".to_string()];
        let mut binds: Vec<&str> = Vec::new();

        if let Some(ref title) = filter.title {
            binds.push(title);
            conditions.push(format!("title = ${}", binds.len()));
        }
        if let Some(ref author) = filter.author {
            binds.push(author);
            conditions.push(format!("author = ${}", binds.len()));
        }
        if let Some(ref isbn) = filter.isbn {
            binds.push(isbn);
            conditions.push(format!("isbn = ${}", binds.len()));
        }

        let where_clause = conditions.join(" AND ");

        let count_query = format!("SELECT COUNT(*) FROM books WHERE {}", where_clause);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        for bind in &binds {
            count = count.bind(*bind);
        }
        let total = count.fetch_one(&self.pool).await?;

        let select_query = format!(
            "SELECT id, title, author, isbn FROM books WHERE {} ORDER BY id LIMIT {} OFFSET {}",
            where_clause,
            page.size,
            page.offset()
        );
        let mut query = sqlx::query_as::<_, Book>(&select_query);
        for bind in &binds {
            query = query.bind(*bind);
        }
        let books = query.fetch_all(&self.pool).await?;

        Ok((books, total))
    }
}
