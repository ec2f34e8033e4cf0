//! Data models for Libris

pub mod book;
pub mod loan;
pub mod page;

// Re-export commonly used types
pub use book::{Book, BookFilter, CreateBook};
pub use loan::{Loan, LoanFilter, LoanRecord};
pub use page::PageRequest;
