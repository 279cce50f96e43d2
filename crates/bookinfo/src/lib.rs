//! Collaborators for the downstream book-info service: an OAuth2
//! client-credentials token provider, the HTTP client for `/getbooks`, and
//! the failure taxonomy shared by both.

pub mod client;
pub mod error;
pub mod models;
pub mod token;

pub use client::BookInfoClient;
pub use error::BookInfoError;
pub use models::Book;
pub use token::TokenProvider;
