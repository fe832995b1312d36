pub mod app;
pub mod auth;
pub mod books;
pub mod config;
pub mod error;
pub mod state;
