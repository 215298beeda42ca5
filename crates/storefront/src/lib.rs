//! Toolshop Storefront library.
//!
//! This crate provides the storefront as a library so the binary and the
//! end-to-end suite build the exact same application via [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
pub use state::AppState;
