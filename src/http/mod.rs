//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with all endpoints
//! - Multipart form parsing for `/generate`
//! - One-shot downloads of rendered videos
//! - Request logging and CORS middleware

pub mod form;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
