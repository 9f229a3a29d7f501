//! Questboard HTTP API Service.
//!
//! This crate provides the HTTP API for the questboard portal, including:
//!
//! - Registration, login and logout
//! - Dashboard, ranking, missions and achievements
//! - Shop purchases and cosmetic equipment
//! - Learning activities and history
//! - Mini-game results
//! - Settings, avatar upload and progress reset
//!
//! # Authentication
//!
//! Login issues an HS256 session token. Requests present it either as an
//! `Authorization: Bearer` header or through the `questboard_session` cookie
//! set by the login response.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Store calls are synchronous

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod session;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
