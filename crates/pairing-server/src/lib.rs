//! Project Pairing Server
//!
//! HTTP API in front of the teamwork preference classifier. `POST /predict`
//! classifies a student and logs the submission; `GET /data-summary` serves
//! the dashboard statistics over everything logged so far.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::{create_router, AppError};
pub use state::AppState;
