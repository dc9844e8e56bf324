//! Wire types shared by the API handlers and the server binary.
//!
//! `models` holds the JSON representations handed back to clients, `api`
//! holds request bodies, token claims and the aggregate summaries.

pub mod api;
pub mod models;
