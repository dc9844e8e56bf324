pub mod auth;
pub mod blogs;
pub mod convert;
pub mod error;
pub mod middleware;
pub mod notes;
pub mod persons;
pub mod routes;
pub mod stats;
pub mod users;
pub mod validation;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use routes::router;
