use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::error::unknown_endpoint;
use crate::middleware::resolve_user;
use crate::{blogs, notes, persons, users};

/// Every route the service answers. Layers that only matter on a real
/// socket (CORS, request tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/persons",
            get(persons::list_persons).post(persons::create_person),
        )
        .route(
            "/api/persons/{id}",
            get(persons::get_person)
                .put(persons::update_person)
                .delete(persons::delete_person),
        )
        .route("/info", get(persons::info))
        .with_state(state.clone());

    // Owned resources. The bearer token is resolved here for every request;
    // reads stay open to anonymous callers.
    let owned_routes = Router::new()
        .route("/api/blogs", get(blogs::list_blogs).post(blogs::create_blog))
        .route("/api/blogs/summary", get(blogs::summary))
        .route(
            "/api/blogs/{id}",
            get(blogs::get_blog)
                .put(blogs::update_blog)
                .delete(blogs::delete_blog),
        )
        .route("/api/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/api/notes/{id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .layer(middleware::from_fn_with_state(state.clone(), resolve_user))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(owned_routes)
        .fallback(unknown_endpoint)
}
