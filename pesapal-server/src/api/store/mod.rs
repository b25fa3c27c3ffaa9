//! Store API handlers.
//!
//! Public endpoints Pesapal calls back into. IPNs are not signed by the
//! vendor, so the payload is only trusted after a status lookup.
//!
//! # Endpoints
//!
//! - `GET  /webhook` – IPN delivered as a query string
//! - `POST /webhook` – IPN delivered as a JSON body

use axum::{Router, routing::get};

use crate::state::AppState;

mod webhook;

/// Build the Store API router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/webhook",
        get(webhook::receive_get).post(webhook::receive_post),
    )
}
