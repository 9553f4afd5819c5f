mod cpam;
mod health;
mod taxi;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::{CompressionLayer, predicate::SizeAbove},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Responses smaller than this are sent uncompressed.
const MIN_COMPRESSED_SIZE: u16 = 500;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/verifier-sante", get(health::check))
        .route("/calculer-tarif", post(taxi::calculate))
        .route("/tarifs", get(taxi::rates))
        .route("/estimation-rapide", get(taxi::estimate))
        .route("/calculer-tarif-cpam", post(cpam::calculate))
        .layer(CompressionLayer::new().compress_when(SizeAbove::new(MIN_COMPRESSED_SIZE)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
