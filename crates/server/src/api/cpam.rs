use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use crate::{
    dto::{MedicalFareDto, MedicalRequestDto},
    error::ApiError,
    state::AppState,
};

pub async fn calculate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MedicalRequestDto>, JsonRejection>,
) -> Result<Json<MedicalFareDto>, ApiError> {
    let Json(request) = body?;
    let (department, trip) = request.into_trip()?;
    let fare = state.medical(&department).calculate(&trip);
    info!(
        "CPAM fare {:.2} for {} km, department {}",
        fare.breakdown.total, fare.distance_km, fare.department
    );
    Ok(Json(fare.into()))
}
