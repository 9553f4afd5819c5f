use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{dto::HealthDto, state::AppState};

pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        statut: "OK",
        message: "API Taxi Tariff Calculator is running",
        horodatage: state.clock.now().to_rfc3339(),
    })
}
