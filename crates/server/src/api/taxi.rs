use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use tracing::info;

use crate::{
    dto::{EstimateDto, EstimateQueryDto, RatesDto, TaxiFareDto, TaxiRequestDto},
    error::ApiError,
    state::AppState,
};

pub async fn calculate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TaxiRequestDto>, JsonRejection>,
) -> Result<Json<TaxiFareDto>, ApiError> {
    let Json(request) = body?;
    let trip = request.into_trip()?;
    let fare = state.taxi.calculate(&trip);
    info!(
        "Taxi fare {:.2} for {} km ({})",
        fare.total, fare.distance_km, fare.label
    );
    Ok(Json(fare.into()))
}

pub async fn rates(State(state): State<Arc<AppState>>) -> Json<RatesDto> {
    Json(state.taxi.rates().into())
}

pub async fn estimate(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EstimateQueryDto>, QueryRejection>,
) -> Result<Json<EstimateDto>, ApiError> {
    let Query(params) = query?;
    params.validate()?;
    let estimate = state
        .taxi
        .estimate(params.distance_km, params.minutes_attente, params.aller_retour);
    Ok(Json(estimate.into()))
}
