use serde::{Deserialize, Serialize};
use tarifa::taxi::{Rates, TaxiEstimate, TaxiFare, TaxiTrip};

use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct TaxiRequestDto {
    pub distance_km: f64,
    #[serde(default)]
    pub minutes_attente: f64,
    #[serde(default)]
    pub date_heure_depart: Option<String>,
    #[serde(default)]
    pub aller_retour: bool,
}

impl TaxiRequestDto {
    pub fn into_trip(self) -> Result<TaxiTrip, ApiError> {
        if !self.minutes_attente.is_finite() || self.minutes_attente < 0.0 {
            return Err(ApiError::Unprocessable(
                "minutes_attente: must be greater than or equal to 0".into(),
            ));
        }
        let departure = super::parse_timestamp("date_heure_depart", self.date_heure_depart.as_deref())?;
        if !self.distance_km.is_finite() || self.distance_km < 0.0 {
            return Err(ApiError::BadRequest(
                "La distance ne peut pas etre negative.".into(),
            ));
        }
        Ok(TaxiTrip {
            distance_km: self.distance_km,
            waiting_minutes: self.minutes_attente,
            departure,
            round_trip: self.aller_retour,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxiFareDto {
    pub prix_base: f64,
    pub distance_km: f64,
    pub distance_facturable: f64,
    pub cout_distance: f64,
    pub minutes_attente: f64,
    pub cout_attente: f64,
    pub type_tarif: String,
    pub aller_retour: bool,
    pub tarif_km: f64,
    pub tarif_minimum_applique: bool,
    pub total: f64,
    pub date_heure_depart: String,
}

impl From<TaxiFare> for TaxiFareDto {
    fn from(fare: TaxiFare) -> Self {
        Self {
            prix_base: fare.base_charge,
            distance_km: fare.distance_km,
            distance_facturable: fare.billable_distance_km,
            cout_distance: fare.distance_cost,
            minutes_attente: fare.waiting_minutes,
            cout_attente: fare.waiting_cost,
            type_tarif: fare.label,
            aller_retour: fare.round_trip,
            tarif_km: fare.rate_per_km,
            tarif_minimum_applique: fare.minimum_fare_applied,
            total: fare.total,
            date_heure_depart: fare.departure.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EstimateQueryDto {
    pub distance_km: f64,
    #[serde(default)]
    pub minutes_attente: f64,
    #[serde(default)]
    pub aller_retour: bool,
}

impl EstimateQueryDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.distance_km.is_finite() || self.distance_km <= 0.0 {
            return Err(ApiError::Unprocessable(
                "distance_km: must be greater than 0".into(),
            ));
        }
        if !self.minutes_attente.is_finite() || self.minutes_attente < 0.0 {
            return Err(ApiError::Unprocessable(
                "minutes_attente: must be greater than or equal to 0".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EstimateDto {
    pub distance_km: f64,
    pub aller_retour: bool,
    pub total_estime: f64,
    pub type_tarif: String,
}

impl From<TaxiEstimate> for EstimateDto {
    fn from(estimate: TaxiEstimate) -> Self {
        Self {
            distance_km: estimate.distance_km,
            aller_retour: estimate.round_trip,
            total_estime: estimate.total,
            type_tarif: estimate.label,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RatesDto {
    pub prix_base: f64,
    pub tarif_a_aller_retour_jour: f64,
    pub tarif_b_aller_retour_nuit: f64,
    pub tarif_c_simple_jour: f64,
    pub tarif_d_simple_nuit: f64,
    pub prix_par_minute_attente: f64,
    pub heures_de_nuit: String,
    pub tarif_minimum: f64,
}

impl From<&Rates> for RatesDto {
    fn from(rates: &Rates) -> Self {
        Self {
            prix_base: rates.base_charge,
            tarif_a_aller_retour_jour: rates.round_trip_day,
            tarif_b_aller_retour_nuit: rates.round_trip_night,
            tarif_c_simple_jour: rates.one_way_day,
            tarif_d_simple_nuit: rates.one_way_night,
            prix_par_minute_attente: rates.waiting_per_minute(),
            heures_de_nuit: rates.night.to_string(),
            tarif_minimum: rates.minimum_fare,
        }
    }
}
