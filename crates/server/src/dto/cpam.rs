use serde::{Deserialize, Serialize};
use tarifa::cpam::{DEFAULT_DEPARTMENT, MedicalFare, MedicalTrip, TransportKind};

use crate::error::ApiError;

const MAX_PATIENTS: i64 = 8;

fn default_patients() -> i64 {
    1
}

fn default_department() -> String {
    DEFAULT_DEPARTMENT.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MedicalRequestDto {
    pub distance_km: f64,
    #[serde(default)]
    pub ville_depart: String,
    #[serde(default)]
    pub ville_arrivee: String,
    #[serde(default)]
    pub tarif_nuit: Option<bool>,
    #[serde(default)]
    pub date_heure_transport: Option<String>,
    #[serde(default)]
    pub type_transport: TransportKind,
    #[serde(default = "default_patients")]
    pub nb_patients: i64,
    #[serde(default)]
    pub tpmr: bool,
    #[serde(default)]
    pub peages: f64,
    #[serde(default = "default_department")]
    pub departement: String,
}

impl MedicalRequestDto {
    /// Splits the request into the billing department and the trip.
    pub fn into_trip(self) -> Result<(String, MedicalTrip), ApiError> {
        if !self.distance_km.is_finite() || self.distance_km <= 0.0 {
            return Err(ApiError::Unprocessable(
                "distance_km: must be greater than 0".into(),
            ));
        }
        let patients = u8::try_from(self.nb_patients)
            .ok()
            .filter(|count| (1..=MAX_PATIENTS).contains(&i64::from(*count)))
            .ok_or_else(|| {
                ApiError::Unprocessable(format!(
                    "nb_patients: must be between 1 and {MAX_PATIENTS}"
                ))
            })?;
        if !self.peages.is_finite() || self.peages < 0.0 {
            return Err(ApiError::Unprocessable(
                "peages: must be greater than or equal to 0".into(),
            ));
        }
        let transported_at =
            super::parse_timestamp("date_heure_transport", self.date_heure_transport.as_deref())?;

        let trip = MedicalTrip {
            distance_km: self.distance_km,
            origin: self.ville_depart,
            destination: self.ville_arrivee,
            night: self.tarif_nuit,
            transported_at,
            kind: self.type_transport,
            patients,
            tpmr: self.tpmr,
            tolls: self.peages,
        };
        Ok((self.departement, trip))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicalDetailsDto {
    pub distance_km: f64,
    pub nb_patients: u8,
    pub forfait_prise_charge: f64,
    pub forfait_grande_ville: f64,
    pub km_facturables: f64,
    pub tarif_km: f64,
    pub cout_kilometrique: f64,
    pub base_tarifaire: f64,
    pub majoration_taux: f64,
    pub majoration_type: String,
    pub majoration_montant: f64,
    pub supplement_tpmr: f64,
    pub supplement_drom: f64,
    pub peages: f64,
    pub total_supplements: f64,
    pub abattement_partage_taux: f64,
    pub abattement_partage_montant: f64,
    pub departement: String,
    pub date_heure_transport: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicalFareDto {
    pub total: f64,
    pub details: MedicalDetailsDto,
}

impl From<MedicalFare> for MedicalFareDto {
    fn from(fare: MedicalFare) -> Self {
        let b = fare.breakdown;
        Self {
            total: b.total,
            details: MedicalDetailsDto {
                distance_km: fare.distance_km,
                nb_patients: fare.patients,
                forfait_prise_charge: b.intake_fee,
                forfait_grande_ville: b.large_city_supplement,
                km_facturables: b.billable_km,
                tarif_km: b.rate_per_km,
                cout_kilometrique: b.kilometric_cost,
                base_tarifaire: b.base_tariff,
                majoration_taux: b.markup_rate,
                majoration_type: b.markup_label,
                majoration_montant: b.markup_amount,
                supplement_tpmr: b.tpmr_supplement,
                supplement_drom: b.drom_supplement,
                peages: b.tolls,
                total_supplements: b.total_supplements,
                abattement_partage_taux: b.shared_discount_rate,
                abattement_partage_montant: b.shared_discount_amount,
                departement: fare.department,
                date_heure_transport: fare.transported_at.to_rfc3339(),
            },
        }
    }
}
