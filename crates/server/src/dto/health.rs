use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub statut: &'static str,
    pub message: &'static str,
    pub horodatage: String,
}
