use std::collections::{BTreeMap, HashMap};

use crate::shared::time::{NightWindow, Time};

/// Medical transport reimbursement tables. `Default` is the 2025 national
/// convention as applied in Vendée.
#[derive(Debug, Clone, PartialEq)]
pub struct Tariffs {
    pub intake_fee: f64,
    pub large_city_supplement: f64,
    /// Lowercase city names
    pub large_cities: Vec<String>,
    pub large_city_departments: Vec<String>,
    pub rate_per_km: HashMap<String, f64>,
    pub default_rate_per_km: f64,
    /// Kilometres included in the intake fee
    pub free_km: f64,
    pub tpmr_supplement: f64,
    pub drom_supplement: f64,
    pub drom_departments: Vec<String>,
    pub night_markup: f64,
    pub short_hospitalization_markup: f64,
    pub long_hospitalization_markup: f64,
    pub hospitalization_threshold_km: f64,
    /// Discount rate by patient count, the last entry covers larger groups
    pub shared_discounts: BTreeMap<u8, f64>,
    pub night: NightWindow,
}

impl Default for Tariffs {
    fn default() -> Self {
        let to_strings = |values: &[&str]| -> Vec<String> {
            values.iter().map(|value| value.to_string()).collect()
        };
        Self {
            intake_fee: 13.0,
            large_city_supplement: 15.0,
            large_cities: to_strings(&[
                "marseille",
                "paris",
                "nice",
                "toulouse",
                "lyon",
                "strasbourg",
                "montpellier",
                "rennes",
                "bordeaux",
                "lille",
                "grenoble",
                "nantes",
            ]),
            large_city_departments: to_strings(&["92", "93", "94"]),
            rate_per_km: HashMap::from([("85".to_string(), 1.07)]),
            default_rate_per_km: 1.07,
            free_km: 4.0,
            tpmr_supplement: 30.0,
            drom_supplement: 3.0,
            drom_departments: to_strings(&["971", "972", "973", "974", "976"]),
            night_markup: 0.5,
            short_hospitalization_markup: 0.25,
            long_hospitalization_markup: 0.5,
            hospitalization_threshold_km: 50.0,
            shared_discounts: BTreeMap::from([(2, 0.23), (3, 0.35), (4, 0.37)]),
            night: NightWindow::new(Time::from_hm(20, 0), Time::from_hm(8, 0)),
        }
    }
}

impl Tariffs {
    pub fn is_large_city(&self, city: &str) -> bool {
        let city = city.to_lowercase();
        self.large_cities.iter().any(|large| *large == city)
    }

    pub fn is_large_city_department(&self, department: &str) -> bool {
        self.large_city_departments.iter().any(|d| d == department)
    }

    pub fn is_drom(&self, department: &str) -> bool {
        self.drom_departments.iter().any(|d| d == department)
    }

    pub fn rate_for(&self, department: &str) -> f64 {
        self.rate_per_km
            .get(department)
            .copied()
            .unwrap_or(self.default_rate_per_km)
    }

    /// Rate for `patients` sharing one vehicle, zero for a single patient.
    pub fn shared_discount(&self, patients: u8) -> f64 {
        self.shared_discounts
            .range(..=patients)
            .next_back()
            .map(|(_, rate)| *rate)
            .unwrap_or(0.0)
    }
}

#[test]
fn shared_discount_caps_at_four() {
    let tariffs = Tariffs::default();
    assert_eq!(tariffs.shared_discount(1), 0.0);
    assert_eq!(tariffs.shared_discount(2), 0.23);
    assert_eq!(tariffs.shared_discount(3), 0.35);
    assert_eq!(tariffs.shared_discount(4), 0.37);
    assert_eq!(tariffs.shared_discount(8), 0.37);
}

#[test]
fn city_lookup_ignores_case() {
    let tariffs = Tariffs::default();
    assert!(tariffs.is_large_city("PARIS"));
    assert!(tariffs.is_large_city("Nantes"));
    assert!(!tariffs.is_large_city("La Roche-sur-Yon"));
    assert!(!tariffs.is_large_city(""));
}
