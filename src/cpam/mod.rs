//! Medical transport (CPAM) reimbursement.
//!
//! The order of operations follows the convention: intake fee, large-city
//! supplement, kilometric cost, a single markup on that subtotal, then the
//! supplements and the shared-transport discount.

mod tariffs;
pub use tariffs::*;

use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shared::{
    cache::Memo,
    money::round_cents,
    time::{CivilClock, Timestamp, is_sunday},
};

pub const DEFAULT_DEPARTMENT: &str = "85";
pub const NIGHT_LABEL: &str = "nuit/weekend";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportKind {
    #[default]
    #[serde(rename = "simple")]
    Simple,
    #[serde(rename = "hospitalisation")]
    Hospitalization,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MedicalTrip {
    pub distance_km: f64,
    pub origin: String,
    pub destination: String,
    /// Overrides the night/weekend detection when set
    pub night: Option<bool>,
    pub transported_at: Option<Timestamp>,
    pub kind: TransportKind,
    pub patients: u8,
    pub tpmr: bool,
    pub tolls: f64,
}

impl MedicalTrip {
    pub fn new(distance_km: f64) -> Self {
        Self {
            distance_km,
            origin: String::new(),
            destination: String::new(),
            night: None,
            transported_at: None,
            kind: TransportKind::Simple,
            patients: 1,
            tpmr: false,
            tolls: 0.0,
        }
    }

    pub fn between<A: Into<String>, B: Into<String>>(mut self, origin: A, destination: B) -> Self {
        self.origin = origin.into();
        self.destination = destination.into();
        self
    }

    pub fn night(mut self, night: bool) -> Self {
        self.night = Some(night);
        self
    }

    pub fn at<T: Into<Timestamp>>(mut self, timestamp: T) -> Self {
        self.transported_at = Some(timestamp.into());
        self
    }

    pub fn kind(mut self, kind: TransportKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn patients(mut self, patients: u8) -> Self {
        self.patients = patients;
        self
    }

    pub fn tpmr(mut self, tpmr: bool) -> Self {
        self.tpmr = tpmr;
        self
    }

    pub fn tolls(mut self, tolls: f64) -> Self {
        self.tolls = tolls;
        self
    }
}

/// Part of the fare that only depends on hashable inputs, rounded for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub total: f64,
    pub intake_fee: f64,
    pub large_city_supplement: f64,
    pub billable_km: f64,
    pub rate_per_km: f64,
    pub kilometric_cost: f64,
    /// Subtotal the markup applies to
    pub base_tariff: f64,
    pub markup_rate: f64,
    pub markup_label: String,
    pub markup_amount: f64,
    pub tpmr_supplement: f64,
    pub drom_supplement: f64,
    pub tolls: f64,
    pub total_supplements: f64,
    pub shared_discount_rate: f64,
    pub shared_discount_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalFare {
    #[serde(flatten)]
    pub breakdown: Breakdown,
    pub distance_km: f64,
    pub patients: u8,
    pub department: String,
    pub transported_at: DateTime<FixedOffset>,
}

/// Identifies a tariff table by allocation. Holding the `Arc` keeps the
/// address from being reused while a key refers to it.
#[derive(Debug, Clone)]
struct TariffsRef(Arc<Tariffs>);

impl PartialEq for TariffsRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TariffsRef {}

impl Hash for TariffsRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

/// Every input a [`Breakdown`] depends on. Floats are keyed by their bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteKey {
    tariffs: TariffsRef,
    department: String,
    distance_bits: u64,
    origin: String,
    destination: String,
    night: bool,
    kind: TransportKind,
    patients: u8,
    tpmr: bool,
    tolls_bits: u64,
}

/// Can be shared by any calculators, quotes from different tariff tables never mix.
pub type QuoteCache = Memo<QuoteKey, Breakdown>;

#[derive(Debug, Clone, PartialEq)]
struct Markup {
    rate: f64,
    label: String,
}

#[derive(Clone)]
pub struct MedicalCalculator {
    department: String,
    tariffs: Arc<Tariffs>,
    clock: CivilClock,
    cache: Option<Arc<QuoteCache>>,
}

impl Default for MedicalCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_DEPARTMENT)
    }
}

impl std::fmt::Debug for MedicalCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MedicalCalculator")
            .field("department", &self.department)
            .field("clock", &self.clock)
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl MedicalCalculator {
    pub fn new<D: Into<String>>(department: D) -> Self {
        Self {
            department: department.into(),
            tariffs: Arc::new(Tariffs::default()),
            clock: CivilClock::default(),
            cache: None,
        }
    }

    pub fn with_tariffs(mut self, tariffs: Arc<Tariffs>) -> Self {
        self.tariffs = tariffs;
        self
    }

    pub fn with_clock(mut self, clock: CivilClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_cache(mut self, cache: Arc<QuoteCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn is_night_or_weekend(&self, at: &DateTime<FixedOffset>) -> bool {
        self.tariffs.night.contains(at.time()) || is_sunday(at.date_naive())
    }

    /// Distance and patient count are expected to be validated by the caller.
    pub fn calculate(&self, trip: &MedicalTrip) -> MedicalFare {
        let transported_at = self.clock.resolve(trip.transported_at);
        let night = trip
            .night
            .unwrap_or_else(|| self.is_night_or_weekend(&transported_at));

        let breakdown = match &self.cache {
            Some(cache) => cache.get_or_insert_with(self.key(trip, night), || self.quote(trip, night)),
            None => self.quote(trip, night),
        };

        MedicalFare {
            breakdown,
            distance_km: trip.distance_km,
            patients: trip.patients,
            department: self.department.clone(),
            transported_at,
        }
    }

    fn key(&self, trip: &MedicalTrip, night: bool) -> QuoteKey {
        QuoteKey {
            tariffs: TariffsRef(self.tariffs.clone()),
            department: self.department.clone(),
            distance_bits: trip.distance_km.to_bits(),
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            night,
            kind: trip.kind,
            patients: trip.patients,
            tpmr: trip.tpmr,
            tolls_bits: trip.tolls.to_bits(),
        }
    }

    fn quote(&self, trip: &MedicalTrip, night: bool) -> Breakdown {
        let tariffs = &self.tariffs;
        let mut total = tariffs.intake_fee;

        let large_city_supplement = if tariffs.is_large_city(&trip.origin)
            || tariffs.is_large_city(&trip.destination)
            || tariffs.is_large_city_department(&self.department)
        {
            tariffs.large_city_supplement
        } else {
            0.0
        };
        total += large_city_supplement;

        let billable_km = (trip.distance_km - tariffs.free_km).max(0.0);
        let rate_per_km = tariffs.rate_for(&self.department);
        let kilometric_cost = billable_km * rate_per_km;
        total += kilometric_cost;
        let base_tariff = total;

        let markup = self.markup(trip, night);
        let markup_amount = base_tariff * markup.rate;
        total += markup_amount;

        let tpmr_supplement = if trip.tpmr {
            tariffs.tpmr_supplement
        } else {
            0.0
        };
        let drom_supplement = if tariffs.is_drom(&self.department) {
            tariffs.drom_supplement
        } else {
            0.0
        };
        let supplements = tpmr_supplement + drom_supplement + trip.tolls;

        let mut shared_discount_rate = 0.0;
        let mut shared_discount_amount = 0.0;
        if trip.patients > 1 {
            total = total * f64::from(trip.patients) + supplements;
            // The TPMR supplement stays inside the discounted amount
            let discount_base = total - supplements + tpmr_supplement;
            shared_discount_rate = tariffs.shared_discount(trip.patients);
            shared_discount_amount = discount_base * shared_discount_rate;
            total -= shared_discount_amount;
        } else {
            total += supplements;
        }
        debug!(
            "Department {} markup '{}' x{}, {} patient(s), total {total:.2}",
            self.department, markup.label, markup.rate, trip.patients
        );

        Breakdown {
            total: round_cents(total),
            intake_fee: round_cents(tariffs.intake_fee),
            large_city_supplement: round_cents(large_city_supplement),
            billable_km: round_cents(billable_km),
            rate_per_km,
            kilometric_cost: round_cents(kilometric_cost),
            base_tariff: round_cents(base_tariff),
            markup_rate: markup.rate,
            markup_label: markup.label,
            markup_amount: round_cents(markup_amount),
            tpmr_supplement: round_cents(tpmr_supplement),
            drom_supplement: round_cents(drom_supplement),
            tolls: round_cents(trip.tolls),
            total_supplements: round_cents(supplements),
            shared_discount_rate,
            shared_discount_amount: round_cents(shared_discount_amount),
        }
    }

    /// Highest applicable rate wins, markups never add up.
    fn markup(&self, trip: &MedicalTrip, night: bool) -> Markup {
        let tariffs = &self.tariffs;
        let mut markup = Markup {
            rate: 0.0,
            label: String::new(),
        };
        if night {
            markup = Markup {
                rate: tariffs.night_markup,
                label: NIGHT_LABEL.to_string(),
            };
        }

        if trip.kind == TransportKind::Hospitalization {
            let threshold = tariffs.hospitalization_threshold_km;
            let (rate, bracket) = if trip.distance_km < threshold {
                (tariffs.short_hospitalization_markup, format!("<{threshold}km"))
            } else {
                (tariffs.long_hospitalization_markup, format!(">={threshold}km"))
            };
            if rate > markup.rate {
                markup = Markup {
                    rate,
                    label: format!("hospitalisation ({bracket})"),
                };
            }
        }
        markup
    }
}

/// One-shot calculation with the default tariffs and the system clock.
#[allow(clippy::too_many_arguments)]
pub fn calculate_medical_fare(
    distance_km: f64,
    origin: &str,
    destination: &str,
    night: Option<bool>,
    timestamp: Option<Timestamp>,
    kind: TransportKind,
    patients: u8,
    tpmr: bool,
    tolls: f64,
    department: &str,
) -> MedicalFare {
    let trip = MedicalTrip {
        distance_km,
        origin: origin.to_string(),
        destination: destination.to_string(),
        night,
        transported_at: timestamp,
        kind,
        patients,
        tpmr,
        tolls,
    };
    MedicalCalculator::new(department).calculate(&trip)
}
