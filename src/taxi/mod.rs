mod rates;
pub use rates::*;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::debug;

use crate::shared::{
    money::round_cents,
    time::{CivilClock, Timestamp, is_sunday},
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaxiTrip {
    pub distance_km: f64,
    pub waiting_minutes: f64,
    pub departure: Option<Timestamp>,
    pub round_trip: bool,
}

impl TaxiTrip {
    pub fn new(distance_km: f64) -> Self {
        Self {
            distance_km,
            ..Default::default()
        }
    }

    pub fn waiting(mut self, minutes: f64) -> Self {
        self.waiting_minutes = minutes;
        self
    }

    pub fn departure_at<T: Into<Timestamp>>(mut self, departure: T) -> Self {
        self.departure = Some(departure.into());
        self
    }

    pub fn round_trip(mut self, round_trip: bool) -> Self {
        self.round_trip = round_trip;
        self
    }
}

/// Itemized taxi fare. Currency figures are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxiFare {
    pub base_charge: f64,
    pub distance_km: f64,
    pub billable_distance_km: f64,
    pub distance_cost: f64,
    pub waiting_minutes: f64,
    pub waiting_cost: f64,
    pub period: Period,
    pub tariff: Tariff,
    pub label: String,
    pub round_trip: bool,
    pub rate_per_km: f64,
    pub minimum_fare_applied: bool,
    pub total: f64,
    pub departure: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxiEstimate {
    pub distance_km: f64,
    pub round_trip: bool,
    pub total: f64,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct TaxiCalculator {
    rates: Rates,
    clock: CivilClock,
}

impl TaxiCalculator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_rates(mut self, rates: Rates) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_clock(mut self, clock: CivilClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn rates(&self) -> &Rates {
        &self.rates
    }

    pub fn period_at(&self, at: &DateTime<FixedOffset>) -> Period {
        if is_sunday(at.date_naive()) {
            Period::Sunday
        } else if self.rates.night.contains(at.time()) {
            Period::Night
        } else {
            Period::Day
        }
    }

    /// Negative inputs are not checked here, callers validate them.
    pub fn calculate(&self, trip: &TaxiTrip) -> TaxiFare {
        let departure = self.clock.resolve(trip.departure);
        let period = self.period_at(&departure);
        let tariff = Tariff::select(trip.round_trip, period);
        let rate_per_km = self.rates.per_km(tariff);

        let billable_distance_km = if trip.round_trip {
            trip.distance_km * 2.0
        } else {
            trip.distance_km
        };
        let distance_cost = billable_distance_km * rate_per_km;
        let waiting_cost = trip.waiting_minutes * self.rates.waiting_per_minute();

        let mut total = self.rates.base_charge + distance_cost + waiting_cost;
        if total < self.rates.minimum_fare {
            total = self.rates.minimum_fare;
        }
        let minimum_fare_applied = total == self.rates.minimum_fare;
        debug!(
            "Tariff {tariff} ({:?}) at {departure}, total {total:.2}",
            period
        );

        TaxiFare {
            base_charge: round_cents(self.rates.base_charge),
            distance_km: trip.distance_km,
            billable_distance_km: round_cents(billable_distance_km),
            distance_cost: round_cents(distance_cost),
            waiting_minutes: trip.waiting_minutes,
            waiting_cost: round_cents(waiting_cost),
            period,
            tariff,
            label: tariff.label(period),
            round_trip: trip.round_trip,
            rate_per_km: round_cents(rate_per_km),
            minimum_fare_applied,
            total: round_cents(total),
            departure,
        }
    }

    /// Fare for a departure right now.
    pub fn estimate(&self, distance_km: f64, waiting_minutes: f64, round_trip: bool) -> TaxiEstimate {
        let trip = TaxiTrip::new(distance_km)
            .waiting(waiting_minutes)
            .round_trip(round_trip);
        let fare = self.calculate(&trip);
        TaxiEstimate {
            distance_km,
            round_trip,
            total: fare.total,
            label: fare.label,
        }
    }
}

/// One-shot calculation with the default Vendée rates and the system clock.
pub fn calculate_taxi_fare(
    distance_km: f64,
    waiting_minutes: f64,
    timestamp: Option<Timestamp>,
    round_trip: bool,
) -> TaxiFare {
    let trip = TaxiTrip {
        distance_km,
        waiting_minutes,
        departure: timestamp,
        round_trip,
    };
    TaxiCalculator::new().calculate(&trip)
}
