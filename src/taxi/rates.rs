use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::shared::time::{NightWindow, Time};

/// Regulated taxi rates. `Default` is the Vendée 2025 prefectoral schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rates {
    /// Pick-up charge
    pub base_charge: f64,
    pub round_trip_day: f64,
    pub round_trip_night: f64,
    pub one_way_day: f64,
    pub one_way_night: f64,
    pub waiting_per_hour: f64,
    pub minimum_fare: f64,
    pub night: NightWindow,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            base_charge: 2.94,
            round_trip_day: 1.08,
            round_trip_night: 1.62,
            one_way_day: 2.16,
            one_way_night: 3.24,
            waiting_per_hour: 29.44,
            minimum_fare: 8.0,
            night: NightWindow::new(Time::from_hm(19, 0), Time::from_hm(7, 0)),
        }
    }
}

impl Rates {
    pub fn waiting_per_minute(&self) -> f64 {
        self.waiting_per_hour / 60.0
    }

    pub fn per_km(&self, tariff: Tariff) -> f64 {
        match tariff {
            Tariff::A => self.round_trip_day,
            Tariff::B => self.round_trip_night,
            Tariff::C => self.one_way_day,
            Tariff::D => self.one_way_night,
        }
    }
}

/// When the ride starts. Night and Sunday share the elevated tariff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Night,
    Sunday,
}

impl Period {
    pub fn is_elevated(&self) -> bool {
        !matches!(self, Period::Day)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "jour",
            Period::Night => "nuit",
            // Public holidays are not tracked, only the label carries them
            Period::Sunday => "dimanche/ferie",
        }
    }
}

/// Official tariff letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tariff {
    /// Round trip, day
    A,
    /// Round trip, night or Sunday
    B,
    /// One way, day
    C,
    /// One way, night or Sunday
    D,
}

impl Tariff {
    pub fn select(round_trip: bool, period: Period) -> Self {
        match (round_trip, period.is_elevated()) {
            (true, false) => Tariff::A,
            (true, true) => Tariff::B,
            (false, false) => Tariff::C,
            (false, true) => Tariff::D,
        }
    }

    pub fn label(&self, period: Period) -> String {
        let direction = match self {
            Tariff::A | Tariff::B => "aller-retour",
            Tariff::C | Tariff::D => "aller simple",
        };
        format!("{} {} (tarif {})", period.as_str(), direction, self)
    }
}

impl Display for Tariff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Tariff::A => "A",
            Tariff::B => "B",
            Tariff::C => "C",
            Tariff::D => "D",
        };
        f.write_str(letter)
    }
}

#[test]
fn tariff_selection() {
    assert_eq!(Tariff::select(true, Period::Day), Tariff::A);
    assert_eq!(Tariff::select(true, Period::Sunday), Tariff::B);
    assert_eq!(Tariff::select(false, Period::Day), Tariff::C);
    assert_eq!(Tariff::select(false, Period::Night), Tariff::D);
}

#[test]
fn tariff_labels() {
    assert_eq!(Tariff::C.label(Period::Day), "jour aller simple (tarif C)");
    assert_eq!(Tariff::B.label(Period::Night), "nuit aller-retour (tarif B)");
    assert_eq!(
        Tariff::D.label(Period::Sunday),
        "dimanche/ferie aller simple (tarif D)"
    );
}
