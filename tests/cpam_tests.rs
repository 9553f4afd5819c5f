use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tarifa::prelude::*;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

// Wednesday morning, outside every markup window
fn weekday_noon() -> NaiveDateTime {
    at(2025, 1, 15, 12, 0, 0)
}

fn day_trip(distance_km: f64) -> MedicalTrip {
    MedicalTrip::new(distance_km).at(weekday_noon())
}

#[test]
fn shared_night_transport_reference_quote() {
    let trip = day_trip(30.0)
        .between("La Roche sur Yon", "Nantes")
        .night(true)
        .patients(2)
        .tpmr(true)
        .tolls(5.5);
    let fare = MedicalCalculator::new("85").calculate(&trip);
    let b = &fare.breakdown;

    assert_eq!(b.intake_fee, 13.0);
    assert_eq!(b.large_city_supplement, 15.0);
    assert_eq!(b.billable_km, 26.0);
    assert_eq!(b.rate_per_km, 1.07);
    assert_eq!(b.kilometric_cost, 27.82);
    assert_eq!(b.base_tariff, 55.82);
    assert_eq!(b.markup_rate, 0.5);
    assert_eq!(b.markup_label, "nuit/weekend");
    assert_eq!(b.markup_amount, 27.91);
    assert_eq!(b.tpmr_supplement, 30.0);
    assert_eq!(b.drom_supplement, 0.0);
    assert_eq!(b.tolls, 5.5);
    assert_eq!(b.total_supplements, 35.5);
    assert_eq!(b.shared_discount_rate, 0.23);
    assert_eq!(b.shared_discount_amount, 45.42);
    assert_eq!(b.total, 157.54);
    assert_eq!(fare.patients, 2);
    assert_eq!(fare.department, "85");
}

#[test]
fn first_four_kilometres_are_free() {
    let calculator = MedicalCalculator::new("85");
    for distance in [0.5, 3.0, 4.0] {
        let fare = calculator.calculate(&day_trip(distance));
        assert_eq!(fare.breakdown.billable_km, 0.0);
        assert_eq!(fare.breakdown.kilometric_cost, 0.0);
        assert_eq!(fare.breakdown.total, 13.0);
    }
}

#[test]
fn large_city_supplement_applies_once() {
    // Paris, Nantes and department 92 all qualify
    let fare = MedicalCalculator::new("92").calculate(&day_trip(20.0).between("Paris", "Nantes"));
    assert_eq!(fare.breakdown.large_city_supplement, 15.0);
    assert_eq!(fare.breakdown.total, 45.12);

    for department in ["85", "93", "971"] {
        let fare = MedicalCalculator::new(department).calculate(&day_trip(20.0).between("paris", ""));
        assert_eq!(fare.breakdown.large_city_supplement, 15.0);
    }

    let none = MedicalCalculator::new("85").calculate(&day_trip(20.0).between("Challans", "Luçon"));
    assert_eq!(none.breakdown.large_city_supplement, 0.0);
}

#[test]
fn shared_discount_keeps_tpmr_in_its_base() {
    let calculator = MedicalCalculator::new("85");

    let single = calculator.calculate(&day_trip(30.0).tpmr(true));
    assert_eq!(single.breakdown.total, 70.82);
    assert_eq!(single.breakdown.shared_discount_amount, 0.0);

    let shared = calculator.calculate(&day_trip(30.0).tpmr(true).patients(2));
    // (40.82 * 2 + 30) - 30 + 30 = 111.64 discounted by 23 %
    assert_eq!(shared.breakdown.shared_discount_rate, 0.23);
    assert_eq!(shared.breakdown.shared_discount_amount, round_cents(111.64 * 0.23));
    assert_eq!(shared.breakdown.shared_discount_amount, 25.68);
    assert_eq!(shared.breakdown.total, 85.96);

    let without_tpmr = calculator.calculate(&day_trip(30.0).patients(2));
    assert_eq!(without_tpmr.breakdown.shared_discount_amount, 18.78);
    assert_eq!(without_tpmr.breakdown.total, 62.86);
}

#[test]
fn large_groups_use_the_four_patient_rate() {
    let fare = MedicalCalculator::new("971").calculate(&day_trip(10.0).patients(6));
    assert_eq!(fare.breakdown.drom_supplement, 3.0);
    assert_eq!(fare.breakdown.shared_discount_rate, 0.37);
    assert_eq!(fare.breakdown.shared_discount_amount, 43.11);
    assert_eq!(fare.breakdown.total, 76.41);
}

#[test]
fn markups_do_not_add_up() {
    let calculator = MedicalCalculator::new("85");

    let short = calculator.calculate(&day_trip(30.0).kind(TransportKind::Hospitalization));
    assert_eq!(short.breakdown.markup_rate, 0.25);
    assert_eq!(short.breakdown.markup_label, "hospitalisation (<50km)");
    assert_eq!(short.breakdown.markup_amount, 10.21);
    assert_eq!(short.breakdown.total, 51.02);

    let long = calculator.calculate(&day_trip(50.0).kind(TransportKind::Hospitalization));
    assert_eq!(long.breakdown.markup_rate, 0.5);
    assert_eq!(long.breakdown.markup_label, "hospitalisation (>=50km)");

    let night_short = calculator.calculate(
        &day_trip(30.0)
            .kind(TransportKind::Hospitalization)
            .night(true),
    );
    assert_eq!(night_short.breakdown.markup_label, "nuit/weekend");
    assert_eq!(night_short.breakdown.total, 61.23);

    // Equal rates: night was considered first and stays
    let night_long = calculator.calculate(
        &day_trip(60.0)
            .kind(TransportKind::Hospitalization)
            .night(true),
    );
    assert_eq!(night_long.breakdown.markup_rate, 0.5);
    assert_eq!(night_long.breakdown.markup_label, "nuit/weekend");
    assert_eq!(night_long.breakdown.markup_amount, 36.46);
    assert_eq!(night_long.breakdown.total, 109.38);
}

#[test]
fn night_boundaries_are_inclusive() {
    let calculator = MedicalCalculator::new("85");
    let markup_at = |time: NaiveDateTime| {
        calculator
            .calculate(&MedicalTrip::new(30.0).at(time))
            .breakdown
            .markup_rate
    };

    assert_eq!(markup_at(at(2025, 1, 15, 20, 0, 0)), 0.5);
    assert_eq!(markup_at(at(2025, 1, 15, 8, 0, 0)), 0.5);
    assert_eq!(markup_at(at(2025, 1, 15, 8, 0, 1)), 0.0);
    assert_eq!(markup_at(at(2025, 1, 15, 19, 59, 59)), 0.0);
    // The taxi night starts an hour earlier
    assert_eq!(markup_at(at(2025, 1, 15, 19, 0, 0)), 0.0);
    // Sunday
    assert_eq!(markup_at(at(2025, 1, 19, 12, 0, 0)), 0.5);
}

#[test]
fn explicit_flag_overrides_the_timestamp() {
    let calculator = MedicalCalculator::new("85");

    let forced_day = calculator.calculate(&MedicalTrip::new(30.0).at(at(2025, 1, 15, 22, 0, 0)).night(false));
    assert_eq!(forced_day.breakdown.markup_rate, 0.0);
    assert_eq!(forced_day.breakdown.total, 40.82);

    let forced_night = calculator.calculate(&day_trip(30.0).night(true));
    assert_eq!(forced_night.breakdown.markup_rate, 0.5);
}

#[test]
fn missing_timestamp_reads_the_clock() {
    use chrono::{TimeZone, Utc};
    // 21:00 UTC is 22:00 in Paris in winter
    let clock = CivilClock::default().with_clock(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 1, 15, 21, 0, 0).unwrap(),
    ));
    let fare = MedicalCalculator::new("85")
        .with_clock(clock)
        .calculate(&MedicalTrip::new(30.0));
    assert_eq!(fare.breakdown.markup_label, "nuit/weekend");
    assert_eq!(fare.transported_at.to_rfc3339(), "2025-01-15T22:00:00+01:00");
}

#[test]
fn cached_quotes_match_fresh_ones() {
    let cache = Arc::new(QuoteCache::new(16));
    let cached = MedicalCalculator::new("85").with_cache(cache.clone());
    let fresh = MedicalCalculator::new("85");
    let trip = day_trip(42.0)
        .between("Nantes", "")
        .kind(TransportKind::Hospitalization)
        .patients(3)
        .tolls(2.3);

    let first = cached.calculate(&trip);
    let second = cached.calculate(&trip);
    assert_eq!(first, second);
    assert_eq!(first, fresh.calculate(&trip));
    assert_eq!(cache.len(), 1);

    // Department is part of the key
    let other = MedicalCalculator::new("93").with_cache(cache.clone());
    let _ = other.calculate(&trip);
    assert_eq!(cache.len(), 2);
}

#[test]
fn shared_cache_keeps_tariff_tables_apart() {
    let cache = Arc::new(QuoteCache::new(16));
    let trip = day_trip(30.0);

    let standard = MedicalCalculator::new("85").with_cache(cache.clone());
    assert_eq!(standard.calculate(&trip).breakdown.total, 40.82);

    let custom = Arc::new(Tariffs {
        intake_fee: 100.0,
        ..Tariffs::default()
    });
    let fresh = MedicalCalculator::new("85").with_tariffs(custom.clone());
    let cached = MedicalCalculator::new("85")
        .with_tariffs(custom)
        .with_cache(cache.clone());
    assert_eq!(fresh.calculate(&trip).breakdown.total, 127.82);
    assert_eq!(cached.calculate(&trip), fresh.calculate(&trip));
    assert_eq!(cache.len(), 2);

    assert_eq!(standard.calculate(&trip).breakdown.total, 40.82);
}

#[test]
fn unknown_department_uses_default_rate() {
    let fare = MedicalCalculator::new("44").calculate(&day_trip(14.0));
    assert_eq!(fare.breakdown.rate_per_km, 1.07);
    assert_eq!(fare.breakdown.kilometric_cost, 10.7);
}

#[test]
fn free_function_matches_calculator() {
    let fare = calculate_medical_fare(
        30.0,
        "La Roche sur Yon",
        "Nantes",
        Some(true),
        Some(Timestamp::from(weekday_noon())),
        TransportKind::Simple,
        2,
        true,
        5.5,
        DEFAULT_DEPARTMENT,
    );
    assert_eq!(fare.breakdown.total, 157.54);
}
