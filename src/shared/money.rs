/// Rounds a figure to two decimals for presentation.
///
/// Rounding goes through exact decimal formatting of the binary value;
/// scaling by 100 first would turn 10.205 (stored slightly above) into 10.20.
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

#[test]
fn round_cents_test() {
    assert_eq!(round_cents(60.473_333_333_333_336), 60.47);
    assert_eq!(round_cents(2.946), 2.95);
    assert_eq!(round_cents(40.82 * 0.25), 10.21);
    assert_eq!(round_cents(8.0), 8.0);
    assert_eq!(round_cents(0.0), 0.0);
}
