//! Regulated transport tariffs: Vendée taxi fares and CPAM medical transport
//! reimbursement. Both calculators are pure and safe to share between threads.

pub mod cpam;
pub mod shared;
pub mod taxi;

pub mod prelude {
    pub use crate::cpam::{
        Breakdown, DEFAULT_DEPARTMENT, MedicalCalculator, MedicalFare, MedicalTrip, QuoteCache,
        Tariffs, TransportKind, calculate_medical_fare,
    };
    pub use crate::shared::{
        cache::Memo,
        money::round_cents,
        time::{CivilClock, Clock, DEFAULT_TIMEZONE, FixedClock, SystemClock, Timestamp},
    };
    pub use crate::taxi::{
        Period, Rates, Tariff, TaxiCalculator, TaxiEstimate, TaxiFare, TaxiTrip,
        calculate_taxi_fare,
    };
}
