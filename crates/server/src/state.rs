use std::sync::Arc;

use tarifa::prelude::*;

use crate::config::Config;

pub struct AppState {
    pub clock: CivilClock,
    pub taxi: TaxiCalculator,
    pub tariffs: Arc<Tariffs>,
    pub quotes: Arc<QuoteCache>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, CivilClock::new(config.timezone))
    }

    pub fn with_clock(config: &Config, clock: CivilClock) -> Self {
        Self {
            taxi: TaxiCalculator::new().with_clock(clock.clone()),
            tariffs: Arc::new(Tariffs::default()),
            quotes: Arc::new(QuoteCache::new(config.cache_size)),
            clock,
        }
    }

    /// Calculators are bound to one department, so one is built per request.
    pub fn medical(&self, department: &str) -> MedicalCalculator {
        MedicalCalculator::new(department)
            .with_tariffs(self.tariffs.clone())
            .with_clock(self.clock.clone())
            .with_cache(self.quotes.clone())
    }
}
