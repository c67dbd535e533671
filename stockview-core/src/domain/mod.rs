//! Domain types for stockview

pub mod bar;
pub mod info;
pub mod period;

pub use bar::{PriceBar, PriceSeries, SeriesError};
pub use info::{InfoRecord, InfoValue};
pub use period::{Period, PeriodError};

/// Trim and upper-case a user-supplied ticker. Returns `None` when nothing is left.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        None
    } else {
        Some(symbol)
    }
}
