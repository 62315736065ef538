use serde::{Deserialize, Serialize};

/// One trading day: exchange-local calendar date and a positive finite close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: String,
    pub close: f64,
}

/// Chronological daily closes, in source order.
pub type PriceSeries = Vec<PriceRow>;

pub fn closes(series: &[PriceRow]) -> Vec<f64> {
    series.iter().map(|row| row.close).collect()
}
