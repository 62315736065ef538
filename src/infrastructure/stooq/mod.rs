pub mod price_csv;
pub mod provider;

pub use price_csv::PriceCsvParser;
pub use provider::{DEFAULT_STOOQ_BASE_URL, StooqSentimentProvider};
