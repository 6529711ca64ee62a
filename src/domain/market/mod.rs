// Market data domain
pub mod fundamentals;
pub mod price_series;
