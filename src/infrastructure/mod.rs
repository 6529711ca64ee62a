pub mod core;
pub mod fred;
pub mod ml;
pub mod mock;
pub mod sentiment;
pub mod yahoo;

pub use fred::FredMacroProvider;
pub use sentiment::CsvSentimentTable;
pub use yahoo::YahooMarketDataProvider;
