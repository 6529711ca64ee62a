use crate::domain::ports::SentimentLookup;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct SentimentRecord {
    company_name: String,
    rating_date: String,
    sentiment_proxy: Option<f64>,
}

/// Sentiment proxy per company, keyed case-insensitively.
///
/// Only the row with the latest `rating_date` is kept per company; ISO dates
/// compare correctly as strings, and a later row wins a tie. A blank or
/// non-finite score on that row is kept as undefined.
#[derive(Debug, Clone, Default)]
pub struct CsvSentimentTable {
    latest: HashMap<String, (String, Option<f64>)>,
}

impl CsvSentimentTable {
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open sentiment table {:?}", path))?;
        let table = Self::from_reader(file)
            .with_context(|| format!("Failed to parse sentiment table {:?}", path))?;
        info!(
            "Loaded sentiment for {} companies from {:?}",
            table.len(),
            path
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut latest: HashMap<String, (String, Option<f64>)> = HashMap::new();

        for (line, record) in rdr.deserialize::<SentimentRecord>().enumerate() {
            let record = record.with_context(|| format!("Invalid sentiment row {}", line + 2))?;
            let score = record.sentiment_proxy.filter(|s| s.is_finite());
            if score.is_none() {
                debug!("Sentiment row {} has no score", line + 2);
            }

            let key = record.company_name.to_lowercase();
            let newer = latest
                .get(&key)
                .is_none_or(|(date, _)| record.rating_date >= *date);
            if newer {
                latest.insert(key, (record.rating_date, score));
            }
        }

        Ok(Self { latest })
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

impl SentimentLookup for CsvSentimentTable {
    fn sentiment_for(&self, symbol: &str) -> Option<f64> {
        match self.latest.get(&symbol.to_lowercase()) {
            Some((date, score)) => {
                debug!("Sentiment for {}: {:?} (rated {})", symbol, score, date);
                *score
            }
            None => {
                warn!("No sentiment record for {}, defaulting to 0.0", symbol);
                Some(0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
company_name,rating_date,sentiment_proxy
AAPL,2024-01-15,0.10
aapl,2024-06-30,0.35
AAPL,2024-03-01,-0.20
MSFT,2024-02-01,
MSFT,2023-12-01,0.05
ACME,2023-01-01,0.9
ACME,2024-06-30,
JBHT,2024-05-05,-0.4
JBHT,2024-05-05,-0.1
";

    #[test]
    fn test_latest_rating_date_wins() {
        let table = CsvSentimentTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.sentiment_for("AAPL"), Some(0.35));
        assert_eq!(table.sentiment_for("Aapl"), Some(0.35));
    }

    #[test]
    fn test_blank_latest_score_is_undefined() {
        let table = CsvSentimentTable::from_reader(CSV.as_bytes()).unwrap();
        // An older score never stands in for a blank latest row
        assert_eq!(table.sentiment_for("msft"), None);
        assert_eq!(table.sentiment_for("ACME"), None);
    }

    #[test]
    fn test_later_row_wins_tie() {
        let table = CsvSentimentTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.sentiment_for("JBHT"), Some(-0.1));
    }

    #[test]
    fn test_unknown_symbol_defaults_to_zero() {
        let table = CsvSentimentTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.sentiment_for("TSLA"), Some(0.0));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_malformed_score_is_an_error() {
        let bad = "company_name,rating_date,sentiment_proxy\nAAPL,2024-01-01,abc\n";
        assert!(CsvSentimentTable::from_reader(bad.as_bytes()).is_err());
    }
}
