//! In-process collaborators and artifacts for tests and offline runs.

use crate::domain::errors::{MarketDataError, ModelError};
use crate::domain::market::fundamentals::{FundamentalsSnapshot, MacroSnapshot};
use crate::domain::market::price_series::PriceSeries;
use crate::domain::ml::artifacts::{
    Attribution, AttributionExplainer, Classifier, LabelDecoder, Scaler,
};
use crate::domain::ml::feature_registry::FEATURE_COUNT;
use crate::domain::ports::{MacroDataProvider, MarketDataProvider, SentimentLookup};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

// ===== Collaborators =====

#[derive(Debug, Default)]
pub struct MockMarketDataProvider {
    fundamentals: HashMap<String, FundamentalsSnapshot>,
    prices: HashMap<String, PriceSeries>,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl MockMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol(
        mut self,
        symbol: &str,
        fundamentals: FundamentalsSnapshot,
        prices: PriceSeries,
    ) -> Self {
        self.fundamentals.insert(symbol.to_string(), fundamentals);
        self.prices.insert(symbol.to_string(), prices);
        self
    }

    /// Every fetch fails as an upstream outage.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn check(&self, symbol: &str) -> Result<(), MarketDataError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(reason) = &self.fail_with {
            return Err(MarketDataError::Upstream {
                source_name: "mock market data".to_string(),
                reason: reason.clone(),
            });
        }
        if !self.prices.contains_key(symbol) {
            return Err(MarketDataError::InvalidSymbol {
                symbol: symbol.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketDataProvider {
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalsSnapshot, MarketDataError> {
        self.check(symbol)?;
        Ok(self.fundamentals.get(symbol).cloned().unwrap_or_default())
    }

    async fn fetch_price_history(&self, symbol: &str) -> Result<PriceSeries, MarketDataError> {
        self.check(symbol)?;
        Ok(self.prices.get(symbol).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockMacroDataProvider {
    snapshot: MacroSnapshot,
    fail_with: Option<String>,
}

impl MockMacroDataProvider {
    pub fn new(snapshot: MacroSnapshot) -> Self {
        Self {
            snapshot,
            fail_with: None,
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            snapshot: MacroSnapshot::default(),
            fail_with: Some(reason.to_string()),
        }
    }
}

#[async_trait]
impl MacroDataProvider for MockMacroDataProvider {
    async fn fetch_macro(&self) -> Result<MacroSnapshot, MarketDataError> {
        if let Some(reason) = &self.fail_with {
            return Err(MarketDataError::Upstream {
                source_name: "mock macro data".to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.snapshot)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockSentimentTable {
    scores: HashMap<String, Option<f64>>,
}

impl MockSentimentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(mut self, symbol: &str, score: f64) -> Self {
        self.scores.insert(symbol.to_lowercase(), Some(score));
        self
    }

    /// A record exists for the symbol but its latest score is blank.
    pub fn with_blank_score(mut self, symbol: &str) -> Self {
        self.scores.insert(symbol.to_lowercase(), None);
        self
    }
}

impl SentimentLookup for MockSentimentTable {
    fn sentiment_for(&self, symbol: &str) -> Option<f64> {
        self.scores
            .get(&symbol.to_lowercase())
            .copied()
            .unwrap_or(Some(0.0))
    }
}

// ===== Artifacts =====

fn check_width(artifact: &str, expected: usize, actual: usize) -> Result<(), ModelError> {
    if expected != actual {
        return Err(ModelError::SchemaMismatch {
            artifact: artifact.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Passes values through, optionally dropping trailing slots to simulate drift.
#[derive(Debug, Clone)]
pub struct MockScaler {
    width: usize,
}

impl MockScaler {
    pub fn identity() -> Self {
        Self {
            width: FEATURE_COUNT,
        }
    }

    pub fn truncating(width: usize) -> Self {
        Self { width }
    }
}

impl Scaler for MockScaler {
    fn n_features(&self) -> usize {
        self.width
    }

    fn transform(&self, raw: &[Option<f64>]) -> Result<Vec<Option<f64>>, ModelError> {
        Ok(raw.iter().take(self.width).copied().collect())
    }
}

#[derive(Debug, Clone)]
pub struct MockClassifier {
    class_index: usize,
    probabilities: Option<Vec<f64>>,
    fail: bool,
}

impl MockClassifier {
    /// Always predicts `class_index`, without probabilities.
    pub fn fixed(class_index: usize) -> Self {
        Self {
            class_index,
            probabilities: None,
            fail: false,
        }
    }

    pub fn with_probabilities(mut self, probabilities: Vec<f64>) -> Self {
        self.probabilities = Some(probabilities);
        self
    }

    pub fn failing() -> Self {
        Self {
            class_index: 0,
            probabilities: None,
            fail: true,
        }
    }
}

impl Classifier for MockClassifier {
    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict_class_index(&self, scaled: &[Option<f64>]) -> Result<usize, ModelError> {
        check_width("mock classifier", FEATURE_COUNT, scaled.len())?;
        if self.fail {
            return Err(ModelError::InferenceFailed {
                reason: "mock classifier failure".to_string(),
            });
        }
        Ok(self.class_index)
    }

    fn supports_confidence(&self) -> bool {
        self.probabilities.is_some()
    }

    fn predict_probabilities(&self, _scaled: &[Option<f64>]) -> Result<Option<Vec<f64>>, ModelError> {
        Ok(self.probabilities.clone())
    }

    fn name(&self) -> &str {
        "Mock Classifier"
    }
}

#[derive(Debug, Clone)]
pub struct MockLabelDecoder {
    labels: Vec<i64>,
}

impl MockLabelDecoder {
    pub fn new(labels: Vec<i64>) -> Self {
        Self { labels }
    }
}

impl LabelDecoder for MockLabelDecoder {
    fn n_classes(&self) -> usize {
        self.labels.len()
    }

    fn decode(&self, class_index: usize) -> Result<i64, ModelError> {
        self.labels
            .get(class_index)
            .copied()
            .ok_or(ModelError::UnknownClass {
                index: class_index,
                n_classes: self.labels.len(),
            })
    }
}

#[derive(Debug, Clone)]
pub enum MockExplainer {
    /// Contribution equals the normalized value; undefined slots contribute 0.
    Proportional,
    Fixed(Attribution),
}

impl MockExplainer {
    pub fn proportional() -> Self {
        MockExplainer::Proportional
    }

    pub fn fixed(attribution: Attribution) -> Self {
        MockExplainer::Fixed(attribution)
    }
}

impl AttributionExplainer for MockExplainer {
    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn explain(&self, scaled: &[Option<f64>]) -> Result<Attribution, ModelError> {
        match self {
            MockExplainer::Proportional => Ok(Attribution::Single(
                scaled.iter().map(|v| v.unwrap_or(0.0)).collect(),
            )),
            MockExplainer::Fixed(attribution) => Ok(attribution.clone()),
        }
    }
}
