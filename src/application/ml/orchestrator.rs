use super::attribution::{AttributionRanker, DEFAULT_TOP_K};
use super::inference::InferenceAdapter;
use super::window::WindowReconstructor;
use crate::domain::errors::RatingError;
use crate::domain::market::price_series::PriceSeries;
use crate::domain::ml::artifacts::ModelContext;
use crate::domain::ml::feature_registry::{FeatureVector, StaticFeatures};
use crate::domain::rating::{DayRecord, PredictionResult};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything one symbol's day series is computed from.
#[derive(Debug, Clone)]
pub struct SeriesRequest<'a> {
    pub symbol: &'a str,
    pub static_features: StaticFeatures,
    pub prices: &'a PriceSeries,
    /// Window ends the day before this date.
    pub as_of: NaiveDate,
}

/// Drives window reconstruction, inference and attribution once per day.
///
/// Days are independent: the only state shared between them is the static
/// feature snapshot and the read-only model context.
pub struct DaySeriesOrchestrator {
    ctx: Arc<ModelContext>,
    window: WindowReconstructor,
    top_k: usize,
}

impl DaySeriesOrchestrator {
    pub fn new(ctx: Arc<ModelContext>, lookback_days: u32, top_k: usize) -> Self {
        Self {
            ctx,
            window: WindowReconstructor::new(lookback_days),
            top_k,
        }
    }

    pub fn with_defaults(ctx: Arc<ModelContext>) -> Self {
        Self::new(ctx, WindowReconstructor::default().lookback_days(), DEFAULT_TOP_K)
    }

    pub fn lookback_days(&self) -> u32 {
        self.window.lookback_days()
    }

    pub fn run(&self, request: &SeriesRequest<'_>) -> Result<PredictionResult, RatingError> {
        let inference = InferenceAdapter::new(&self.ctx);
        let ranker = AttributionRanker::new(self.ctx.explainer.as_ref());

        let days = self.window.reconstruct(request.prices, request.as_of);
        let skipped = self.window.lookback_days() as usize - days.len();
        if skipped > 0 {
            warn!(
                "{}: {} of {} days skipped for insufficient price history",
                request.symbol,
                skipped,
                self.window.lookback_days()
            );
        }

        let mut history = Vec::with_capacity(days.len());
        for day in days {
            let features =
                FeatureVector::from_parts(&request.static_features, day.volatility, day.momentum);
            let outcome = inference.infer(&features)?;
            let ranked = ranker.rank(&outcome.scaled, outcome.class_index)?;

            debug!(
                "{} {}: rating={} confidence={:?} top={:?}",
                request.symbol,
                day.date,
                outcome.label,
                outcome.confidence,
                ranked.top(1).first().map(|c| c.feature)
            );

            history.push(DayRecord {
                date: day.date,
                predicted_rating: outcome.label,
                class_index: outcome.class_index,
                confidence: outcome.confidence,
                volatility: day.volatility,
                momentum: day.momentum,
                ranked_contributions: ranked.into_vec(),
                top_k: self.top_k,
            });
        }

        info!(
            "{}: {} day records as of {}",
            request.symbol,
            history.len(),
            request.as_of
        );

        Ok(PredictionResult {
            symbol: request.symbol.to_string(),
            as_of: request.as_of,
            history,
            static_features: request.static_features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ModelError;
    use crate::domain::market::price_series::PricePoint;
    use crate::domain::ml::feature_registry::FEATURE_COUNT;
    use crate::infrastructure::mock::{
        MockClassifier, MockExplainer, MockLabelDecoder, MockScaler,
    };
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx(classifier: MockClassifier) -> Arc<ModelContext> {
        Arc::new(ModelContext::new(
            Arc::new(MockScaler::identity()),
            Arc::new(classifier),
            Arc::new(MockLabelDecoder::new(vec![3, 4, 5])),
            Arc::new(MockExplainer::proportional()),
        ))
    }

    fn rising_series(start: NaiveDate, n: usize) -> PriceSeries {
        let points = (0..n)
            .map(|i| PricePoint::new(start + Duration::days(i as i64), 100.0 + i as f64))
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    #[test]
    fn test_full_window_produces_chronological_records() {
        let prices = rising_series(date(2025, 1, 1), 120);
        let orchestrator = DaySeriesOrchestrator::with_defaults(ctx(
            MockClassifier::fixed(1).with_probabilities(vec![0.2, 0.5, 0.3]),
        ));
        let request = SeriesRequest {
            symbol: "TEST",
            static_features: StaticFeatures::default(),
            prices: &prices,
            as_of: date(2025, 4, 1),
        };

        let result = orchestrator.run(&request).unwrap();
        assert_eq!(result.history.len(), 30);
        assert!(result.history.windows(2).all(|w| w[0].date < w[1].date));
        for record in &result.history {
            assert_eq!(record.predicted_rating, 4);
            assert_eq!(record.confidence, Some(0.5));
            assert_eq!(record.ranked_contributions.len(), FEATURE_COUNT);
            assert_eq!(record.top_contributions().len(), 3);
        }
    }

    #[test]
    fn test_days_are_independent_of_each_other() {
        let prices = rising_series(date(2025, 3, 1), 20);
        let orchestrator = DaySeriesOrchestrator::new(ctx(MockClassifier::fixed(0)), 10, 3);
        let as_of = date(2025, 3, 25);

        let full = orchestrator
            .run(&SeriesRequest {
                symbol: "TEST",
                static_features: StaticFeatures::default(),
                prices: &prices,
                as_of,
            })
            .unwrap();
        let shorter = DaySeriesOrchestrator::new(ctx(MockClassifier::fixed(0)), 3, 3)
            .run(&SeriesRequest {
                symbol: "TEST",
                static_features: StaticFeatures::default(),
                prices: &prices,
                as_of,
            })
            .unwrap();

        assert_eq!(&full.history[7..], &shorter.history[..]);
    }

    #[test]
    fn test_artifact_failure_aborts_request() {
        let prices = rising_series(date(2025, 3, 1), 20);
        let orchestrator = DaySeriesOrchestrator::with_defaults(ctx(MockClassifier::failing()));
        let result = orchestrator.run(&SeriesRequest {
            symbol: "TEST",
            static_features: StaticFeatures::default(),
            prices: &prices,
            as_of: date(2025, 3, 25),
        });
        assert!(matches!(
            result,
            Err(RatingError::Model(ModelError::InferenceFailed { .. }))
        ));
    }
}
