use serde::Deserialize;

// ===== Chart (price history) =====

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default)]
    pub gmtoffset: i64,
    pub symbol: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct YahooError {
    pub code: Option<String>,
    pub description: Option<String>,
}

impl YahooError {
    pub fn describe(&self) -> String {
        format!(
            "{}: {}",
            self.code.as_deref().unwrap_or("error"),
            self.description.as_deref().unwrap_or("no description")
        )
    }
}

// ===== Quote summary (fundamentals) =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryEnvelope {
    pub quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryBody {
    pub result: Option<Vec<QuoteSummaryResult>>,
    pub error: Option<YahooError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResult {
    #[serde(default)]
    pub financial_data: FinancialData,
    #[serde(default)]
    pub balance_sheet_history: BalanceSheetHistory,
}

/// Yahoo wraps every number as `{"raw": 1.23, "fmt": "1.23"}`, or `{}` when absent.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawValue {
    pub raw: Option<f64>,
}

pub fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| !v.is_nan())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    pub current_ratio: Option<RawValue>,
    pub quick_ratio: Option<RawValue>,
    pub debt_to_equity: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetHistory {
    #[serde(default)]
    pub balance_sheet_statements: Vec<BalanceSheetStatement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetStatement {
    pub cash: Option<RawValue>,
    pub total_current_liabilities: Option<RawValue>,
    pub total_assets: Option<RawValue>,
    pub total_liab: Option<RawValue>,
}
