use serde::{Deserialize, Serialize};

/// Point-in-time balance-sheet snapshot for one company.
/// Any field the provider could not report is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsSnapshot {
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub cash: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub debt_to_equity: Option<f64>,
}

/// Latest macroeconomic indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroSnapshot {
    pub gdp: Option<f64>,
    pub interest_rate: Option<f64>,
    /// Year-over-year CPI change, in percent.
    pub inflation: Option<f64>,
}
