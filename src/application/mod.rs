// Market data processing
pub mod market_data;

// Inference pipeline: window, model, attribution, day series
pub mod ml;

// Request-level composition
pub mod rating_service;
