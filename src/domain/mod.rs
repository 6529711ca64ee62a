// Domain-specific error types
pub mod errors;

// Fundamentals, macro snapshots and price history
pub mod market;

// Feature schema and model artifact traits
pub mod ml;

// Port interfaces
pub mod ports;

// Rating results
pub mod rating;
