pub mod artifacts;
pub mod feature_registry;
