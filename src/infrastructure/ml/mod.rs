pub mod classifier;
pub mod explainer;
pub mod label_encoder;
pub mod scaler;
pub mod store;

pub use classifier::ClassifierArtifact;
pub use explainer::ExplainerArtifact;
pub use label_encoder::LabelEncoder;
pub use scaler::StandardScaler;
pub use store::ArtifactStore;
