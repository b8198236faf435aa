pub mod builder;
pub mod metadata;
pub mod network;
pub mod spec;

pub use builder::{build_robust_classifier, robust_classifier_spec};
pub use metadata::ModelMetadata;
pub use network::Network;
pub use spec::{NetworkSpec, LayerSpec};
