pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;
pub mod eval;
pub mod config;
pub mod error;
pub mod pipeline;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::{Layer, Mode};
pub use network::{build_robust_classifier, Network, NetworkSpec};
pub use loss::LossType;
pub use optim::{Adam, Optimizer, OptimizerKind, Sgd};
pub use data::{Dataset, MinMaxScaler, Splits};
pub use train::{train_loop, Checkpoint, EpochStats, History, TrainConfig};
pub use eval::{evaluate, Evaluation};
pub use config::PipelineConfig;
pub use error::{NnError, Result};
pub use pipeline::{run, PipelineReport};
