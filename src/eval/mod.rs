pub mod evaluator;

pub use evaluator::{binary_accuracy, evaluate, Evaluation};
