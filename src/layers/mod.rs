pub mod activation;
pub mod batch_norm;
pub mod dense;
pub mod dropout;
pub mod layer;

use rand::rngs::StdRng;

pub use activation::ActivationLayer;
pub use batch_norm::BatchNorm;
pub use dense::Dense;
pub use dropout::Dropout;
pub use layer::Layer;

/// Whether a forward pass is part of training.
///
/// Training mode carries the RNG that drives dropout masks; batch
/// normalization switches between batch and running statistics on it.
pub enum Mode<'a> {
    Train(&'a mut StdRng),
    Eval,
}

impl Mode<'_> {
    pub fn is_training(&self) -> bool {
        matches!(self, Mode::Train(_))
    }

    /// Re-borrows the mode so it can be passed to several layers in turn.
    pub fn reborrow(&mut self) -> Mode<'_> {
        match self {
            Mode::Train(rng) => Mode::Train(&mut **rng),
            Mode::Eval => Mode::Eval,
        }
    }
}
