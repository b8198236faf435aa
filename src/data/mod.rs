pub mod dataset;
pub mod normalize;
pub mod split;
pub mod synth;

pub use dataset::Dataset;
pub use normalize::MinMaxScaler;
pub use split::{three_way_split, train_test_split, Splits};
pub use synth::synthesize;
