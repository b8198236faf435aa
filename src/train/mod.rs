pub mod callbacks;
pub mod checkpoint;
pub mod epoch_stats;
pub mod history;
pub mod loop_fn;
pub mod train_config;

pub use callbacks::{
    Callback, CallbackAction, EarlyStopping, EpochContext, ModelCheckpoint, ReduceLrOnPlateau,
};
pub use checkpoint::Checkpoint;
pub use epoch_stats::EpochStats;
pub use history::History;
pub use loop_fn::train_loop;
pub use train_config::TrainConfig;
