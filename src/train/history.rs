use serde::{Serialize, Deserialize};

use crate::train::epoch_stats::EpochStats;

/// Everything `train_loop` recorded, one entry per completed epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub epochs: Vec<EpochStats>,
    /// True when a callback ended training before `epochs` was reached.
    pub stopped_early: bool,
}

impl History {
    pub fn last(&self) -> Option<&EpochStats> {
        self.epochs.last()
    }

    pub fn final_val_loss(&self) -> Option<f64> {
        self.last().and_then(|s| s.val_loss)
    }

    /// Lowest validation loss seen, with its 1-based epoch.
    pub fn best_val_loss(&self) -> Option<(usize, f64)> {
        self.epochs.iter()
            .filter_map(|s| s.val_loss.map(|l| (s.epoch, l)))
            .filter(|(_, loss)| !loss.is_nan())
            .fold(None, |best, (epoch, loss)| match best {
                Some((_, b)) if b <= loss => best,
                _ => Some((epoch, loss)),
            })
    }
}
