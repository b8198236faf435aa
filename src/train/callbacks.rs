//! Training callbacks: early stopping, checkpointing, learning-rate reduction.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::Result;
use crate::network::metadata::ModelMetadata;
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;
use crate::optim::Optimizer;
use crate::train::checkpoint::Checkpoint;
use crate::train::epoch_stats::EpochStats;

/// Action a callback can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Continue,
    Stop,
}

/// Reads the validation loss every callback monitors, warning when the loop
/// runs without a validation set.
fn monitored(stats: &EpochStats, callback: &str) -> Option<f64> {
    if stats.val_loss.is_none() {
        warn!(callback, "val_loss is not available, skipping");
    }
    stats.val_loss
}

/// State handed to callbacks after each epoch.
pub struct EpochContext<'a> {
    pub stats: &'a EpochStats,
    pub network: &'a Network,
    pub optimizer: &'a mut dyn Optimizer,
}

/// Trait for training callbacks.
pub trait Callback {
    /// Called at the end of each epoch, after validation.
    fn on_epoch_end(&mut self, ctx: &mut EpochContext<'_>) -> Result<CallbackAction>;

    /// Called once when the loop exits, however it exits.
    fn on_train_end(&mut self, _network: &mut Network) -> Result<()> {
        Ok(())
    }
}

/// Stops training once `val_loss` has not improved for `patience` epochs,
/// optionally rolling the network back to its best epoch.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    pub patience: usize,
    pub min_delta: f64,
    pub restore_best_weights: bool,
    wait: usize,
    best: f64,
    best_epoch: Option<usize>,
    best_weights: Option<Network>,
    stopped_epoch: Option<usize>,
}

impl EarlyStopping {
    pub fn new(patience: usize, restore_best_weights: bool) -> Self {
        Self {
            patience,
            min_delta: 0.0,
            restore_best_weights,
            wait: 0,
            best: f64::INFINITY,
            best_epoch: None,
            best_weights: None,
            stopped_epoch: None,
        }
    }

    pub fn best_epoch(&self) -> Option<usize> {
        self.best_epoch
    }

    pub fn stopped_epoch(&self) -> Option<usize> {
        self.stopped_epoch
    }
}

impl Callback for EarlyStopping {
    fn on_epoch_end(&mut self, ctx: &mut EpochContext<'_>) -> Result<CallbackAction> {
        let Some(current) = monitored(ctx.stats, "early_stopping") else {
            return Ok(CallbackAction::Continue);
        };

        if current < self.best - self.min_delta {
            self.best = current;
            self.best_epoch = Some(ctx.stats.epoch);
            self.wait = 0;
            if self.restore_best_weights {
                self.best_weights = Some(ctx.network.clone());
            }
            return Ok(CallbackAction::Continue);
        }

        self.wait += 1;
        if self.wait >= self.patience {
            self.stopped_epoch = Some(ctx.stats.epoch);
            info!(epoch = ctx.stats.epoch, "early stopping");
            return Ok(CallbackAction::Stop);
        }
        Ok(CallbackAction::Continue)
    }

    fn on_train_end(&mut self, network: &mut Network) -> Result<()> {
        if !self.restore_best_weights {
            return Ok(());
        }
        if let Some(best) = self.best_weights.take() {
            info!(epoch = ?self.best_epoch, "restoring model weights from the end of the best epoch");
            *network = best;
        }
        Ok(())
    }
}

/// Writes a `Checkpoint` to `path` whenever `val_loss` reaches a new minimum.
#[derive(Debug, Clone)]
pub struct ModelCheckpoint {
    pub path: PathBuf,
    pub description: Option<String>,
    architecture: NetworkSpec,
    best: f64,
    saves: usize,
}

impl ModelCheckpoint {
    pub fn new(path: impl Into<PathBuf>, architecture: NetworkSpec) -> Self {
        Self {
            path: path.into(),
            description: None,
            architecture,
            best: f64::INFINITY,
            saves: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// How many times the checkpoint file has been written.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Callback for ModelCheckpoint {
    fn on_epoch_end(&mut self, ctx: &mut EpochContext<'_>) -> Result<CallbackAction> {
        let Some(current) = monitored(ctx.stats, "model_checkpoint") else {
            return Ok(CallbackAction::Continue);
        };

        if current < self.best {
            info!(
                epoch = ctx.stats.epoch,
                "val_loss improved from {:.5} to {:.5}, saving model to {}",
                self.best, current, self.path.display()
            );
            let metadata = ModelMetadata {
                description: self.description.clone(),
                architecture: self.architecture.clone(),
                epoch: ctx.stats.epoch,
                val_loss: current,
                learning_rate: ctx.stats.learning_rate,
            };
            Checkpoint::write(&self.path, &metadata, ctx.network)?;
            self.best = current;
            self.saves += 1;
        } else {
            info!(epoch = ctx.stats.epoch, "val_loss did not improve from {:.5}", self.best);
        }
        Ok(CallbackAction::Continue)
    }
}

/// Multiplies the learning rate by `factor` once `val_loss` has not improved
/// by more than `min_delta` for `patience` epochs, never going below `min_lr`.
#[derive(Debug, Clone)]
pub struct ReduceLrOnPlateau {
    pub factor: f64,
    pub patience: usize,
    pub min_lr: f64,
    pub min_delta: f64,
    wait: usize,
    best: f64,
}

impl ReduceLrOnPlateau {
    pub fn new(factor: f64, patience: usize, min_lr: f64) -> Self {
        Self {
            factor,
            patience,
            min_lr,
            min_delta: 1e-4,
            wait: 0,
            best: f64::INFINITY,
        }
    }
}

impl Callback for ReduceLrOnPlateau {
    fn on_epoch_end(&mut self, ctx: &mut EpochContext<'_>) -> Result<CallbackAction> {
        let Some(current) = monitored(ctx.stats, "reduce_lr_on_plateau") else {
            return Ok(CallbackAction::Continue);
        };

        if current < self.best - self.min_delta {
            self.best = current;
            self.wait = 0;
            return Ok(CallbackAction::Continue);
        }

        self.wait += 1;
        if self.wait >= self.patience {
            let old_lr = ctx.optimizer.learning_rate();
            if old_lr > self.min_lr {
                let new_lr = (old_lr * self.factor).max(self.min_lr);
                ctx.optimizer.set_learning_rate(new_lr);
                info!(epoch = ctx.stats.epoch, "reducing learning rate to {:e}", new_lr);
                self.wait = 0;
            }
        }
        Ok(CallbackAction::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::builder::{build_robust_classifier, robust_classifier_spec};
    use crate::optim::Sgd;
    use rand::{rngs::StdRng, SeedableRng};

    fn stats(epoch: usize, val_loss: Option<f64>) -> EpochStats {
        EpochStats {
            epoch,
            total_epochs: 100,
            train_loss: 1.0,
            train_accuracy: 0.5,
            val_loss,
            val_accuracy: val_loss.map(|_| 0.5),
            learning_rate: 0.1,
            elapsed_ms: 0,
        }
    }

    fn network(seed: u64) -> Network {
        build_robust_classifier(3, 0.0, 0.0, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    /// Feeds `losses` to `cb` one epoch at a time, returning the actions and
    /// the learning rate after each epoch.
    fn drive(cb: &mut dyn Callback, net: &Network, opt: &mut Sgd, losses: &[f64]) -> Vec<(CallbackAction, f64)> {
        losses.iter().enumerate().map(|(i, &loss)| {
            let s = stats(i + 1, Some(loss));
            let mut ctx = EpochContext { stats: &s, network: net, optimizer: &mut *opt };
            let action = cb.on_epoch_end(&mut ctx).unwrap();
            (action, opt.learning_rate)
        }).collect()
    }

    #[test]
    fn test_early_stopping_waits_for_patience() {
        let mut es = EarlyStopping::new(3, false);
        let mut opt = Sgd::new(0.1);
        let actions: Vec<CallbackAction> = drive(&mut es, &network(0), &mut opt, &[1.0, 0.8, 0.9, 0.8, 0.85])
            .into_iter().map(|(a, _)| a).collect();

        assert_eq!(actions.last(), Some(&CallbackAction::Stop));
        assert!(actions[..4].iter().all(|a| *a == CallbackAction::Continue));
        assert_eq!(es.best_epoch(), Some(2));
        assert_eq!(es.stopped_epoch(), Some(5));
    }

    #[test]
    fn test_early_stopping_restores_best_weights() {
        let best = network(1);
        let later = network(2);
        let mut es = EarlyStopping::new(1, true);
        let mut opt = Sgd::new(0.1);

        drive(&mut es, &best, &mut opt, &[0.5]);
        drive(&mut es, &later, &mut opt, &[0.7]);

        let mut current = later.clone();
        es.on_train_end(&mut current).unwrap();
        let x = crate::math::matrix::Matrix::filled(2, 3, 0.5);
        assert_eq!(current.predict(&x), best.clone().predict(&x));
    }

    #[test]
    fn test_missing_metric_is_skipped() {
        let mut es = EarlyStopping::new(1, true);
        let net = network(0);
        let mut opt = Sgd::new(0.1);
        for epoch in 1..=5 {
            let s = stats(epoch, None);
            let mut ctx = EpochContext { stats: &s, network: &net, optimizer: &mut opt };
            assert_eq!(es.on_epoch_end(&mut ctx).unwrap(), CallbackAction::Continue);
        }
        assert_eq!(es.best_epoch(), None);
    }

    #[test]
    fn test_reduce_lr_halves_after_plateau_and_respects_floor() {
        let mut rl = ReduceLrOnPlateau::new(0.5, 2, 0.03);
        let mut opt = Sgd::new(0.1);
        // Improvements smaller than min_delta count as a plateau.
        let lrs: Vec<f64> = drive(&mut rl, &network(0), &mut opt, &[1.0, 0.99995, 1.0, 1.0, 1.0, 1.0, 1.0])
            .into_iter().map(|(_, lr)| lr).collect();

        assert_eq!(lrs, vec![0.1, 0.1, 0.05, 0.05, 0.03, 0.03, 0.03]);
    }

    #[test]
    fn test_reduce_lr_resets_wait_on_improvement() {
        let mut rl = ReduceLrOnPlateau::new(0.5, 2, 1e-6);
        let mut opt = Sgd::new(0.1);
        let lrs: Vec<f64> = drive(&mut rl, &network(0), &mut opt, &[1.0, 1.0, 0.5, 0.6, 0.4, 0.6])
            .into_iter().map(|(_, lr)| lr).collect();

        assert!(lrs.iter().all(|&lr| lr == 0.1));
    }

    #[test]
    fn test_checkpoint_only_written_on_improvement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.json");
        let mut cp = ModelCheckpoint::new(&path, robust_classifier_spec(3, 0.0, 0.0))
            .with_description("plateau run");
        let mut opt = Sgd::new(0.1);

        drive(&mut cp, &network(0), &mut opt, &[0.9, 0.7, 0.8, 0.75, 0.6, 0.6]);

        assert_eq!(cp.saves(), 3);
        let saved = Checkpoint::load(&path).unwrap();
        assert_eq!(saved.metadata.epoch, 5);
        assert_eq!(saved.metadata.val_loss, 0.6);
        assert_eq!(saved.metadata.description.as_deref(), Some("plateau run"));
    }
}
