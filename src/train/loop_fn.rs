use std::time::Instant;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, info};

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};
use crate::eval::evaluator::{binary_accuracy, evaluate};
use crate::layers::Mode;
use crate::network::network::Network;
use crate::optim::Optimizer;
use crate::train::callbacks::{Callback, CallbackAction, EpochContext};
use crate::train::epoch_stats::EpochStats;
use crate::train::history::History;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for up to `config.epochs` epochs and returns the
/// recorded history.
///
/// # Arguments
/// - `network`    — mutable reference to the network; modified in place
/// - `train`      — training samples and labels
/// - `validation` — optional validation set, evaluated in inference mode
///                  after every epoch
/// - `optimizer`  — applies the averaged mini-batch gradients
/// - `callbacks`  — run in order after every epoch, then once at the end
/// - `config`     — epochs, batch size, loss and shuffle seed
///
/// The loop ends before `config.epochs` once any callback returns
/// `CallbackAction::Stop`. `on_train_end` runs for every callback either way.
pub fn train_loop(
    network: &mut Network,
    train: &Dataset,
    validation: Option<&Dataset>,
    optimizer: &mut dyn Optimizer,
    callbacks: &mut [Box<dyn Callback>],
    config: &TrainConfig,
) -> Result<History> {
    if train.is_empty() {
        return Err(NnError::dataset("training set is empty"));
    }
    if train.feature_count() != network.input_size {
        return Err(NnError::dataset(format!(
            "network expects {} features, training set has {}",
            network.input_size,
            train.feature_count()
        )));
    }
    if config.batch_size == 0 {
        return Err(NnError::config("batch_size must be at least 1"));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut history = History::default();

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();
        let learning_rate = optimizer.learning_rate();

        // ── One full pass over the training data ───────────────────────────
        let (train_loss, train_accuracy) = run_one_epoch(network, train, optimizer, config, &mut rng);
        if !train_loss.is_finite() {
            return Err(NnError::training(format!("training loss diverged at epoch {epoch}")));
        }

        // ── Validation ────────────────────────────────────────────────────
        let (val_loss, val_accuracy) = match validation {
            Some(v) => {
                let e = evaluate(network, v, config.loss_type)?;
                (Some(e.loss), Some(e.accuracy))
            }
            None => (None, None),
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            train_accuracy,
            val_loss,
            val_accuracy,
            learning_rate,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        info!("{stats}");
        history.epochs.push(stats.clone());

        // ── Callbacks ─────────────────────────────────────────────────────
        let mut stop = false;
        let mut ctx = EpochContext { stats: &stats, network: &*network, optimizer: &mut *optimizer };
        for callback in callbacks.iter_mut() {
            if callback.on_epoch_end(&mut ctx)? == CallbackAction::Stop {
                stop = true;
            }
        }

        if stop {
            history.stopped_early = true;
            break;
        }
    }

    for callback in callbacks.iter_mut() {
        callback.on_train_end(network)?;
    }

    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one full epoch of mini-batch training over `data`.
/// Returns the sample-weighted mean loss (including the L2 penalty) and
/// accuracy, both measured on the training-mode outputs.
fn run_one_epoch(
    network: &mut Network,
    data: &Dataset,
    optimizer: &mut dyn Optimizer,
    config: &TrainConfig,
    rng: &mut StdRng,
) -> (f64, f64) {
    let n = data.len();
    let mut total_loss = 0.0;
    let mut total_correct = 0.0;

    // Shuffle sample order each epoch.
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut *rng);

    for batch in indices.chunks(config.batch_size) {
        let inputs = data.features.select_rows(batch);
        let expected = data.labels.select_rows(batch);
        let weight = batch.len() as f64;

        let output = network.forward(&inputs, Mode::Train(&mut *rng));
        let batch_loss = config.loss_type.loss(&output, &expected) + network.penalty();
        total_loss += batch_loss * weight;
        total_correct += binary_accuracy(&output, &expected) * weight;

        network.backward_loss(&output, &expected, config.loss_type);
        optimizer.step(network.params_mut());

        debug!(batch_size = batch.len(), batch_loss, "batch done");
    }

    (total_loss / n as f64, total_correct / n as f64)
}
