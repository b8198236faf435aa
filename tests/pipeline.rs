use std::path::Path;

use squat_nn::{run, NnError, PipelineConfig, PipelineReport};

fn small_config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        samples: 200,
        features: 8,
        epochs: 12,
        batch_size: 32,
        early_stopping_patience: 4,
        lr_patience: 2,
        model_path: dir.join("model.json"),
        ..PipelineConfig::default()
    }
}

fn run_in_tempdir() -> (tempfile::TempDir, PipelineReport) {
    let dir = tempfile::tempdir().unwrap();
    let report = run(&small_config(dir.path())).unwrap();
    (dir, report)
}

#[test]
fn test_partitions_cover_every_sample() {
    let (_dir, report) = run_in_tempdir();

    assert_eq!(report.train_samples + report.validation_samples + report.test_samples, 200);
    assert_eq!(report.test_samples, 40);
    assert_eq!(report.validation_samples, 40);
    assert_eq!(report.test.samples, 40);
}

#[test]
fn test_reloaded_checkpoint_is_the_best_epoch() {
    let (dir, report) = run_in_tempdir();

    assert!(dir.path().join("model.json").exists());
    let final_val_loss = report.history.final_val_loss().unwrap();
    let (best_epoch, best_val_loss) = report.history.best_val_loss().unwrap();

    assert!(report.validation.loss <= final_val_loss + 1e-12);
    assert_eq!(report.checkpoint.epoch, best_epoch);
    assert!((report.validation.loss - best_val_loss).abs() < 1e-12);
    assert!((report.validation.loss - report.checkpoint.val_loss).abs() < 1e-12);
}

#[test]
fn test_reports_sane_metrics() {
    let (_dir, report) = run_in_tempdir();

    assert!(!report.history.epochs.is_empty());
    assert!(report.history.epochs.len() <= 12);
    assert!(report.test.loss.is_finite() && report.test.loss > 0.0);
    assert!((0.0..=1.0).contains(&report.test.accuracy));
    assert!(report.history.epochs.iter().all(|s| s.learning_rate >= 1e-6));
}

#[test]
fn test_same_seed_same_run() {
    let (_a_dir, mut a) = run_in_tempdir();
    let (_b_dir, mut b) = run_in_tempdir();
    for s in a.history.epochs.iter_mut().chain(b.history.epochs.iter_mut()) {
        s.elapsed_ms = 0;
    }

    assert_eq!(a.history, b.history);
    assert_eq!(a.test, b.test);
}

#[test]
fn test_invalid_config_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig { dropout_rate: 1.0, ..small_config(dir.path()) };

    let err = run(&config).unwrap_err();

    assert!(matches!(err, NnError::Config(_)));
    assert!(!config.model_path.exists());
}
