use tracing_subscriber::EnvFilter;

use squat_nn::{run, PipelineConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = PipelineConfig::default();
    let report = run(&config)?;

    println!("\n--- Final Model Evaluation ---");
    println!(
        "Model trained and saved as {} (best epoch {} of {})",
        report.model_path.display(),
        report.checkpoint.epoch,
        report.history.epochs.len()
    );
    println!("Test Loss: {:.4}", report.test.loss);
    println!("Test Accuracy (Unbiased): {:.4}", report.test.accuracy);
    Ok(())
}
