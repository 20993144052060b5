//! Validate a trial bundle.

use std::path::PathBuf;

use kinetrack_trial_model::trial::LoadedTrial;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating trial at: {}", path.display());

    let trial =
        LoadedTrial::load(&path).map_err(|e| anyhow::anyhow!("Failed to load trial: {e}"))?;

    let errors = trial.validate_sources();
    if errors.is_empty() {
        println!("  Metrics: {} consistent frames", trial.trial.track.num_frames());
        println!("\nTrial is valid.");
        Ok(())
    } else {
        for error in &errors {
            println!("  ERROR: {error}");
        }
        anyhow::bail!("{} validation error(s)", errors.len());
    }
}
