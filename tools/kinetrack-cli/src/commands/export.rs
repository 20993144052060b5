//! Export trial metrics to CSV.

use std::io::Write;
use std::path::PathBuf;

use kinetrack_trial_model::trial::LoadedTrial;

pub fn run(path: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let trial =
        LoadedTrial::load(&path).map_err(|e| anyhow::anyhow!("Failed to load trial: {e}"))?;

    let output = output.unwrap_or_else(|| path.join("metrics.csv"));
    let metrics = &trial.trial.track.metrics;

    let mut file = std::fs::File::create(&output)?;
    writeln!(
        file,
        "index,x_pos,y_pos,v_x,v_y,a_x,a_y,v_net,a_net,distance,time"
    )?;
    for i in 0..metrics.len() {
        writeln!(
            file,
            "{i},{},{},{},{},{},{},{},{},{},{}",
            metrics.x_pos[i],
            metrics.y_pos[i],
            metrics.v_x[i],
            metrics.v_y[i],
            metrics.a_x[i],
            metrics.a_y[i],
            metrics.v_net[i],
            metrics.a_net[i],
            metrics.distance[i],
            metrics.time[i],
        )?;
    }

    println!(
        "Exported {} rows to: {}",
        metrics.len(),
        output.display()
    );

    Ok(())
}
