//! The ledger loop: estimate each row, checkpoint, pause.

use anyhow::Result;
use estimation::{Estimator, SnippetSource};
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::ledger::Ledger;

/// How a run checkpoints and paces itself.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Where checkpoints and the final ledger are written.
    pub output: PathBuf,

    /// Save after every N processed rows.
    pub checkpoint_every: usize,

    /// Pause between companies is drawn from this range, in seconds.
    pub min_delay: f64,
    pub max_delay: f64,
}

/// Counts from a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub estimated: usize,
    pub unknown: usize,
}

/// Process rows from `start` to the end of the ledger.
///
/// The ledger is saved every `checkpoint_every` rows (counted by row index,
/// so resumed runs keep the same checkpoint cadence) and once more at the end.
pub async fn run<S: SnippetSource>(
    estimator: &Estimator<S>,
    ledger: &mut Ledger,
    start: usize,
    options: &RunOptions,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let total = ledger.len();

    for index in start..total {
        let entry = ledger.entry(index);
        let estimate = estimator
            .estimate_with_backup(&entry.company, entry.backup_name.as_deref())
            .await;

        info!(
            row = index,
            company = %entry.company.name,
            revenue = %estimate,
            "Processed row"
        );
        ledger.set_estimate(index, estimate);

        summary.processed += 1;
        if estimate.is_unknown() {
            summary.unknown += 1;
        } else {
            summary.estimated += 1;
        }

        if (index + 1) % options.checkpoint_every == 0 {
            ledger.save_atomic(&options.output)?;
            info!("Saved through row {}/{}", index + 1, total);
        }

        if index + 1 < total {
            let delay = pacing_delay(&mut rand::thread_rng(), index, options.min_delay, options.max_delay);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    ledger.save_atomic(&options.output)?;
    info!(
        processed = summary.processed,
        estimated = summary.estimated,
        unknown = summary.unknown,
        "Processing complete"
    );
    Ok(summary)
}

/// Jittered pause that grows by 1% per row already processed.
pub fn pacing_delay<R: Rng>(rng: &mut R, index: usize, min_secs: f64, max_secs: f64) -> Duration {
    if max_secs <= 0.0 {
        return Duration::ZERO;
    }

    let base = if min_secs < max_secs {
        rng.gen_range(min_secs..max_secs)
    } else {
        min_secs
    };
    Duration::from_secs_f64(base.max(0.0) * (1.0 + index as f64 / 100.0))
}
