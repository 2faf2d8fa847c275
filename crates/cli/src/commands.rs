//! The `plan` and `apply` commands.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use reconcile::{CancellationToken, ReconcileContext, ReconcileError, RepositoryClient};
use tracing::info;

use crate::config::CliConfig;
use crate::report::{self, ApplyReport, FailedWrite};

/// Loads every document, resolves, diffs, and reports. Never writes.
pub async fn plan(
    config: &CliConfig,
    client: Arc<dyn RepositoryClient>,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> Result<()> {
    let mut context = load_context(config, client)?;
    let diffs = context
        .plan(cancel)
        .await
        .context("failed to compute planned changes")?;

    report::write_plan(out, &diffs, config.output)?;
    Ok(())
}

/// Plans, then applies the diffs in order.
///
/// A failed write or a cancellation stops the run. The report lists what was
/// applied before it stopped, and those changes are left in place.
pub async fn apply(
    config: &CliConfig,
    client: Arc<dyn RepositoryClient>,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> Result<()> {
    let mut context = load_context(config, client)?;
    let diffs = context
        .plan(cancel)
        .await
        .context("failed to compute planned changes")?;

    match context.apply(&diffs, cancel).await {
        Ok(applied) => {
            info!(applied, "Apply complete");
            let report = ApplyReport {
                applied: &diffs,
                failed: None,
                cancelled: None,
            };
            report::write_apply(out, &report, config.output)?;
            Ok(())
        }
        Err(err) => {
            let report = match &err {
                ReconcileError::Apply {
                    diff,
                    applied,
                    cause,
                } => Some(ApplyReport {
                    applied: &diffs[..*applied],
                    failed: Some(FailedWrite {
                        diff: &**diff,
                        cause: cause.to_string(),
                    }),
                    cancelled: None,
                }),
                ReconcileError::Cancelled { applied, .. } => Some(ApplyReport {
                    applied: &diffs[..*applied],
                    failed: None,
                    cancelled: Some(&diffs[*applied..]),
                }),
                _ => None,
            };
            if let Some(report) = report {
                report::write_apply(out, &report, config.output)?;
            }
            Err(err).context("failed to apply changes")
        }
    }
}

fn load_context(config: &CliConfig, client: Arc<dyn RepositoryClient>) -> Result<ReconcileContext> {
    let mut context = ReconcileContext::new(client);
    info!(run_id = %context.run_id(), documents = config.documents.len(), "Starting run");

    for path in &config.documents {
        load_document(&mut context, path)?;
    }
    Ok(context)
}

fn load_document(context: &mut ReconcileContext, path: &Path) -> Result<()> {
    let file = File::open(path)
        .with_context(|| format!("failed to open config file {}", path.display()))?;
    let entry = context
        .load_reader(file)
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    info!(
        path = %path.display(),
        property = %entry.property_name,
        "Loaded config file"
    );
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
