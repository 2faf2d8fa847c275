//! Renders plan and apply results to stdout.

use std::io::{self, Write};

use reconcile::PropertyDiff;
use serde::Serialize;

use crate::cli::OutputFormat;

/// One diff as a plan line: `Set` for a previously unset value, `Change` otherwise.
pub fn plan_line(diff: &PropertyDiff) -> String {
    if diff.old_value.is_empty() {
        format!(
            "  {}/{}: Set {} = {}",
            diff.organization, diff.repository, diff.property_name, diff.new_value
        )
    } else {
        format!(
            "  {}/{}: Change {} from {} to {}",
            diff.organization,
            diff.repository,
            diff.property_name,
            diff.old_value,
            diff.new_value
        )
    }
}

fn applied_line(diff: &PropertyDiff) -> String {
    format!(
        "  {}/{}: Set {} = {}",
        diff.organization, diff.repository, diff.property_name, diff.new_value
    )
}

pub fn write_plan(out: &mut impl Write, diffs: &[PropertyDiff], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, &diffs),
        OutputFormat::Text => {
            if diffs.is_empty() {
                return writeln!(out, "No changes needed.");
            }
            writeln!(out, "Planned changes:")?;
            for diff in diffs {
                writeln!(out, "{}", plan_line(diff))?;
            }
            Ok(())
        }
    }
}

/// Outcome of an `apply` run, successful or not.
#[derive(Debug, Serialize)]
pub struct ApplyReport<'a> {
    pub applied: &'a [PropertyDiff],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<FailedWrite<'a>>,
    /// Diffs left unwritten because the run was cancelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<&'a [PropertyDiff]>,
}

/// The diff whose write stopped the run, and why.
#[derive(Debug, Serialize)]
pub struct FailedWrite<'a> {
    #[serde(flatten)]
    pub diff: &'a PropertyDiff,
    pub cause: String,
}

pub fn write_apply(out: &mut impl Write, report: &ApplyReport<'_>, format: OutputFormat) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, report);
    }

    let interrupted = match (&report.failed, report.cancelled) {
        (Some(_), _) => Some("the failure"),
        (None, Some(_)) => Some("cancellation"),
        (None, None) => None,
    };
    match interrupted {
        None if report.applied.is_empty() => return writeln!(out, "No changes needed."),
        None => writeln!(out, "Applied changes:")?,
        Some(event) if report.applied.is_empty() => {
            writeln!(out, "No changes were applied before {event}.")?
        }
        Some(event) => writeln!(out, "Applied before {event}:")?,
    }
    for diff in report.applied {
        writeln!(out, "{}", applied_line(diff))?;
    }

    if let Some(failed) = &report.failed {
        writeln!(out, "Failed:\n{}", plan_line(failed.diff))?;
        return writeln!(out, "  cause: {}", failed.cause);
    }
    if let Some(remaining) = report.cancelled {
        writeln!(out, "Cancelled before:")?;
        for diff in remaining {
            writeln!(out, "{}", plan_line(diff))?;
        }
        return Ok(());
    }
    writeln!(out, "All changes applied successfully.")
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
