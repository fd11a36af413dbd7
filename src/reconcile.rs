//! Reconciliation driver
//!
//! Compares the recommendation derived from a fetched [`Catalog`] with the
//! recorded state and, depending on the run mode, reports, signals CI or
//! rewrites every target file.

use crate::config::Settings;
use crate::error::SyncError;
use crate::patch::{
    apply_patch, apply_patch_all, CiWorkflowPatch, DockerBakePatch, DockerfilePatch, FileReport,
    MiseVersionsPatch,
};
use crate::policy::{select, Recommendation};
use crate::releases::Catalog;
use crate::repository::Repository;
use crate::signal::CiOutput;
use crate::state::{read_state, write_record, RecordedState};
use crate::types::{ReleaseVersion, RunMode, Variant};
use anyhow::Result;
use console::style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Recorded state already matches the recommendation
    UpToDate,
    /// Update exists; nothing was requested beyond the report
    UpdateAvailable,
    /// Update exists and was signalled to CI without touching files
    Checked,
    /// Files were rewritten
    Applied(Vec<FileReport>),
}

pub fn reconcile<R: Repository + ?Sized>(
    catalog: &Catalog,
    settings: &Settings,
    repo: &mut R,
    mode: RunMode,
    output: &CiOutput,
) -> Result<Outcome> {
    if catalog.is_empty() {
        return Err(SyncError::EmptyCatalog {
            repo: settings.upstream_repo.clone(),
        }
        .into());
    }

    tracing::info!("Catalog holds {} major versions", catalog.len());
    let recommendation = select(catalog, settings.supported_majors, settings.variant);
    let current = read_state(&*repo, settings)?;

    print_current(&current, settings);
    print_window(catalog, settings);
    print_recommendation(&recommendation);

    println!();
    if current.matches(&recommendation) {
        println!("Status: {}", style("All versions are up to date").green());
        output.set("updated", "false")?;
        return Ok(Outcome::UpToDate);
    }

    println!("Status: {}", style("Update available").yellow());

    match mode {
        RunMode::Check => {
            emit_update_signals(output, &recommendation)?;
            Ok(Outcome::Checked)
        }
        RunMode::Apply => {
            println!();
            println!("Applying updates...");
            let reports = apply_all(repo, settings, &recommendation)?;
            for report in &reports {
                let status = if report.changed {
                    style(report.status()).green()
                } else {
                    style(report.status()).dim()
                };
                println!("  {}: {}", report.label, status);
            }

            emit_update_signals(output, &recommendation)?;

            println!();
            println!("Updates applied. Review changes with: git diff");
            Ok(Outcome::Applied(reports))
        }
        RunMode::Report => {
            println!();
            println!("Run with --apply to update files");
            println!("Run with --check for CI dry-run");
            Ok(Outcome::UpdateAvailable)
        }
    }
}

/// Rewrite every target in a fixed order: record, CI workflow, bake file,
/// mise config, Dockerfiles.
///
/// The record is written first. If a later target fails, the next run sees
/// the new record and reports up to date, so revert the record
/// (`git checkout -- .versions.json`) before retrying a failed apply.
pub fn apply_all<R: Repository + ?Sized>(
    repo: &mut R,
    settings: &Settings,
    recommendation: &Recommendation,
) -> Result<Vec<FileReport>> {
    let paths = &settings.paths;
    let mut reports = Vec::new();

    if settings.variant == Variant::Pair {
        write_record(repo, &paths.versions_file, recommendation)?;
        reports.push(FileReport::new(paths.versions_file.display().to_string(), true));
    }

    let changed = apply_patch(repo, &paths.ci_workflow, &CiWorkflowPatch, recommendation)?;
    reports.push(FileReport::new(paths.ci_workflow.display().to_string(), changed));

    let changed = apply_patch(repo, &paths.docker_bake, &DockerBakePatch, recommendation)?;
    reports.push(FileReport::new(paths.docker_bake.display().to_string(), changed));

    let changed = apply_patch(repo, &paths.mise_toml, &MiseVersionsPatch, recommendation)?;
    reports.push(FileReport::new(paths.mise_toml.display().to_string(), changed));

    let dockerfiles = repo.list(&paths.dockerfile_dir, &paths.dockerfile_prefix)?;
    tracing::debug!("Discovered {} Dockerfiles", dockerfiles.len());
    let changed = apply_patch_all(repo, &dockerfiles, &DockerfilePatch, recommendation)?;
    reports.push(FileReport::new(
        format!(
            "{}*",
            paths.dockerfile_dir.join(&paths.dockerfile_prefix).display()
        ),
        changed,
    ));

    Ok(reports)
}

fn emit_update_signals(output: &CiOutput, recommendation: &Recommendation) -> Result<()> {
    output.set("updated", "true")?;
    match recommendation.variant() {
        Variant::Pair => {
            output.set("newest_version", recommendation.newest())?;
            output.set("oldest_version", recommendation.oldest())?;
        }
        Variant::Triple => {
            let versions = recommendation
                .versions()
                .iter()
                .map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(",");
            output.set("new_versions", &versions)?;
        }
    }
    Ok(())
}

fn print_current(current: &RecordedState, settings: &Settings) {
    println!();
    match current {
        RecordedState::Record(record) => {
            println!("=== Current {} ===", settings.paths.versions_file.display());
            println!("  newest: {}", or_na(&record.newest));
            println!("  oldest: {}", or_na(&record.oldest));
        }
        RecordedState::Scanned(versions) => {
            println!("=== Current {} ===", settings.paths.ci_workflow.display());
            if versions.is_empty() {
                println!("  pg_version: N/A");
            } else {
                println!("  pg_version: {}", versions.join(", "));
            }
        }
    }
}

fn print_window(catalog: &Catalog, settings: &Settings) {
    println!();
    println!(
        "=== Available supported versions ({} most recent majors) ===",
        settings.supported_majors
    );
    for version in catalog.supported_window(settings.supported_majors) {
        println!("  PG {}: {}", version.major(), version);
    }
}

fn print_recommendation(recommendation: &Recommendation) {
    println!();
    match recommendation.variant() {
        Variant::Pair => {
            println!("=== Recommended versions (newest/oldest of supported) ===");
            println!("  newest: {}", describe(recommendation.versions().first()));
            println!("  oldest: {}", describe(recommendation.versions().last()));
        }
        Variant::Triple => {
            println!("=== Recommended versions (newest/middle/oldest of supported) ===");
            for version in recommendation.versions() {
                println!("  {} (PG {})", version, version.major());
            }
        }
    }
}

fn describe(version: Option<&ReleaseVersion>) -> String {
    match version {
        Some(v) => format!("{} (PG {})", v, v.major()),
        None => "N/A".to_string(),
    }
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}
