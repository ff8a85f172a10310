//! Orchestration for `profile-split split`: load, plan, check, write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::core::decompose::decompose_with;
use crate::core::plan::{Collision, Plan};
use crate::io::config::SplitConfig;
use crate::io::profile_store::{default_source_path, load_profile};
use crate::io::sink::{Filesystem, LocalFs, Sink, SinkReport};
use crate::profile::Profile;

/// Per-invocation inputs layered over [`SplitConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOptions {
    pub profile_name: String,
    /// Source document; defaults to `<base>/<name>.profile-meta.json`.
    pub source: Option<PathBuf>,
    /// Plan only, write nothing.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    pub profile_dir: PathBuf,
    pub plan: Plan,
    /// Paths written more than once (tolerated under last-write-wins).
    pub collisions: Vec<Collision>,
    /// `None` for dry runs.
    pub report: Option<SinkReport>,
}

/// Decompose `profile` and apply the configured conflict policy.
pub fn plan_profile(
    profile: &Profile,
    profile_name: &str,
    config: &SplitConfig,
) -> Result<(Plan, Vec<Collision>)> {
    let plan = decompose_with(profile, profile_name, &config.layout())?;
    let collisions = config.conflict_policy.check(&plan)?;
    for collision in &collisions {
        warn!(
            path = %collision.path.display(),
            writers = collision.writers.len(),
            "path written more than once; last entry wins"
        );
    }
    Ok((plan, collisions))
}

/// Split the profile named in `options` onto the local filesystem.
pub fn split_profile(base: &Path, config: &SplitConfig, options: &SplitOptions) -> Result<SplitOutcome> {
    split_profile_with(&LocalFs, base, config, options)
}

pub fn split_profile_with<F: Filesystem>(
    fs: &F,
    base: &Path,
    config: &SplitConfig,
    options: &SplitOptions,
) -> Result<SplitOutcome> {
    let name = options.profile_name.as_str();
    let source = options
        .source
        .clone()
        .unwrap_or_else(|| default_source_path(base, name));
    let profile = load_profile(&source)?;
    let (plan, collisions) = plan_profile(&profile, name, config)
        .with_context(|| format!("decompose profile '{name}'"))?;
    let profile_dir = config.profile_dir(base, name);

    if options.dry_run {
        info!(profile = name, items = plan.len(), "dry run; nothing written");
        return Ok(SplitOutcome {
            profile_dir,
            plan,
            collisions,
            report: None,
        });
    }

    let sink = Sink::new(fs, profile_dir.clone(), config.sink_options());
    let report = sink
        .write(&plan)
        .with_context(|| format!("write profile tree {}", profile_dir.display()))?;
    info!(
        profile = name,
        documents = report.documents,
        directories = report.directories,
        dir = %profile_dir.display(),
        "profile split"
    );

    Ok(SplitOutcome {
        profile_dir,
        plan,
        collisions,
        report: Some(report),
    })
}
