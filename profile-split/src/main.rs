//! Split a permission profile into one JSON document per entry.
//!
//! Reads `<name>.profile-meta.json` and writes `profile/<name>/`, grouping
//! object-scoped permissions under `objectPermissions/<object>/`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use profile_split::core::conflict::ConflictPolicy;
use profile_split::core::error::DecomposeError;
use profile_split::core::plan::PlanItem;
use profile_split::core::summary::summarize;
use profile_split::exit_codes;
use profile_split::io::config::{CONFIG_FILE_NAME, SplitConfig, load_config, write_config};
use profile_split::io::profile_store::{default_source_path, load_profile};
use profile_split::logging;
use profile_split::split::{SplitOptions, split_profile};

#[derive(Parser)]
#[command(
    name = "profile-split",
    version,
    about = "Decompose a permission profile into a reviewable file tree"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default `profile-split.toml`.
    Init {
        /// Overwrite an existing config file.
        #[arg(short, long)]
        force: bool,
        #[arg(long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,
    },
    /// Decompose `<name>.profile-meta.json` into `<output>/<name>/`.
    Split {
        /// Profile name; names the output folder and marker document.
        name: String,
        /// Source document (defaults to `./<name>.profile-meta.json`).
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Output root (overrides `output_root` from the config).
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,
        /// Print the plan without writing anything.
        #[arg(long)]
        dry_run: bool,
        /// Write items one at a time in plan order.
        #[arg(long)]
        sequential: bool,
        /// Fail when two entries map to the same file.
        #[arg(long)]
        reject_collisions: bool,
    },
    /// Print application visibilities and class accesses.
    Summary {
        name: String,
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        let code = if err.downcast_ref::<DecomposeError>().is_some() {
            exit_codes::MALFORMED_INPUT
        } else {
            exit_codes::FAILED
        };
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let base = std::env::current_dir().context("resolve current directory")?;
    match cli.command {
        Command::Init { force, config } => cmd_init(&base.join(config), force),
        Command::Split {
            name,
            source,
            output,
            config,
            dry_run,
            sequential,
            reject_collisions,
        } => {
            let mut cfg = load_config(&base.join(config))?;
            if let Some(output) = output {
                cfg.output_root = output;
            }
            if sequential {
                cfg.parallel = false;
            }
            if reject_collisions {
                cfg.conflict_policy = ConflictPolicy::Reject;
            }
            let options = SplitOptions {
                profile_name: name,
                source,
                dry_run,
            };
            cmd_split(&base, &cfg, &options)
        }
        Command::Summary { name, source } => cmd_summary(&base, &name, source),
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    write_config(path, &SplitConfig::default())?;
    println!("init: config={}", path.display());
    Ok(())
}

fn cmd_split(base: &Path, cfg: &SplitConfig, options: &SplitOptions) -> Result<()> {
    let outcome = split_profile(base, cfg, options)?;
    if options.dry_run {
        for item in outcome.plan.items() {
            match item {
                PlanItem::Unit(unit) => println!("unit {}", unit.path.display()),
                PlanItem::Folder(folder) => println!("folder {}", folder.display()),
            }
        }
    }
    let units = outcome.plan.units().count();
    let folders = outcome.plan.folders().count();
    println!(
        "split: profile={} units={} folders={} collisions={} dir={}",
        options.profile_name,
        units,
        folders,
        outcome.collisions.len(),
        outcome.profile_dir.display()
    );
    Ok(())
}

fn cmd_summary(base: &Path, name: &str, source: Option<PathBuf>) -> Result<()> {
    let source = source.unwrap_or_else(|| default_source_path(base, name));
    let profile = load_profile(&source)?;
    print!("{}", summarize(&profile));
    Ok(())
}
