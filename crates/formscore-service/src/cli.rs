//! Command-line interface.
//!
//! ```bash
//! # Store a standard-form recording as the reference
//! formscore capture --exercise bicep_curl --pose reference.json
//!
//! # Score a user recording
//! formscore score --exercise "Bicep Curl" --pose attempt.json --pretty
//! ```
//!
//! Pose files hold a serialized `PoseCapture`: the video parameters and
//! the per-joint, per-frame pixel positions from the pose detector.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use formscore_models::PoseCapture;

use crate::service::FormScoreService;

/// FormScore Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "formscore")]
#[command(author, version, about = "Score exercise form against a reference recording")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print recorded metrics in Prometheus text format to stderr on exit
    #[arg(long, global = true)]
    pub emit_metrics: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a user recording against the stored reference
    Score {
        /// Exercise key or display name
        #[arg(short, long)]
        exercise: String,

        /// Pose capture JSON file
        #[arg(short, long)]
        pose: PathBuf,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Store a standard-form recording as the exercise reference
    Capture {
        /// Exercise key or display name
        #[arg(short, long)]
        exercise: String,

        /// Pose capture JSON file
        #[arg(short, long)]
        pose: PathBuf,
    },

    /// List known exercises
    Exercises,

    /// List exercises with a stored reference
    References,

    /// Delete the stored reference of an exercise
    Delete {
        /// Exercise key or display name
        #[arg(short, long)]
        exercise: String,
    },
}

/// Read a pose capture from a JSON file.
pub fn load_capture(path: &Path) -> anyhow::Result<PoseCapture> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pose file {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse pose file {}", path.display()))
}

/// Run one command, writing its output to `out`.
pub async fn execute(
    command: Commands,
    service: &FormScoreService,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Score {
            exercise,
            pose,
            pretty,
        } => {
            let capture = load_capture(&pose)?;
            let report = service.compute_form_score(&exercise, &capture).await?;
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            writeln!(out, "{}", json)?;
        }
        Commands::Capture { exercise, pose } => {
            let capture = load_capture(&pose)?;
            let set = service.capture_reference(&exercise, &capture).await?;
            writeln!(
                out,
                "Captured reference for {} ({} joints, {} frames at {} fps)",
                set.exercise_key,
                set.curves.len(),
                set.video.frame_count,
                set.video.fps
            )?;
        }
        Commands::Exercises => {
            for def in service.exercises() {
                let joints: Vec<&str> = def.joint_group.iter().map(|j| j.as_str()).collect();
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    def.key,
                    def.name,
                    if def.isolated_movement { "isolated" } else { "compound" },
                    joints.join(",")
                )?;
            }
        }
        Commands::References => {
            for key in service.list_references().await? {
                writeln!(out, "{}", key)?;
            }
        }
        Commands::Delete { exercise } => {
            if service.delete_reference(&exercise).await? {
                writeln!(out, "Deleted reference for {}", exercise)?;
            } else {
                writeln!(out, "No reference stored for {}", exercise)?;
            }
        }
    }

    Ok(())
}
