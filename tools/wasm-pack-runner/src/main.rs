use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::Command;

/// Build the engine for the web frontend with wasm-pack.
///
/// Wraps the fixed invocation the frontend build expects: web target,
/// package emitted straight into the sibling frontend's source tree,
/// release profile. Any failure in wasm-pack is fatal and propagates as a
/// non-zero exit.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Crate directory to build
    #[arg(long, default_value = ".")]
    crate_dir: PathBuf,

    /// Directory the generated JS/wasm package is written to
    #[arg(long, default_value = "../web/src/wasm")]
    out_dir: PathBuf,

    /// wasm-pack target environment
    #[arg(long, default_value = "web")]
    target: String,

    /// Build with the release profile (default true)
    #[arg(long, default_value_t = true)]
    release: bool,
}

fn build_command(args: &Args) -> Command {
    let mut command = Command::new("wasm-pack");
    command
        .arg("build")
        .arg(&args.crate_dir)
        .arg("--target")
        .arg(&args.target)
        .arg("--out-dir")
        .arg(&args.out_dir);
    if args.release {
        command.arg("--release");
    }
    command
}

fn run_build(mut command: Command) -> Result<()> {
    let status = command
        .status()
        .context("failed to launch wasm-pack; is it installed and on PATH?")?;
    if !status.success() {
        bail!("wasm-pack build failed with {status}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    run_build(build_command(&args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_matches_frontend_build() {
        let args = Args::parse_from(["wasm-pack-runner"]);
        let command = build_command(&args);
        assert_eq!(command.get_program(), "wasm-pack");

        let argv: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            argv,
            vec![
                "build",
                ".",
                "--target",
                "web",
                "--out-dir",
                "../web/src/wasm",
                "--release"
            ]
        );
    }

    #[test]
    fn test_overridden_paths_are_forwarded() {
        let args = Args::parse_from([
            "wasm-pack-runner",
            "--crate-dir",
            "engine",
            "--out-dir",
            "/tmp/pkg",
        ]);
        let command = build_command(&args);
        let argv: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(argv.contains(&"engine".to_string()));
        assert!(argv.contains(&"/tmp/pkg".to_string()));
    }

    #[test]
    fn test_child_failure_is_fatal() {
        let mut command = Command::new("sh");
        command.args(["-c", "exit 3"]);
        assert!(run_build(command).is_err());
    }

    #[test]
    fn test_child_success_is_ok() {
        let mut command = Command::new("sh");
        command.args(["-c", "exit 0"]);
        assert!(run_build(command).is_ok());
    }

    #[test]
    fn test_missing_binary_is_fatal() {
        let command = Command::new("wasm-pack-runner-test-no-such-binary");
        assert!(run_build(command).is_err());
    }
}
