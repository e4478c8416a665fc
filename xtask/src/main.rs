use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use raymarch_render::{ShaderSources, ShaderVariant};
use std::path::PathBuf;
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for the raymarch viewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, shaders, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Check every fragment variant declares the inputs the loop pushes
    Shaders {
        #[arg(long, default_value = "res/shaders")]
        dir: PathBuf,
    },
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo(&["fmt", "--all", "--", "--check"])?;
            cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;
            check_shaders(&PathBuf::from("res/shaders"))?;
            cargo(&["test", "--workspace"])?;
            cargo(&["doc", "--workspace", "--no-deps"])?;
        }
        Commands::Fmt => cargo(&["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => {
            cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?
        }
        Commands::Shaders { dir } => check_shaders(&dir)?,
        Commands::Test => cargo(&["test", "--workspace"])?,
        Commands::Doc => cargo(&["doc", "--workspace", "--no-deps"])?,
        Commands::Build => cargo(&["build", "--workspace"])?,
    }

    Ok(())
}

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> Running cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args[0]);
    }
    Ok(())
}

fn check_shaders(dir: &std::path::Path) -> Result<()> {
    println!("==> Checking shader inputs in {}", dir.display());
    for variant in ShaderVariant::ALL {
        let sources = ShaderSources::load(dir, variant)
            .with_context(|| format!("variant {variant}"))?;
        sources
            .check_inputs(variant)
            .with_context(|| format!("variant {variant}"))?;
        println!("    {variant}: {}", sources.fragment.path.display());
    }
    Ok(())
}
