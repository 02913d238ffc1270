use anyhow::Result;
use clap::{Parser, Subcommand};
use pagectl_core::config::{self, PagectlConfig};

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration (password masked)
    Show,
    /// Show config file locations
    Path,
}

pub fn run_config(args: ConfigArgs, config: &PagectlConfig) -> Result<()> {
    match args.command {
        ConfigCommands::Show => run_show(config),
        ConfigCommands::Path => run_path(),
    }
}

fn run_show(config: &PagectlConfig) -> Result<()> {
    print!("{}", config.to_display_toml()?);
    if let Err(err) = config.validate() {
        eprintln!("⚠️ {err}");
    }
    Ok(())
}

fn run_path() -> Result<()> {
    let describe = |path: &std::path::Path| {
        if path.exists() {
            format!("{} (found)", path.display())
        } else {
            format!("{} (not found)", path.display())
        }
    };

    match config::global_config_path() {
        Some(path) => println!("global: {}", describe(&path)),
        None => println!("global: (no home directory)"),
    }
    println!("local:  {}", describe(&config::local_config_path()));
    if let Some(dir) = config::config_dir() {
        println!("env:    {}", describe(&dir.join(".env")));
    }
    Ok(())
}
