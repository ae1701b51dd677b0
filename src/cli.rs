// src/cli.rs

use clap::{Parser, ValueEnum};
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cmvn::{load_cmvn, CmvnStats};
use crate::config::FrontendConfig;
use crate::normalizer::Cmvn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print the CMVN statistics stored in an am.mvn file.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the am.mvn artifact
    #[clap(long, value_parser, conflicts_with = "config", required_unless_present = "config")]
    pub cmvn_file: Option<PathBuf>,

    /// Frontend config (JSON) naming the artifact and its feature dimension
    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,

    /// Expected feature dimension, overrides the config value
    #[clap(long, value_parser)]
    pub expect_dim: Option<usize>,

    /// Require both blocks with equal lengths
    #[clap(long)]
    pub strict: bool,

    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl CliArgs {
    fn frontend_config(&self) -> Result<FrontendConfig, Box<dyn Error>> {
        let mut config = match (&self.config, &self.cmvn_file) {
            (Some(path), _) => FrontendConfig::load(path)?,
            (None, Some(cmvn_file)) => FrontendConfig::new(cmvn_file, None),
            (None, None) => return Err("either --cmvn-file or --config is required".into()),
        };
        if self.expect_dim.is_some() {
            config.feature_dim = self.expect_dim;
        }
        Ok(config)
    }
}

pub fn run_cli() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();
    run(&args, &mut io::stdout().lock())
}

pub fn run(args: &CliArgs, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let config = args.frontend_config()?;
    let path = config.resolved_cmvn_path();

    log::info!("Loading cmvn statistics from: {}", path.display());
    let stats = load_cmvn(&path)?;

    let validate = args.strict || config.feature_dim.is_some() || !config.allow_partial;
    if validate {
        let cmvn = Cmvn::from_stats(&stats, config.feature_dim)?;
        log::info!("Statistics validated, feature dimension {}", cmvn.dim());
    } else if !stats.is_complete() {
        log::warn!(
            "Partial statistics: {} neg_mean values, {} inv_std values",
            stats.neg_mean.len(),
            stats.inv_std.len()
        );
    }

    write_stats(&stats, args.format, out)
}

fn write_stats(stats: &CmvnStats, format: OutputFormat, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "neg_mean: {:?}", stats.neg_mean)?;
            writeln!(out, "inv_std: {:?}", stats.inv_std)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, stats)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
