// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands share one set of flags:
//
//   run   — mode taken from the settings file
//   train — forces train mode
//   test  — forces test mode
//
// Every flag except --config overrides the matching field of
// the settings file; validation runs after the overrides.

use clap::{Args, Subcommand};

use crate::application::settings::{DeviceKind, RunMode, Settings};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run in the mode named by the settings file
    Run(RunArgs),

    /// Train on data.train_path, score on a held-out dev split
    Train(RunArgs),

    /// Score a (pre-trained) model on data.test_path
    Test(RunArgs),
}

impl Commands {
    /// The mode a subcommand forces, if any.
    pub fn forced_mode(&self) -> Option<RunMode> {
        match self {
            Commands::Run(_)   => None,
            Commands::Train(_) => Some(RunMode::Train),
            Commands::Test(_)  => Some(RunMode::Test),
        }
    }

    pub fn args(&self) -> &RunArgs {
        match self {
            Commands::Run(a) | Commands::Train(a) | Commands::Test(a) => a,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// TOML settings file
    #[arg(long, short, default_value = "config.toml")]
    pub config: String,

    /// Checkpoint to resume from (overrides model.pre_trained)
    #[arg(long)]
    pub pre_trained: Option<String>,

    /// Checkpoint path prefix (overrides model.save_path)
    #[arg(long)]
    pub save_path: Option<String>,

    /// Number of epochs (overrides model.parameters.num_epochs)
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Compute device (overrides model.parameters.device)
    #[arg(long, value_enum)]
    pub device: Option<DeviceKind>,
}

impl RunArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(p) = &self.pre_trained {
            settings.model.pre_trained = p.clone();
        }
        if let Some(p) = &self.save_path {
            settings.model.save_path = p.clone();
        }
        if let Some(n) = self.epochs {
            settings.model.parameters.num_epochs = n;
        }
        if let Some(d) = self.device {
            settings.model.parameters.device = d;
        }
    }
}
