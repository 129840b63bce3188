// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, loads the settings file and
// hands the run to Layer 2. Banner and final scores are the
// only output printed here; progress lines come from the
// training loop.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Commands;

use crate::application::run_use_case::{RunReport, RunUseCase};
use crate::infra::settings_store::SettingsStore;

#[derive(Parser, Debug)]
#[command(
    name = "forexer",
    version = "0.1.0",
    about = "Train and evaluate an LSTM forecaster on a univariate time series."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        print_banner();

        let args = self.command.args();
        let mut settings = SettingsStore::new(&args.config).read()?;
        args.apply(&mut settings);
        if let Some(mode) = self.command.forced_mode() {
            settings.model.mode = mode;
        }
        settings.validate()?;

        let report = RunUseCase::new(settings).execute()?;
        print_report(&report);
        Ok(())
    }
}

fn print_banner() {
    println!("\n********************************************************");
    println!("                         Forexer");
    println!("********************************************************\n\n");
}

fn print_report(report: &RunReport) {
    if let Some(path) = &report.checkpoint {
        println!("Checkpoint saved to {}", path.display());
    }
    println!("R2 score: {:.3}\nMSLE: {:.5}", report.r2, report.msle);
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::settings::{tests::SAMPLE, DeviceKind, RunMode, Settings};

    #[test]
    fn test_parses_overrides() {
        let cli = Cli::try_parse_from([
            "forexer", "train", "--config", "eur.toml", "--epochs", "5", "--device", "cuda",
        ])
        .unwrap();

        assert_eq!(cli.command.forced_mode(), Some(RunMode::Train));
        let args = cli.command.args();
        assert_eq!(args.config, "eur.toml");
        assert_eq!(args.epochs, Some(5));
        assert_eq!(args.device, Some(DeviceKind::Gpu));
        assert_eq!(args.pre_trained, None);
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["forexer", "run"]).unwrap();
        assert_eq!(cli.command.forced_mode(), None);
        assert_eq!(cli.command.args().config, "config.toml");
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut settings: Settings = toml::from_str(SAMPLE).unwrap();
        let cli = Cli::try_parse_from([
            "forexer", "test", "--pre-trained", "ckpt/a.ckpt", "--save-path", "", "--device", "cpu",
        ])
        .unwrap();
        cli.command.args().apply(&mut settings);

        assert_eq!(settings.pre_trained(), Some("ckpt/a.ckpt"));
        assert_eq!(settings.save_path(), None);
        assert_eq!(settings.model.parameters.device, DeviceKind::Cpu);
        assert_eq!(settings.model.parameters.num_epochs, 3);
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["forexer", "ask"]).is_err());
    }
}
