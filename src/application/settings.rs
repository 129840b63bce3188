// ============================================================
// Layer 2 — Run Settings
// ============================================================
// Everything one run needs, read once from a TOML file and
// consumed read-only afterwards.
//
//   [model]
//   pre_trained  = ""            # checkpoint to resume from, "" = none
//   mode         = "train"       # "train" | "test"
//   save_path    = "checkpoints/eurusd-"
//   metrics_path = ""            # per-epoch CSV, "" = none
//
//   [model.parameters]
//   label           = "Close"
//   time_window     = 5          # W: W - 1 inputs + 1 target
//   input_size      = 1
//   sequence_length = 4          # sequence_length * input_size == W - 1
//   num_layers      = 2
//   hidden_size     = 32
//   lr              = 0.001
//   num_epochs      = 10
//   device          = "cpu"      # "cpu" | "gpu"
//   seed            = 42
//
//   [data]
//   train_path     = "data/train.csv"
//   test_path      = "data/test.csv"
//   dev_size       = 0.2
//   keep_zero_tail = true

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ml::model::SequenceRegressorConfig;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("model.parameters.time_window must be at least 2, got {0}")]
    TimeWindow(usize),

    #[error("model.parameters.{field} must be at least 1")]
    Zero { field: &'static str },

    #[error(
        "sequence_length ({sequence_length}) * input_size ({input_size}) must equal \
         time_window - 1 ({width})"
    )]
    ShapeMismatch { sequence_length: usize, input_size: usize, width: usize },

    #[error("model.parameters.lr must be a positive number, got {0}")]
    LearningRate(f64),

    #[error("model.parameters.label must not be empty")]
    EmptyLabel,

    #[error("data.{0} is required in {1} mode")]
    MissingPath(&'static str, RunMode),

    #[error("data.dev_size must be between 0 and 1 (exclusive), got {0}")]
    DevSize(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Train,
    Test,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Train => write!(f, "train"),
            RunMode::Test  => write!(f, "test"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Cpu,
    #[serde(alias = "cuda", alias = "wgpu")]
    #[value(alias = "cuda", alias = "wgpu")]
    Gpu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub model: ModelSettings,
    pub data:  DataSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub parameters: ModelParameters,
    #[serde(default)]
    pub pre_trained: String,
    pub mode: RunMode,
    #[serde(default)]
    pub save_path: String,
    #[serde(default)]
    pub metrics_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub label:           String,
    pub time_window:     usize,
    pub input_size:      usize,
    pub sequence_length: usize,
    pub num_layers:      usize,
    // older configs carry the misspelt key
    #[serde(alias = "hidden_szie")]
    pub hidden_size:     usize,
    pub lr:              f64,
    pub num_epochs:      usize,
    #[serde(default)]
    pub device:          DeviceKind,
    #[serde(default = "default_seed")]
    pub seed:            u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default)]
    pub train_path: String,
    #[serde(default)]
    pub test_path: String,
    #[serde(default = "default_dev_size")]
    pub dev_size: f64,
    #[serde(default = "default_keep_zero_tail")]
    pub keep_zero_tail: bool,
}

fn default_seed() -> u64 { 42 }

fn default_dev_size() -> f64 { 0.2 }

fn default_keep_zero_tail() -> bool { true }

/// `Some(s)` unless `s` is blank.
fn enabled(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

impl Settings {
    /// Check every constraint a run relies on, before any work starts.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let p = &self.model.parameters;

        if p.time_window < 2 {
            return Err(SettingsError::TimeWindow(p.time_window));
        }
        for (field, value) in [
            ("input_size", p.input_size),
            ("sequence_length", p.sequence_length),
            ("num_layers", p.num_layers),
            ("hidden_size", p.hidden_size),
            ("num_epochs", p.num_epochs),
        ] {
            if value == 0 {
                return Err(SettingsError::Zero { field });
            }
        }
        if p.sequence_length * p.input_size != p.time_window - 1 {
            return Err(SettingsError::ShapeMismatch {
                sequence_length: p.sequence_length,
                input_size:      p.input_size,
                width:           p.time_window - 1,
            });
        }
        if !(p.lr.is_finite() && p.lr > 0.0) {
            return Err(SettingsError::LearningRate(p.lr));
        }
        if p.label.trim().is_empty() {
            return Err(SettingsError::EmptyLabel);
        }

        match self.model.mode {
            RunMode::Train => {
                if enabled(&self.data.train_path).is_none() {
                    return Err(SettingsError::MissingPath("train_path", RunMode::Train));
                }
                let d = self.data.dev_size;
                if !(d > 0.0 && d < 1.0) {
                    return Err(SettingsError::DevSize(d));
                }
            }
            RunMode::Test => {
                if enabled(&self.data.test_path).is_none() {
                    return Err(SettingsError::MissingPath("test_path", RunMode::Test));
                }
            }
        }
        Ok(())
    }

    pub fn pre_trained(&self) -> Option<&str> { enabled(&self.model.pre_trained) }

    pub fn save_path(&self) -> Option<&str> { enabled(&self.model.save_path) }

    pub fn metrics_path(&self) -> Option<&str> { enabled(&self.model.metrics_path) }

    /// Architecture of the model these settings describe.
    pub fn model_config(&self) -> SequenceRegressorConfig {
        let p = &self.model.parameters;
        SequenceRegressorConfig::new(p.input_size, p.hidden_size, p.sequence_length, p.num_layers)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = r#"
        [model]
        pre_trained = ""
        mode = "train"
        save_path = "checkpoints/eurusd-"

        [model.parameters]
        label = "Close"
        time_window = 5
        input_size = 1
        sequence_length = 4
        num_layers = 2
        hidden_szie = 8
        lr = 0.001
        num_epochs = 3
        device = "cuda"

        [data]
        train_path = "data/train.csv"
        test_path = "data/test.csv"
        dev_size = 0.25
    "#;

    fn sample() -> Settings {
        toml::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_parses_with_defaults_and_aliases() {
        let s = sample();
        assert_eq!(s.model.mode, RunMode::Train);
        assert_eq!(s.model.parameters.hidden_size, 8);
        assert_eq!(s.model.parameters.device, DeviceKind::Gpu);
        assert_eq!(s.model.parameters.seed, 42);
        assert!(s.data.keep_zero_tail);
        assert_eq!(s.pre_trained(), None);
        assert_eq!(s.save_path(), Some("checkpoints/eurusd-"));
        assert_eq!(s.metrics_path(), None);
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn test_window_must_match_sequence_shape() {
        let mut s = sample();
        s.model.parameters.sequence_length = 2;
        assert_eq!(
            s.validate(),
            Err(SettingsError::ShapeMismatch { sequence_length: 2, input_size: 1, width: 4 })
        );

        s.model.parameters.input_size = 2;
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut s = sample();
        s.model.parameters.time_window = 1;
        assert_eq!(s.validate(), Err(SettingsError::TimeWindow(1)));

        let mut s = sample();
        s.model.parameters.num_layers = 0;
        assert_eq!(s.validate(), Err(SettingsError::Zero { field: "num_layers" }));

        let mut s = sample();
        s.model.parameters.lr = 0.0;
        assert_eq!(s.validate(), Err(SettingsError::LearningRate(0.0)));

        let mut s = sample();
        s.model.parameters.label = "  ".into();
        assert_eq!(s.validate(), Err(SettingsError::EmptyLabel));

        let mut s = sample();
        s.data.dev_size = 1.0;
        assert_eq!(s.validate(), Err(SettingsError::DevSize(1.0)));
    }

    #[test]
    fn test_paths_required_per_mode() {
        let mut s = sample();
        s.data.train_path.clear();
        assert_eq!(s.validate(), Err(SettingsError::MissingPath("train_path", RunMode::Train)));

        // test mode ignores the train path and the dev split
        s.model.mode  = RunMode::Test;
        s.data.dev_size = 5.0;
        assert_eq!(s.validate(), Ok(()));

        s.data.test_path.clear();
        assert_eq!(s.validate(), Err(SettingsError::MissingPath("test_path", RunMode::Test)));
    }

    #[test]
    fn test_model_config_follows_parameters() {
        let c = sample().model_config();
        assert_eq!(
            (c.input_size, c.hidden_size, c.sequence_length, c.num_layers),
            (1, 8, 4, 2)
        );
    }
}
