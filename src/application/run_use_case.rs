// ============================================================
// Layer 2 — RunUseCase
// ============================================================
// Wires validated settings into one train or test run:
//
//   Step 1: Pick the backend for the configured device
//   Step 2: Seed it and build model, Adam and MSE criterion
//   Step 3: Optionally restore a checkpoint (fresh on failure)
//
//   train mode                       test mode
//   ──────────                       ─────────
//   Step 4: Load train CSV           Step 4: Load test CSV
//   Step 5: Window the label column  Step 5: Window the label column
//   Step 6: Seeded train/dev split   Step 6: Evaluate every window
//   Step 7: Train, one sample a step
//   Step 8: Evaluate on dev
//   Step 9: Save a checkpoint named by R²
//
// The device is decided here, once; everything below receives
// it through a RunContext.

use anyhow::{Context, Result};
use burn::{
    backend::{
        ndarray::NdArrayDevice,
        wgpu::WgpuDevice,
        Autodiff, NdArray, Wgpu,
    },
    module::{AutodiffModule, Module},
    optim::{AdamConfig, Optimizer},
    tensor::backend::AutodiffBackend,
};
use std::path::{Path, PathBuf};

use crate::application::settings::{DeviceKind, RunMode, Settings};
use crate::data::{
    dataset::WindowedDataset,
    loader::CsvLoader,
    splitter::split_train_dev,
    tensor_adapter::TensorAdapter,
    windowing::create_sequence,
};
use crate::domain::traits::SeriesSource;
use crate::infra::{
    checkpoint::{self, CheckpointManager},
    metrics::MetricsLogger,
};
use crate::ml::{
    context::RunContext,
    criterion::Criterion,
    evaluator::{evaluate, Evaluation},
    model::SequenceRegressor,
    progress::ConsoleProgress,
    trainer::{AdamOptimizer, TrainReport, Trainer, TrainerConfig},
};

type CpuBackend = Autodiff<NdArray<f64>>;
type GpuBackend = Autodiff<Wgpu>;

/// Outcome of one run, for the CLI to print.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode:       RunMode,
    pub r2:         f64,
    pub msle:       f64,
    /// Number of windows the scores were computed over
    pub evaluated:  usize,
    /// Whether the configured checkpoint was restored
    pub resumed:    bool,
    pub checkpoint: Option<PathBuf>,
    pub training:   Option<TrainReport>,
}

pub struct RunUseCase {
    settings: Settings,
}

impl RunUseCase {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn execute(&self) -> Result<RunReport> {
        self.settings.validate()?;

        match self.settings.model.parameters.device {
            DeviceKind::Cpu => Run::<CpuBackend>::new(&self.settings, NdArrayDevice::Cpu).execute(),
            DeviceKind::Gpu => Run::<GpuBackend>::new(&self.settings, WgpuDevice::default()).execute(),
        }
    }
}

/// One run on one backend.
struct Run<'a, B: AutodiffBackend> {
    settings: &'a Settings,
    ctx:      RunContext<B>,
}

type Model<B> = SequenceRegressor<B>;

/// Model, optimizer and criterion at the start of a run.
struct Initial<B: AutodiffBackend> {
    model:     Model<B>,
    optim:     AdamOptimizer<B, Model<B>>,
    criterion: Criterion,
    resumed:   bool,
}

impl<'a, B: AutodiffBackend> Run<'a, B> {
    fn new(settings: &'a Settings, device: B::Device) -> Self {
        let ctx = RunContext::new(device, settings.model.parameters.seed);
        Self { settings, ctx }
    }

    fn execute(&self) -> Result<RunReport> {
        let initial = self.initial_state();

        match self.settings.model.mode {
            RunMode::Train => self.train(initial),
            RunMode::Test  => self.test(initial),
        }
    }

    /// Fresh state, replaced by the configured checkpoint when it loads cleanly.
    fn initial_state(&self) -> Initial<B> {
        let model_config = self.settings.model_config();
        let model: Model<B> = model_config.init(&self.ctx.device);
        let optim: AdamOptimizer<B, Model<B>> = AdamConfig::new().init();

        tracing::info!(
            "Model ready: {} parameters ({:?})",
            model.num_params(),
            model_config,
        );

        let Some(path) = self.settings.pre_trained() else {
            return Initial { model, optim, criterion: Criterion::mse(), resumed: false };
        };

        match checkpoint::load::<B, _, AdamOptimizer<B, Model<B>>, _>(
            Path::new(path),
            &model,
            &model_config,
            &self.ctx.device,
        ) {
            Ok(restored) => {
                tracing::info!("Resuming from '{}' (dev R2 {:.3})", path, restored.score);
                Initial {
                    model:     restored.model,
                    optim:     optim.load_record(restored.optimizer),
                    criterion: restored.criterion,
                    resumed:   true,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load the model properly, starting fresh: {e}");
                Initial { model, optim, criterion: Criterion::mse(), resumed: false }
            }
        }
    }

    fn windowed(&self, path: &str) -> Result<WindowedDataset> {
        let params = &self.settings.model.parameters;

        let raw = CsvLoader::new(path).load()?;
        tracing::info!("Loaded {} data with shape of {:?}", raw.source(), raw.shape());

        let column   = raw.column(&params.label)?;
        let windowed = create_sequence(column, params.time_window)?;
        let samples  = if self.settings.data.keep_zero_tail {
            windowed.samples
        } else {
            windowed.into_populated()
        };
        Ok(WindowedDataset::new(samples))
    }

    fn score(&self, model: &Model<B>, samples: &WindowedDataset) -> Result<Evaluation> {
        tracing::info!("Evaluating the model on {} windows", samples.len());
        let adapter = TensorAdapter::<B::InnerBackend>::new(self.ctx.device.clone());
        evaluate(&model.valid(), samples.samples(), &adapter)
    }

    fn train(&self, initial: Initial<B>) -> Result<RunReport> {
        let params  = &self.settings.model.parameters;
        let data    = self.windowed(&self.settings.data.train_path)?;
        let (train, dev) = split_train_dev(
            data.into_samples(),
            self.settings.data.dev_size,
            params.seed,
        );
        let train = WindowedDataset::new(train);
        let dev   = WindowedDataset::new(dev);
        tracing::info!("Split: {} train, {} dev", train.len(), dev.len());

        let logger = self
            .settings
            .metrics_path()
            .map(MetricsLogger::new)
            .transpose()?;

        tracing::info!("Training the model for {} epochs", params.num_epochs);
        let mut trainer = Trainer::new(
            initial.optim,
            initial.criterion,
            self.ctx.adapter(),
            TrainerConfig { num_epochs: params.num_epochs, lr: params.lr },
        );
        let (model, training) = trainer.fit(
            initial.model,
            train.samples(),
            &mut ConsoleProgress::new(logger),
        )?;

        let evaluation = self.score(&model, &dev)?;
        let r2 = evaluation.r2()?;

        let checkpoint = match self.settings.save_path() {
            Some(save_path) => {
                tracing::info!("Saving model. path: {}", save_path);
                let path = CheckpointManager::new(save_path)
                    .save::<B, _, _, _>(
                        &model,
                        trainer.optimizer(),
                        trainer.criterion(),
                        &self.settings.model_config(),
                        r2,
                    )
                    .context("Checkpoint save failed")?;
                Some(path)
            }
            None => None,
        };

        Ok(RunReport {
            mode:      RunMode::Train,
            r2,
            msle:      evaluation.msle()?,
            evaluated: evaluation.len(),
            resumed:   initial.resumed,
            checkpoint,
            training:  Some(training),
        })
    }

    fn test(&self, initial: Initial<B>) -> Result<RunReport> {
        let data       = self.windowed(&self.settings.data.test_path)?;
        let evaluation = self.score(&initial.model, &data)?;

        Ok(RunReport {
            mode:       RunMode::Test,
            r2:         evaluation.r2()?,
            msle:       evaluation.msle()?,
            evaluated:  evaluation.len(),
            resumed:    initial.resumed,
            checkpoint: None,
            training:   None,
        })
    }
}
