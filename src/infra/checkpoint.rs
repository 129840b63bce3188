// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the joint state of one run as a single
// file. What goes into a checkpoint:
//
//   model_state_dict      — model parameters (Burn record)
//   optimizer_state_dict  — Adam moments per parameter (Burn record)
//   criterion_state_dict  — loss kind + reduction (JSON)
//   model_config          — architecture the record belongs to
//   created_at, score     — when it was written and how well it did
//
// Records are serialised with Burn's BinBytesRecorder at double
// precision; the bundle around them with bincode, behind an
// 8-byte header.
//
// File naming convention:
//   {save_path}{YYYY-MM-DD}--{HH-MM}{score:.3}.ckpt
//   e.g. checkpoints/eurusd-2024-03-05--14-070.912.ckpt
//
// A checkpoint is written to `<name>.tmp` first and renamed
// into place, so an interrupted save never leaves a partial
// bundle under the final name.

use burn::{
    module::AutodiffModule,
    optim::Optimizer,
    prelude::*,
    record::{BinBytesRecorder, DoublePrecisionSettings, Record, Recorder},
    tensor::backend::AutodiffBackend,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::ml::criterion::{Criterion, CriterionState};

pub const EXTENSION: &str = "ckpt";

const MAGIC: &[u8; 8] = b"FXCKPT01";

type BlobRecorder = BinBytesRecorder<DoublePrecisionSettings>;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint '{}' does not exist", .path.display())]
    Missing { path: PathBuf },

    #[error("cannot read checkpoint '{}': {source}", .path.display())]
    Read { path: PathBuf, #[source] source: io::Error },

    #[error("'{}' is not a valid checkpoint: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("'{blob}' in '{}' cannot be restored: {reason}", .path.display())]
    Blob { path: PathBuf, blob: &'static str, reason: String },

    #[error("checkpoint '{}' belongs to model {found}, current model is {expected}", .path.display())]
    ArchitectureMismatch { path: PathBuf, found: String, expected: String },

    #[error("cannot encode '{blob}': {reason}")]
    Encode { blob: &'static str, reason: String },

    #[error("cannot write checkpoint '{}': {source}", .path.display())]
    Write { path: PathBuf, #[source] source: io::Error },
}

/// On-disk layout, after the header.
#[derive(Debug, Serialize, Deserialize)]
struct Bundle {
    created_at:           String,
    score:                f64,
    model_config:         String,
    model_state_dict:     Vec<u8>,
    optimizer_state_dict: Vec<u8>,
    criterion_state_dict: Vec<u8>,
}

/// Everything a checkpoint restores, decoded and checked.
///
/// `model` already has the saved parameters loaded. The
/// optimizer record is handed back as-is for the caller to
/// apply with `Optimizer::load_record`.
pub struct Restored<M, OR> {
    pub model:      M,
    pub optimizer:  OR,
    pub criterion:  Criterion,
    pub score:      f64,
}

/// Writes checkpoints under one configured path prefix.
pub struct CheckpointManager {
    save_path: String,
}

impl CheckpointManager {
    /// `save_path` is a prefix, not a directory: the date, time
    /// and score are appended to it verbatim.
    pub fn new(save_path: impl Into<String>) -> Self {
        Self { save_path: save_path.into() }
    }

    /// Final file name for a checkpoint written at `now` with `score`.
    pub fn path_for(&self, now: NaiveDateTime, score: f64) -> PathBuf {
        PathBuf::from(format!(
            "{}{}--{}{:.3}.{}",
            self.save_path,
            now.format("%Y-%m-%d"),
            now.format("%H-%M"),
            score,
            EXTENSION,
        ))
    }

    /// Save model, optimizer and criterion as one bundle, named
    /// from the current local time and `score`.
    pub fn save<B, M, O, C>(
        &self,
        model:        &M,
        optim:        &O,
        criterion:    &Criterion,
        model_config: &C,
        score:        f64,
    ) -> Result<PathBuf, CheckpointError>
    where
        B: AutodiffBackend,
        M: AutodiffModule<B>,
        O: Optimizer<M, B>,
        C: Serialize,
    {
        let now  = Local::now().naive_local();
        let path = self.path_for(now, score);

        let bundle = Bundle {
            created_at:           now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            score,
            model_config:         config_json(model_config)?,
            model_state_dict:     encode::<B, _>(model.clone().into_record(), "model_state_dict")?,
            optimizer_state_dict: encode::<B, _>(optim.to_record(), "optimizer_state_dict")?,
            criterion_state_dict: serde_json::to_vec(&criterion.state()).map_err(|e| {
                CheckpointError::Encode { blob: "criterion_state_dict", reason: e.to_string() }
            })?,
        };

        let mut bytes = MAGIC.to_vec();
        bytes.extend(
            bincode::serde::encode_to_vec(&bundle, bincode::config::standard()).map_err(|e| {
                CheckpointError::Encode { blob: "bundle", reason: e.to_string() }
            })?,
        );

        write_atomically(&path, &bytes)
            .map_err(|source| CheckpointError::Write { path: path.clone(), source })?;

        tracing::info!("Saved checkpoint '{}' ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Read a checkpoint and check it against the current model.
///
/// Nothing the caller owns is touched: on any error the fresh
/// model, optimizer and criterion are still usable.
pub fn load<B, M, O, C>(
    path:         &Path,
    model:        &M,
    model_config: &C,
    device:       &B::Device,
) -> Result<Restored<M, <O as Optimizer<M, B>>::Record>, CheckpointError>
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
    O: Optimizer<M, B>,
    C: Serialize,
{
    let bundle = read_bundle(path)?;

    let expected = config_json(model_config)?;
    if !same_json(&bundle.model_config, &expected) {
        return Err(CheckpointError::ArchitectureMismatch {
            path:     path.to_path_buf(),
            found:    bundle.model_config,
            expected,
        });
    }

    let blob_error = |blob: &'static str, reason: String| CheckpointError::Blob {
        path: path.to_path_buf(),
        blob,
        reason,
    };

    let criterion_state: CriterionState = serde_json::from_slice(&bundle.criterion_state_dict)
        .map_err(|e| blob_error("criterion_state_dict", e.to_string()))?;
    let criterion = Criterion::from_state(criterion_state)
        .map_err(|e| blob_error("criterion_state_dict", e.to_string()))?;

    let model_record: <M as Module<B>>::Record =
        decode::<B, _>(bundle.model_state_dict, device)
            .map_err(|reason| blob_error("model_state_dict", reason))?;
    let optimizer = decode::<B, _>(bundle.optimizer_state_dict, device)
        .map_err(|reason| blob_error("optimizer_state_dict", reason))?;

    let loaded = model.clone().load_record(model_record);
    if loaded.num_params() != model.num_params() {
        return Err(CheckpointError::ArchitectureMismatch {
            path:     path.to_path_buf(),
            found:    format!("{} parameters", loaded.num_params()),
            expected: format!("{} parameters", model.num_params()),
        });
    }

    tracing::info!(
        "Restored checkpoint '{}' (created {}, score {:.3})",
        path.display(),
        bundle.created_at,
        bundle.score,
    );

    Ok(Restored {
        model: loaded,
        optimizer,
        criterion,
        score: bundle.score,
    })
}

fn read_bundle(path: &Path) -> Result<Bundle, CheckpointError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CheckpointError::Missing { path: path.to_path_buf() },
        _ => CheckpointError::Read { path: path.to_path_buf(), source },
    })?;

    let corrupt = |reason: String| CheckpointError::Corrupt { path: path.to_path_buf(), reason };

    let payload = bytes
        .strip_prefix(&MAGIC[..])
        .ok_or_else(|| corrupt("missing checkpoint header".to_string()))?;

    let (bundle, _) = bincode::serde::decode_from_slice::<Bundle, _>(payload, bincode::config::standard())
        .map_err(|e| corrupt(e.to_string()))?;
    Ok(bundle)
}

fn encode<B: Backend, R: Record<B>>(record: R, blob: &'static str) -> Result<Vec<u8>, CheckpointError> {
    <BlobRecorder as Recorder<B>>::record(&BlobRecorder::default(), record, ())
        .map_err(|e| CheckpointError::Encode { blob, reason: format!("{e:?}") })
}

fn decode<B: Backend, R: Record<B>>(bytes: Vec<u8>, device: &B::Device) -> Result<R, String> {
    <BlobRecorder as Recorder<B>>::load(&BlobRecorder::default(), bytes, device)
        .map_err(|e| format!("{e:?}"))
}

fn config_json<C: Serialize>(config: &C) -> Result<String, CheckpointError> {
    serde_json::to_string(config)
        .map_err(|e| CheckpointError::Encode { blob: "model_config", reason: e.to_string() })
}

/// Compare two JSON documents structurally (key order is irrelevant).
fn same_json(a: &str, b: &str) -> bool {
    match (
        serde_json::from_str::<serde_json::Value>(a),
        serde_json::from_str::<serde_json::Value>(b),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
