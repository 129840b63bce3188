// ============================================================
// Layer 5 — Run Context
// ============================================================
// The device and seed of one run, handed to every component
// that creates tensors.
//
// Backend RNGs are process-wide, so a context owns the RNG
// for as long as it lives: a second context on the same
// process waits until the first is dropped. Parameter
// initialisation under a context therefore depends on its
// seed alone.

use burn::prelude::*;
use std::sync::{Mutex, MutexGuard};

use crate::data::tensor_adapter::TensorAdapter;

static RNG_OWNER: Mutex<()> = Mutex::new(());

#[derive(Debug)]
pub struct RunContext<B: Backend> {
    pub device: B::Device,
    _rng:       MutexGuard<'static, ()>,
}

impl<B: Backend> RunContext<B> {
    /// Takes ownership of the backend RNG and seeds it.
    pub fn new(device: B::Device, seed: u64) -> Self {
        // the RNG is reseeded below, so a poisoned lock is still usable
        let rng = RNG_OWNER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        B::seed(seed);
        tracing::info!("Run context ready: device={:?}, seed={}", device, seed);
        Self { device, _rng: rng }
    }

    pub fn adapter(&self) -> TensorAdapter<B> {
        TensorAdapter::new(self.device.clone())
    }
}
