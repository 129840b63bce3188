// ============================================================
// Layer 4 — Windowed Dataset
// ============================================================
// Ordered window samples of one run. Training walks them one
// at a time; evaluation stacks them into a single batch.

use crate::domain::window::WindowSample;

pub struct WindowedDataset {
    samples: Vec<WindowSample>,
}

impl WindowedDataset {
    pub fn new(samples: Vec<WindowSample>) -> Self { Self { samples } }

    pub fn samples(&self) -> &[WindowSample] { &self.samples }

    pub fn into_samples(self) -> Vec<WindowSample> { self.samples }

    pub fn len(&self) -> usize { self.samples.len() }

    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_sample_order() {
        let ds = WindowedDataset::new(vec![
            WindowSample::new(vec![1.0, 2.0], 3.0),
            WindowSample::new(vec![4.0, 5.0], 6.0),
        ]);
        assert_eq!(ds.len(), 2);
        assert!(!ds.is_empty());
        assert_eq!(ds.samples()[1].target, 6.0);

        let targets: Vec<f64> = ds.into_samples().into_iter().map(|s| s.target).collect();
        assert_eq!(targets, vec![3.0, 6.0]);
    }
}
