// ============================================================
// Layer 4 — Train/Dev Splitter
// ============================================================
// Shuffles samples and splits them into two sets:
//   - Training set: used to update model weights
//   - Dev set:      held out for the R² / MSLE report
//
// The dev set takes ceil(dev_size * n) samples, the training
// set the rest. The shuffle is driven by a seeded StdRng so a
// run with the same seed always sees the same split.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, dev).
///
/// # Arguments
/// * `samples`  - All available samples (consumed by this function)
/// * `dev_size` - Proportion held out, e.g. 0.2 = 20%
/// * `seed`     - Shuffle seed
pub fn split_train_dev<T>(mut samples: Vec<T>, dev_size: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let dev_len  = ((total as f64) * dev_size.clamp(0.0, 1.0)).ceil() as usize;
    let split_at = total - dev_len.min(total);

    // split_off(n) leaves [0..n) in `samples` and returns [n..total)
    let dev = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} dev ({}% / {}%)",
        samples.len(),
        dev.len(),
        (samples.len() * 100) / total.max(1),
        (dev.len()     * 100) / total.max(1),
    );

    (samples, dev)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, dev)      = split_train_dev(items, 0.2, 7);
        assert_eq!(train.len(), 80);
        assert_eq!(dev.len(),   20);
    }

    #[test]
    fn test_dev_share_rounds_up() {
        let items: Vec<usize> = (0..10).collect();
        let (train, dev)      = split_train_dev(items, 0.25, 7);
        assert_eq!(dev.len(),   3);
        assert_eq!(train.len(), 7);
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let (train, dev)      = split_train_dev(items, 0.3, 1);
        let mut all: Vec<usize> = train.into_iter().chain(dev).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_train_dev((0..30).collect::<Vec<usize>>(), 0.2, 42);
        let b = split_train_dev((0..30).collect::<Vec<usize>>(), 0.2, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let (train, dev) = split_train_dev(Vec::<usize>::new(), 0.2, 0);
        assert!(train.is_empty());
        assert!(dev.is_empty());
    }
}
