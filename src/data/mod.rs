// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from a CSV file on disk to tensors on the device.
//
//   CSV file
//       │
//       ▼
//   CsvLoader         → reads the file into a RawDataset
//       │
//       ▼
//   create_sequence   → carves the label column into windows
//       │
//       ▼
//   split_train_dev   → seeded shuffle + hold-out (train mode)
//       │
//       ▼
//   WindowedDataset   → ordered samples handed to the trainer
//       │
//       ▼
//   TensorAdapter     → builds input/target tensors on the device

/// Loads a delimited file into a RawDataset
pub mod loader;

/// Sequence-windowing transform
pub mod windowing;

/// Ordered window samples of one run
pub mod dataset;

/// Shuffles and splits samples into train/dev sets
pub mod splitter;

/// Numeric arrays → device tensors and back
pub mod tensor_adapter;
