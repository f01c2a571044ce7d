// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What lives in the checkpoint directory:
//   sentiment_model.mpk.gz — sentiment classifier weights
//   absa_model.mpk.gz      — aspect classifier weights
//   train_options.json     — the run options
//
// Each training epoch overwrites its model file, so a run keeps
// exactly one checkpoint per task. Aspect training reads the
// sentiment file once at start to seed its encoder.
//
// Why save the options separately?
//   Evaluation needs the exact encoder dimensions (d_model,
//   num_layers, ...) to rebuild the model before the weights
//   can be loaded into it.
//
// Burn's CompactRecorder:
//   - Serialises parameters to MessagePack format
//   - Compresses with gzip
//   - Type-safe: loading fails if the architecture differs
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    module::Module,
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainOptions;

/// File stem of the sentiment model checkpoint
pub const SENTIMENT_MODEL_FILE: &str = "sentiment_model";

/// File stem of the aspect model checkpoint
pub const ABSA_MODEL_FILE: &str = "absa_model";

const OPTIONS_FILE: &str = "train_options.json";

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save model weights under `name`, overwriting any previous
    /// file. Works for any Burn module, so both classifiers share
    /// this path.
    pub fn save_model<B: Backend, M: Module<B>>(&self, model: &M, name: &str) -> Result<()> {
        // Recorder adds the .mpk.gz extension itself
        let path = self.dir.join(name);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        tracing::debug!("Saved checkpoint '{}'", path.display());
        Ok(())
    }

    /// Restore the weights saved under `name` into `model`.
    /// The model must have the architecture the checkpoint was
    /// written with, or loading fails.
    pub fn load_model<B: Backend, M: Module<B>>(
        &self,
        model:  M,
        name:   &str,
        device: &B::Device,
    ) -> Result<M> {
        let path = self.dir.join(name);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display()
                )
            })?;

        tracing::info!("Loaded checkpoint '{}'", path.display());
        Ok(model.load_record(record))
    }

    /// Save the run options to JSON. Called before training
    /// starts so evaluation can rebuild the same model.
    pub fn save_options(&self, opts: &TrainOptions) -> Result<()> {
        let path = self.dir.join(OPTIONS_FILE);
        let json = serde_json::to_string_pretty(opts)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write options to '{}'", path.display()))?;

        tracing::debug!("Saved run options to '{}'", path.display());
        Ok(())
    }

    /// Load the run options from JSON.
    pub fn load_options(&self) -> Result<TrainOptions> {
        let path = self.dir.join(OPTIONS_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read options from '{}'. Run 'train' before this command.",
                    path.display()
                )
            })?;

        Ok(serde_json::from_str(&json)?)
    }
}
