// ============================================================
// Layer 5 — Training Loops
// ============================================================
// One epoch loop per task, both with the same phase structure:
//
//   TRAIN — forward, loss, backward, gradient-norm clipping,
//           AdamW step at the warmup-scheduled learning rate,
//           running accuracy, a log line every log_interval
//           batches
//   EVAL  — model.valid() on the inner backend, accuracy only
//
// Each epoch ends with a checkpoint write that overwrites the
// previous epoch's file, and one metrics CSV row.
//
// Key Burn insight:
//   - Training uses TrainBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns the model on EvalBackend (Wgpu)
//   - The evaluation batcher must also use EvalBackend
//   - argmax(1) returns [batch, 1] so we flatten before .equal()
//
// ABSA training does not start from scratch: its encoder is
// initialised once, at start, from the sentiment checkpoint.
//
// Reference: Burn Book §5, Loshchilov & Hutter (2019) AdamW

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    grad_clipping::GradientClippingConfig,
    module::AutodiffModule,
    optim::{AdamWConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainOptions;
use crate::data::{
    batcher::ReviewBatcher,
    dataset::{AspectItem, ReviewDataset, SentimentItem},
};
use crate::infra::{
    checkpoint::{CheckpointManager, ABSA_MODEL_FILE, SENTIMENT_MODEL_FILE},
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::model::{AbsaModelConfig, SentimentModelConfig};
use crate::ml::schedule::LinearWarmupSchedule;

type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;
type EvalBackend  = burn::backend::Wgpu;

/// AdamW weight decay applied to all parameters.
const WEIGHT_DECAY: f32 = 0.01;

// ─── Sentiment training ───────────────────────────────────────────────────────

pub fn train_sentiment(
    opts:          &TrainOptions,
    train_dataset: ReviewDataset<SentimentItem>,
    eval_dataset:  ReviewDataset<SentimentItem>,
    ckpt_manager:  CheckpointManager,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = SentimentModelConfig::new(opts.encoder_config(), opts.drop_out_rate);
    let mut model = model_cfg.init::<TrainBackend>(&device);
    tracing::info!(
        "Sentiment model ready: {} layers, d_model={}",
        opts.num_layers, opts.d_model,
    );

    // ── AdamW optimiser with gradient-norm clipping ───────────────────────────
    let optim_cfg = AdamWConfig::new()
        .with_epsilon(1e-8)
        .with_weight_decay(WEIGHT_DECAY)
        .with_grad_clipping(Some(GradientClippingConfig::Norm(opts.max_grad_norm)));
    let mut optim = optim_cfg.init();

    // ── Learning-rate schedule over the whole run ─────────────────────────────
    let batches_per_epoch = batch_count(train_dataset.sample_count(), opts.batch_size);
    let total_steps       = batches_per_epoch * opts.num_epochs;
    let mut schedule =
        LinearWarmupSchedule::new(opts.learning_rate, total_steps, opts.warmup_ratio);

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_batcher = ReviewBatcher::<TrainBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(opts.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(train_dataset);

    let eval_batcher = ReviewBatcher::<EvalBackend>::new(device.clone());
    let eval_loader  = DataLoaderBuilder::new(eval_batcher)
        .batch_size(opts.batch_size)
        .num_workers(1)
        .build(eval_dataset);

    let metrics = MetricsLogger::new(&opts.checkpoint_dir)?;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=opts.num_epochs {

        // ── TRAIN phase ───────────────────────────────────────────────────────
        let mut loss_sum      = 0.0f64;
        let mut batches       = 0usize;
        let mut correct       = 0usize;
        let mut seen          = 0usize;

        for (batch_id, batch) in train_loader.iter().enumerate() {
            let batch_size = batch.labels.dims()[0];

            let (loss, logits) = model.forward_loss(
                batch.token_ids,
                batch.segment_ids,
                batch.valid_lengths,
                batch.labels.clone(),
            );

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            loss_sum += loss_val;
            batches  += 1;

            // Running accuracy over the batches seen so far
            let preds = logits.argmax(1).flatten::<1>(0, 1);
            let hits: i64 = preds
                .equal(batch.labels)
                .int().sum().into_scalar().elem::<i64>();
            correct += hits as usize;
            seen    += batch_size;

            // Backward pass, clipped AdamW step at the scheduled rate
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(schedule.step(), model, grads);

            if batch_id % opts.log_interval == 0 {
                tracing::info!(
                    "epoch {} batch {} loss {:.4} train accuracy {:.4}",
                    epoch, batch_id + 1, loss_val,
                    correct as f64 / seen.max(1) as f64,
                );
            }
        }

        let train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let train_acc  = if seen > 0 { correct as f64 / seen as f64 } else { 0.0 };
        tracing::info!("epoch {} train accuracy {:.4}", epoch, train_acc);

        // ── EVAL phase ────────────────────────────────────────────────────────
        // model.valid() → SentimentModel<EvalBackend>, dropout disabled
        let model_eval = model.valid();

        let mut eval_correct = 0usize;
        let mut eval_seen    = 0usize;

        for batch in eval_loader.iter() {
            let logits = model_eval.forward(
                batch.token_ids,
                batch.segment_ids,
                batch.valid_lengths,
            );

            let preds = logits.argmax(1).flatten::<1>(0, 1);
            let hits: i64 = preds
                .equal(batch.labels.clone())
                .int().sum().into_scalar().elem::<i64>();
            eval_correct += hits as usize;
            eval_seen    += batch.labels.dims()[0];
        }

        let eval_acc = if eval_seen > 0 { eval_correct as f64 / eval_seen as f64 } else { 0.0 };
        tracing::info!("epoch {} eval accuracy {:.4}", epoch, eval_acc);

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | train_acc={:.1}% | eval_acc={:.1}%",
            epoch, opts.num_epochs, train_loss,
            train_acc * 100.0, eval_acc * 100.0,
        );

        // ── Checkpoint + metrics row ──────────────────────────────────────────
        ckpt_manager.save_model(&model, SENTIMENT_MODEL_FILE)?;
        tracing::info!("Checkpoint overwritten after epoch {}", epoch);

        metrics.log(&EpochMetrics::new(epoch, train_loss, train_acc, eval_acc))?;
    }

    tracing::info!("Sentiment training complete");
    Ok(())
}

// ─── Aspect training ──────────────────────────────────────────────────────────

pub fn train_absa(
    opts:          &TrainOptions,
    train_dataset: ReviewDataset<AspectItem>,
    eval_dataset:  ReviewDataset<AspectItem>,
    ckpt_manager:  CheckpointManager,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);

    // ── Build model, encoder taken from the sentiment checkpoint ──────────────
    // The sentiment run already fine-tuned the encoder on movie
    // reviews; the aspect heads train on top of that start.
    let sentiment_cfg = SentimentModelConfig::new(opts.encoder_config(), opts.drop_out_rate);
    let sentiment     = sentiment_cfg.init::<TrainBackend>(&device);
    let sentiment     = ckpt_manager.load_model(sentiment, SENTIMENT_MODEL_FILE, &device)?;

    let model_cfg = AbsaModelConfig::new(
        opts.encoder_config(),
        opts.drop_out_rate_a,
        opts.drop_out_rate_b,
    );
    let mut model = model_cfg.init::<TrainBackend>(&device).with_encoder(sentiment.encoder);
    tracing::info!("Aspect model initialised from sentiment checkpoint");

    let optim_cfg = AdamWConfig::new()
        .with_epsilon(1e-8)
        .with_weight_decay(WEIGHT_DECAY)
        .with_grad_clipping(Some(GradientClippingConfig::Norm(opts.max_grad_norm)));
    let mut optim = optim_cfg.init();

    let batches_per_epoch = batch_count(train_dataset.sample_count(), opts.batch_size);
    let total_steps       = batches_per_epoch * opts.num_epochs;
    let mut schedule =
        LinearWarmupSchedule::new(opts.learning_rate, total_steps, opts.warmup_ratio);

    let train_batcher = ReviewBatcher::<TrainBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(opts.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(train_dataset);

    let eval_batcher = ReviewBatcher::<EvalBackend>::new(device.clone());
    let eval_loader  = DataLoaderBuilder::new(eval_batcher)
        .batch_size(opts.batch_size)
        .num_workers(1)
        .build(eval_dataset);

    let metrics = MetricsLogger::new(&opts.checkpoint_dir)?;

    for epoch in 1..=opts.num_epochs {

        // ── TRAIN phase ───────────────────────────────────────────────────────
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;
        let mut hits     = 0usize;
        let mut counted  = 0usize;

        for (batch_id, batch) in train_loader.iter().enumerate() {
            let (loss, output) = model.forward_loss(
                batch.token_ids,
                batch.segment_ids,
                batch.valid_lengths,
                batch.targets.clone(),
            );

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            loss_sum += loss_val;
            batches  += 1;

            // Accuracy counts hard slots only — a neutral (0.5, 0.5)
            // slot has no right answer to agree with.
            let (batch_hits, batch_counted) = hard_slot_hits(
                &tensor_values(output.primary),
                &tensor_values(output.secondary),
                &tensor_values(batch.targets),
            );
            hits    += batch_hits;
            counted += batch_counted;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(schedule.step(), model, grads);

            if batch_id % opts.log_interval == 0 {
                tracing::info!(
                    "epoch {} batch {} loss {:.4} train accuracy {:.4}",
                    epoch, batch_id + 1, loss_val,
                    hits as f64 / counted.max(1) as f64,
                );
            }
        }

        let train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let train_acc  = if counted > 0 { hits as f64 / counted as f64 } else { 0.0 };
        tracing::info!("epoch {} train accuracy {:.4}", epoch, train_acc);

        // ── EVAL phase ────────────────────────────────────────────────────────
        let model_eval = model.valid();

        let mut eval_hits    = 0usize;
        let mut eval_counted = 0usize;

        for batch in eval_loader.iter() {
            let output = model_eval.forward(
                batch.token_ids,
                batch.segment_ids,
                batch.valid_lengths,
            );

            let (batch_hits, batch_counted) = hard_slot_hits(
                &tensor_values(output.primary),
                &tensor_values(output.secondary),
                &tensor_values(batch.targets),
            );
            eval_hits    += batch_hits;
            eval_counted += batch_counted;
        }

        let eval_acc = if eval_counted > 0 {
            eval_hits as f64 / eval_counted as f64
        } else {
            0.0
        };
        tracing::info!("epoch {} eval accuracy {:.4}", epoch, eval_acc);

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | train_acc={:.1}% | eval_acc={:.1}%",
            epoch, opts.num_epochs, train_loss,
            train_acc * 100.0, eval_acc * 100.0,
        );

        ckpt_manager.save_model(&model, ABSA_MODEL_FILE)?;
        tracing::info!("Checkpoint overwritten after epoch {}", epoch);

        metrics.log(&EpochMetrics::new(epoch, train_loss, train_acc, eval_acc))?;
    }

    tracing::info!("Aspect training complete");
    Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Number of batches one epoch produces, counting the ragged tail.
fn batch_count(samples: usize, batch_size: usize) -> usize {
    (samples + batch_size - 1) / batch_size.max(1)
}

/// Flatten a rank-2 float tensor into its row-major values.
fn tensor_values<B: Backend>(tensor: Tensor<B, 2>) -> Vec<f32> {
    tensor.into_data().convert::<f32>().value
}

/// Count aspect-head agreements over the hard target slots.
///
/// `logits_a` / `logits_b` are row-major [batch, 2] head outputs,
/// `targets` is row-major [batch, 4] = [neg_a, pos_a, neg_b, pos_b].
/// Returns (hits, slots counted); neutral slots are skipped.
fn hard_slot_hits(logits_a: &[f32], logits_b: &[f32], targets: &[f32]) -> (usize, usize) {
    let mut hits    = 0usize;
    let mut counted = 0usize;

    for (row, target) in targets.chunks_exact(4).enumerate() {
        let slots = [
            (&logits_a[row * 2..row * 2 + 2], &target[0..2]),
            (&logits_b[row * 2..row * 2 + 2], &target[2..4]),
        ];
        for (logit, slot) in slots {
            if slot[0] == slot[1] {
                continue; // neutral
            }
            counted += 1;
            if (logit[1] > logit[0]) == (slot[1] > slot[0]) {
                hits += 1;
            }
        }
    }

    (hits, counted)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_count_includes_ragged_tail() {
        assert_eq!(batch_count(100, 10), 10);
        assert_eq!(batch_count(101, 10), 11);
        assert_eq!(batch_count(9, 10), 1);
        assert_eq!(batch_count(0, 10), 0);
    }

    #[test]
    fn test_hard_slot_hits_skips_neutral_slots() {
        // One row: slot A hard positive, slot B neutral
        let logits_a = [0.1, 0.9];
        let logits_b = [0.9, 0.1];
        let targets  = [0.0, 1.0, 0.5, 0.5];

        let (hits, counted) = hard_slot_hits(&logits_a, &logits_b, &targets);
        assert_eq!(counted, 1);
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_hard_slot_hits_counts_both_slots() {
        // One row, both slots hard: A predicted right, B predicted wrong
        let logits_a = [0.2, 0.8];
        let logits_b = [0.3, 0.7];
        let targets  = [0.0, 1.0, 1.0, 0.0];

        let (hits, counted) = hard_slot_hits(&logits_a, &logits_b, &targets);
        assert_eq!(counted, 2);
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_hard_slot_hits_all_neutral_counts_nothing() {
        let logits_a = [0.2, 0.8, 0.9, 0.1];
        let logits_b = [0.3, 0.7, 0.6, 0.4];
        let targets  = [0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5];

        let (hits, counted) = hard_slot_hits(&logits_a, &logits_b, &targets);
        assert_eq!(counted, 0);
        assert_eq!(hits, 0);
    }
}
