// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly, except the data
// layer's Dataset/Batcher trait impls.
//
// What's in this layer:
//
//   model.rs     — The shared review encoder and the two
//                  classifier heads:
//                  • Token / positional / segment embeddings
//                  • Multi-head self-attention blocks
//                  • First-token pooling
//                  • Single sentiment head (2 classes)
//                  • Dual aspect heads (2x2 classes, each with
//                    its own dropout rate)
//
//   schedule.rs  — Linear warmup learning-rate schedule
//
//   trainer.rs   — The epoch loops for both tasks: forward,
//                  loss, backward, gradient clipping, AdamW
//                  step, accuracy bookkeeping, checkpointing
//
//   evaluator.rs — Batch inference over a corpus, accuracy,
//                  and the correct/incorrect case reports
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need
//            Devlin et al. (2019) BERT

/// Review encoder and classifier head architectures
pub mod model;

/// Warmup learning-rate schedule
pub mod schedule;

/// Training loops with evaluation and checkpointing
pub mod trainer;

/// Corpus-level inference and case reports
pub mod evaluator;
