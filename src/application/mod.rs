// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (training, evaluating, or crawling).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here (that's Layer 1)
//   - No direct file or network access (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Think of this layer as the "director" — it tells other
// layers what to do but doesn't do the work itself.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The sentiment training workflow (and the shared run options)
pub mod train_use_case;

// The aspect-based training workflow
pub mod train_absa_use_case;

// The corpus evaluation / case report workflow
pub mod evaluate_use_case;

// The review crawling workflow
pub mod crawl_use_case;
