// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and enums that define the core concepts
// of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - NO ML-specific code
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A sentiment-labelled movie review
pub mod review;

// Polarity labels and soft aspect targets
pub mod label;

// Core abstractions (traits) that other layers implement
pub mod traits;
