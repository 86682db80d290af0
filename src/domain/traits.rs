// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Collaborator contracts that the orchestrator programs
// against. Concrete policies live in other layers:
//
//   EpochScheduler  → ml::schedule::StepDecay
//
// Model, optimizer, and data-loader contracts are expressed
// with Burn types, so they live in the ML layer
// (ml::model::ImageClassifier, burn::optim::Optimizer,
// burn::data::dataloader::DataLoader).

// ─── EpochScheduler ───────────────────────────────────────────────────────────
/// A learning-rate policy advanced once per epoch.
///
/// The orchestrator only reads the current rate and advances
/// the schedule; the decay policy itself is opaque to it.
///
/// Implementations:
///   - StepDecay → multiply by gamma every `step_size` epochs
pub trait EpochScheduler {
    /// Learning rate to use for the next training pass.
    fn learning_rate(&self) -> f64;

    /// Move the schedule forward by one epoch.
    fn advance(&mut self);
}
