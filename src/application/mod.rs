// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Coordinates the other layers to reach one goal:
//
//   train    — generate data, run the epoch loop, write artefacts
//   evaluate — reload a checkpoint and re-score the test split
//
// No tensor math lives here and nothing is printed; the CLI
// layer reports the returned summaries.

// The training workflow
pub mod train_use_case;

// Re-scoring a saved checkpoint
pub mod evaluate_use_case;
