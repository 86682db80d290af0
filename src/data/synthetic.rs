// ============================================================
// Layer 4 — Synthetic Shapes Dataset
// ============================================================
// A seeded stand-in for a real labelled image set so the
// harness can run end to end without a download step.
//
// Each class owns one cell of a grid laid over the image.
// A sample of class c is uniform background noise with the
// pixels of cell c raised to full brightness:
//
//   class 0        class 1        class 4 (3x3 grid)
//   ██ . .         . ██ .         . . .
//   .  . .         . .  .         . ██ .
//   .  . .         . .  .         . . .
//
// An optional label-noise rate replaces a fraction of labels
// with a different random class, which caps the accuracy a
// perfect model can reach at (1 - label_noise) * 100.

use anyhow::{ensure, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::data::dataset::ImageSample;

#[derive(Debug, Clone)]
pub struct SyntheticShapes {
    /// Side length of the square grayscale image
    pub image_size:  usize,
    pub num_classes: usize,
    /// Amplitude of the uniform background noise, in [0, 1)
    pub noise:       f32,
    /// Fraction of samples whose label is replaced, in [0, 1]
    pub label_noise: f64,
}

impl SyntheticShapes {
    pub fn new(image_size: usize, num_classes: usize, noise: f32, label_noise: f64) -> Self {
        Self { image_size, num_classes, noise, label_noise }
    }

    /// Side of the smallest square grid with at least `num_classes` cells.
    fn grid_side(&self) -> usize {
        let mut side = 1;
        while side * side < self.num_classes {
            side += 1;
        }
        side
    }

    /// Generate `count` samples deterministically from `seed`.
    pub fn generate(&self, count: usize, seed: u64) -> Result<Vec<ImageSample>> {
        ensure!(self.num_classes >= 2, "need at least 2 classes, got {}", self.num_classes);
        let side = self.grid_side();
        ensure!(
            self.image_size >= side,
            "image size {} too small for a {side}x{side} class grid",
            self.image_size
        );
        ensure!(
            (0.0..=1.0).contains(&self.label_noise),
            "label noise must be in [0, 1], got {}",
            self.label_noise
        );

        let mut rng  = StdRng::seed_from_u64(seed);
        let cell     = self.image_size / side;
        let mut out  = Vec::with_capacity(count);

        for _ in 0..count {
            let class = rng.gen_range(0..self.num_classes);

            let mut pixels: Vec<f32> = (0..self.image_size * self.image_size)
                .map(|_| if self.noise > 0.0 { rng.gen_range(0.0..self.noise) } else { 0.0 })
                .collect();

            let (row0, col0) = ((class / side) * cell, (class % side) * cell);
            for r in row0..row0 + cell {
                for c in col0..col0 + cell {
                    pixels[r * self.image_size + c] = 1.0;
                }
            }

            let label = if self.label_noise > 0.0 && rng.gen_bool(self.label_noise) {
                // Any class except the true one
                let shift = rng.gen_range(1..self.num_classes);
                (class + shift) % self.num_classes
            } else {
                class
            };

            out.push(ImageSample::new(pixels, [1, self.image_size, self.image_size], label));
        }

        tracing::debug!(
            "Generated {} synthetic samples ({} classes, {}x{} px, seed {})",
            count, self.num_classes, self.image_size, self.image_size, seed
        );
        Ok(out)
    }
}
