//! Decoy noise for carrier pixels that hold no payload.
//!
//! Each generator owns its own CSPRNG, seeded from OS entropy when constructed.
//! The codec builds a new generator for every encode, so filler content is never
//! reproducible and never shared between containers.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub struct DecoyGenerator {
    rng: StdRng,
}

impl Default for DecoyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoyGenerator {
    /// Fresh generator seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// `count` random RGB triples.
    pub fn fill_noise(&mut self, count: usize) -> Vec<[u8; 3]> {
        let mut bytes = vec![0u8; count * 3];
        self.fill(&mut bytes);
        bytes
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect()
    }

    /// Overwrite `buf` with random bytes.
    pub fn fill(&mut self, buf: &mut [u8]) {
        self.rng.fill_bytes(buf);
    }
}
