//! The drum: a fixed multiset of outcomes, spun uniformly

use super::Outcome;
use rand::prelude::*;

/// Lowest and highest Points faces, and the step between them.
const MIN_POINTS: u32 = 350;
const MAX_POINTS: u32 = 1000;
const POINTS_STEP: u32 = 50;

/// How many copies of each face sit on the drum.
const COPIES_PER_FACE: usize = 2;

/// The drum. Duplicated entries encode relative weight.
#[derive(Debug, Clone)]
pub struct Wheel {
    sectors: Vec<Outcome>,
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new()
    }
}

impl Wheel {
    /// The standard drum: every Points face from 350 to 1000 in steps of
    /// 50, then Double, Zero, Plus and Bankrupt, each face twice.
    pub fn new() -> Self {
        let points = (MIN_POINTS..=MAX_POINTS)
            .step_by(POINTS_STEP as usize)
            .map(Outcome::Points);
        let specials = [
            Outcome::Double,
            Outcome::Zero,
            Outcome::Bonus,
            Outcome::Bankrupt,
        ];

        let sectors = points
            .chain(specials)
            .flat_map(|face| std::iter::repeat_n(face, COPIES_PER_FACE))
            .collect();

        Self { sectors }
    }

    /// A drum with an explicit sector list.
    ///
    /// Panics if `sectors` is empty: a drum needs at least one face.
    #[cfg(test)]
    pub fn with_sectors(sectors: Vec<Outcome>) -> Self {
        assert!(!sectors.is_empty(), "wheel needs at least one sector");
        Self { sectors }
    }

    /// Spin using a specific RNG (for testing/seeding).
    pub fn spin_with_rng<R: Rng>(&self, rng: &mut R) -> Outcome {
        let index = rng.random_range(0..self.sectors.len());
        self.sectors[index]
    }

    /// All sectors in drum order, duplicates included.
    pub fn sectors(&self) -> &[Outcome] {
        &self.sectors
    }

    /// Relative weight of an outcome (number of sectors showing it).
    #[cfg(test)]
    pub fn weight_of(&self, outcome: Outcome) -> usize {
        self.sectors.iter().filter(|&&s| s == outcome).count()
    }
}
