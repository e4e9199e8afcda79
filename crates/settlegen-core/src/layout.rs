//! The layout engine: randomized or fixed assignment of terrain, numbers,
//! and ports onto a built topology.
//!
//! A layout pass writes the terrain deck onto the column ordering, the
//! number deck onto the spiral (deserts never take a number), and the
//! harbor deck onto the kept ports. [`Board::layout`] repeats passes until
//! every validator accepts, optionally bounded by
//! [`LayoutConfig::max_tries`].

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, BoardVariant};
use crate::hex::{Harbor, Resource, Terrain, TileKind};
use crate::validate::Validator;

/// How production numbers are ordered onto the spiral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumberMode {
    /// The fixed beginner sequence
    Beginner,
    /// The fixed variable-setup sequence
    #[default]
    Standard,
    /// A random permutation of the standard sequence
    Shuffle,
}

/// How harbors are ordered onto the port tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PortMode {
    /// The fixed beginner sequence
    Beginner,
    /// A random permutation of the beginner harbors
    #[default]
    Shuffle,
}

/// How terrain is ordered onto the columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerrainMode {
    /// The fixed beginner sequence
    Beginner,
    /// A random permutation of the beginner terrain multiset
    #[default]
    Shuffle,
}

/// Configuration for one [`Board::layout`] call
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutConfig {
    pub numbers: NumberMode,
    pub ports: PortMode,
    pub terrain: TerrainMode,
    /// Give up after this many assignment passes. `None` retries forever,
    /// which never terminates if the validators are unsatisfiable.
    pub max_tries: Option<u32>,
}

/// Errors from the layout loop
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LayoutError {
    #[error("no layout satisfied the validators within {tries} tries")]
    Unsatisfiable { tries: u32 },
}

// Reference sequences for the standard board. Terrain reads down the
// columns; numbers read along the spiral.
const BEGINNER_TERRAIN: [Terrain; 19] = [
    Terrain::Forest,
    Terrain::Pasture,
    Terrain::Desert,
    Terrain::Mountains,
    Terrain::Hills,
    Terrain::Hills,
    Terrain::Forest,
    Terrain::Fields,
    Terrain::Fields,
    Terrain::Pasture,
    Terrain::Hills,
    Terrain::Forest,
    Terrain::Forest,
    Terrain::Mountains,
    Terrain::Pasture,
    Terrain::Pasture,
    Terrain::Mountains,
    Terrain::Fields,
    Terrain::Fields,
];

const BEGINNER_NUMBERS: [u8; 18] = [5, 6, 11, 5, 8, 10, 9, 2, 10, 12, 9, 8, 3, 4, 3, 4, 6, 11];

const STANDARD_NUMBERS: [u8; 18] = [5, 2, 6, 3, 8, 10, 9, 12, 11, 4, 8, 10, 9, 4, 5, 6, 3, 11];

const BEGINNER_PORTS: [Harbor; 9] = [
    Harbor::Specific(Resource::Ore),
    Harbor::Generic,
    Harbor::Specific(Resource::Wool),
    Harbor::Generic,
    Harbor::Generic,
    Harbor::Specific(Resource::Brick),
    Harbor::Specific(Resource::Lumber),
    Harbor::Generic,
    Harbor::Specific(Resource::Grain),
];

// Reference sequences for the 5/6 player board, which uses the same number
// sequence for the beginner and variable setups.
const FIVE_SIX_TERRAIN: [Terrain; 30] = [
    Terrain::Fields,
    Terrain::Hills,
    Terrain::Fields,
    Terrain::Mountains,
    Terrain::Mountains,
    Terrain::Hills,
    Terrain::Pasture,
    Terrain::Forest,
    Terrain::Hills,
    Terrain::Fields,
    Terrain::Pasture,
    Terrain::Mountains,
    Terrain::Pasture,
    Terrain::Mountains,
    Terrain::Forest,
    Terrain::Forest,
    Terrain::Pasture,
    Terrain::Fields,
    Terrain::Hills,
    Terrain::Desert,
    Terrain::Pasture,
    Terrain::Fields,
    Terrain::Forest,
    Terrain::Hills,
    Terrain::Desert,
    Terrain::Fields,
    Terrain::Forest,
    Terrain::Pasture,
    Terrain::Mountains,
    Terrain::Forest,
];

const FIVE_SIX_NUMBERS: [u8; 28] = [
    2, 5, 4, 6, 3, 9, 8, 11, 11, 10, 6, 3, 8, 4, 8, 10, 11, 12, 10, 5, 4, 9, 5, 9, 12, 3, 2, 6,
];

const FIVE_SIX_PORTS: [Harbor; 11] = [
    Harbor::Generic,
    Harbor::Generic,
    Harbor::Specific(Resource::Brick),
    Harbor::Specific(Resource::Wool),
    Harbor::Specific(Resource::Lumber),
    Harbor::Generic,
    Harbor::Specific(Resource::Grain),
    Harbor::Generic,
    Harbor::Specific(Resource::Ore),
    Harbor::Generic,
    Harbor::Specific(Resource::Wool),
];

fn terrain_deck(variant: BoardVariant) -> &'static [Terrain] {
    match variant {
        BoardVariant::Standard => &BEGINNER_TERRAIN,
        BoardVariant::FiveSix => &FIVE_SIX_TERRAIN,
    }
}

fn number_deck(variant: BoardVariant, mode: NumberMode) -> &'static [u8] {
    match (variant, mode) {
        (BoardVariant::Standard, NumberMode::Beginner) => &BEGINNER_NUMBERS,
        (BoardVariant::Standard, _) => &STANDARD_NUMBERS,
        (BoardVariant::FiveSix, _) => &FIVE_SIX_NUMBERS,
    }
}

fn port_deck(variant: BoardVariant) -> &'static [Harbor] {
    match variant {
        BoardVariant::Standard => &BEGINNER_PORTS,
        BoardVariant::FiveSix => &FIVE_SIX_PORTS,
    }
}

impl Board {
    /// Lay out the board, drawing randomness from the process-wide RNG.
    ///
    /// Returns the number of assignment passes on success. With an empty
    /// validator list the first pass is always accepted.
    pub fn layout(
        &mut self,
        config: &LayoutConfig,
        validators: &[Validator],
    ) -> Result<u32, LayoutError> {
        self.layout_with_rng(config, validators, &mut rand::thread_rng())
    }

    /// Lay out the board with a caller-provided RNG for deterministic
    /// generation.
    pub fn layout_with_rng<R: Rng>(
        &mut self,
        config: &LayoutConfig,
        validators: &[Validator],
        rng: &mut R,
    ) -> Result<u32, LayoutError> {
        self.tries = 0;
        loop {
            self.tries += 1;
            self.assign_terrain(config.terrain, rng);
            self.assign_numbers(config.numbers, rng);
            self.assign_ports(config.ports, rng);

            if validators.iter().all(|accepts| accepts(self)) {
                debug!("layout accepted after {} tries", self.tries);
                return Ok(self.tries);
            }
            if let Some(cap) = config.max_tries {
                if self.tries >= cap {
                    return Err(LayoutError::Unsatisfiable { tries: self.tries });
                }
            }
        }
    }

    /// Write the terrain deck onto the column ordering.
    fn assign_terrain<R: Rng>(&mut self, mode: TerrainMode, rng: &mut R) {
        let mut deck = terrain_deck(self.variant()).to_vec();
        if mode == TerrainMode::Shuffle {
            deck.shuffle(rng);
        }
        for i in 0..self.columns.len().min(deck.len()) {
            let id = self.columns[i];
            self.map.tile_mut(id).set_kind(TileKind::Terrain(deck[i]));
        }
    }

    /// Write the number deck onto the spiral, skipping deserts.
    ///
    /// Deserts never consume a number; their number is cleared so their
    /// pip weight reads as "produces nothing".
    fn assign_numbers<R: Rng>(&mut self, mode: NumberMode, rng: &mut R) {
        let mut deck = number_deck(self.variant(), mode).to_vec();
        if mode == NumberMode::Shuffle {
            deck.shuffle(rng);
        }
        let mut numbers = deck.into_iter();
        for i in 0..self.spiral.len() {
            let tile = self.map.tile_mut(self.spiral[i]);
            if tile.terrain() == Some(Terrain::Desert) {
                tile.set_number(None);
            } else if let Some(number) = numbers.next() {
                tile.set_number(Some(number));
            }
        }
    }

    /// Write the harbor deck onto the kept ports.
    fn assign_ports<R: Rng>(&mut self, mode: PortMode, rng: &mut R) {
        let mut deck = port_deck(self.variant()).to_vec();
        if mode == PortMode::Shuffle {
            deck.shuffle(rng);
        }
        for i in 0..self.ports.len().min(deck.len()) {
            let id = self.ports[i];
            self.map.tile_mut(id).set_kind(TileKind::Harbor(deck[i]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn beginner_config() -> LayoutConfig {
        LayoutConfig {
            numbers: NumberMode::Beginner,
            ports: PortMode::Beginner,
            terrain: TerrainMode::Beginner,
            max_tries: None,
        }
    }

    #[test]
    fn empty_validator_list_accepts_in_one_try() {
        let mut board = Board::new(BoardVariant::Standard, false).unwrap();
        let tries = board.layout(&LayoutConfig::default(), &[]).unwrap();
        assert_eq!(tries, 1);
        assert_eq!(board.tries(), 1);
    }

    #[test]
    fn beginner_numbers_follow_the_spiral() {
        let mut board = Board::new(BoardVariant::Standard, false).unwrap();
        board.layout(&beginner_config(), &[]).unwrap();

        let mut expected = BEGINNER_NUMBERS.iter().copied();
        for &id in board.spiral() {
            let tile = board.tile(id);
            if tile.terrain() == Some(Terrain::Desert) {
                assert_eq!(tile.number(), None);
                assert_eq!(tile.pips(), None);
            } else {
                assert_eq!(tile.number(), expected.next());
            }
        }
        assert_eq!(expected.next(), None, "every number must be placed");
    }

    #[test]
    fn beginner_layout_puts_hills_at_the_spiral_start() {
        let mut board = Board::new(BoardVariant::Standard, false).unwrap();
        board.layout(&beginner_config(), &[]).unwrap();
        let first = board.tile(board.spiral()[0]);
        assert_eq!(first.terrain(), Some(Terrain::Hills));
    }

    #[test]
    fn beginner_ports_keep_their_order() {
        let mut board = Board::new(BoardVariant::Standard, false).unwrap();
        board.layout(&beginner_config(), &[]).unwrap();
        let harbors: Vec<_> = board.port_tiles().map(|t| t.harbor().unwrap()).collect();
        assert_eq!(harbors, BEGINNER_PORTS.to_vec());
    }

    #[test]
    fn shuffle_preserves_the_terrain_multiset() {
        let mut board = Board::new(BoardVariant::Standard, false).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        board
            .layout_with_rng(&LayoutConfig::default(), &[], &mut rng)
            .unwrap();

        let mut counts: BTreeMap<Terrain, u32> = BTreeMap::new();
        for tile in board.terrain_tiles() {
            *counts.entry(tile.terrain().unwrap()).or_default() += 1;
        }
        assert_eq!(counts[&Terrain::Forest], 4);
        assert_eq!(counts[&Terrain::Pasture], 4);
        assert_eq!(counts[&Terrain::Fields], 4);
        assert_eq!(counts[&Terrain::Hills], 3);
        assert_eq!(counts[&Terrain::Mountains], 3);
        assert_eq!(counts[&Terrain::Desert], 1);
    }

    #[test]
    fn seeded_layouts_are_reproducible() {
        let assignments = |seed: u64| {
            let mut board = Board::new(BoardVariant::Standard, false).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            board
                .layout_with_rng(&LayoutConfig::default(), &[], &mut rng)
                .unwrap();
            board
                .tiles()
                .map(|t| (t.id(), t.kind(), t.number()))
                .collect::<Vec<_>>()
        };
        assert_eq!(assignments(7), assignments(7));
    }

    #[test]
    fn impossible_validators_hit_the_try_cap() {
        let mut board = Board::new(BoardVariant::Standard, false).unwrap();
        let config = LayoutConfig {
            max_tries: Some(5),
            ..LayoutConfig::default()
        };
        let never: Validator = Box::new(|_| false);
        let result = board.layout(&config, &[never]);
        assert_eq!(result, Err(LayoutError::Unsatisfiable { tries: 5 }));
        assert_eq!(board.tries(), 5);
    }

    #[test]
    fn five_six_beginner_layout_is_complete() {
        let mut board = Board::new(BoardVariant::FiveSix, true).unwrap();
        board.layout(&beginner_config(), &[]).unwrap();

        let deserts = board
            .terrain_tiles()
            .filter(|t| t.terrain() == Some(Terrain::Desert))
            .count();
        assert_eq!(deserts, 2);
        let numbered = board.terrain_tiles().filter(|t| t.number().is_some()).count();
        assert_eq!(numbered, 28);
        assert!(board.port_tiles().all(|t| t.harbor().is_some()));
    }
}
