//! Constraint predicates for accepting or rejecting a laid-out board.
//!
//! Each factory returns a boxed predicate the layout loop evaluates against
//! the fully-assigned topology. Validators only read derived orderings and
//! tile attributes; rejecting a layout just triggers another assignment
//! pass.

use std::collections::HashSet;

use crate::board::Board;
use crate::hex::{Harbor, Terrain};

/// A pure accept/reject predicate over a fully-assigned board
pub type Validator = Box<dyn Fn(&Board) -> bool>;

/// True when some pair of linked tiles carries the given pair of numbers,
/// in either order or doubled.
fn has_adjacent_numbers(board: &Board, low: u8, high: u8) -> bool {
    board.tiles().any(|tile| {
        let Some(a) = tile.number() else {
            return false;
        };
        tile.neighbors().any(|(_, other)| {
            let Some(b) = board.tile(other).number() else {
                return false;
            };
            (a == low || a == high) && (b == low || b == high)
        })
    })
}

/// No intersection may produce more than `cap` total pips.
pub fn max_pip(cap: u32) -> Validator {
    Box::new(move |board| {
        board.intersections().iter().all(|inter| {
            let pips: u32 = inter
                .tiles()
                .iter()
                .map(|&id| u32::from(board.tile(id).pips().unwrap_or(0)))
                .sum();
            pips <= cap
        })
    })
}

/// The two rarest numbers, 2 and 12, may not neighbor each other or
/// themselves.
pub fn no_2_12() -> Validator {
    Box::new(|board| !has_adjacent_numbers(board, 2, 12))
}

/// The two hottest numbers, 6 and 8, may not neighbor each other or
/// themselves.
pub fn no_6_8() -> Validator {
    Box::new(|board| !has_adjacent_numbers(board, 6, 8))
}

/// No terrain may hold more than one five-pip (6 or 8) tile.
pub fn no_double_6_8() -> Validator {
    Box::new(|board| {
        let mut seen = HashSet::new();
        for tile in board.terrain_tiles() {
            if tile.pips() == Some(5) {
                if let Some(terrain) = tile.terrain() {
                    if !seen.insert(terrain) {
                        return false;
                    }
                }
            }
        }
        true
    })
}

/// No two linked tiles may carry the same number.
pub fn no_num_pairs() -> Validator {
    Box::new(|board| {
        !board.terrain_tiles().any(|tile| {
            let Some(number) = tile.number() else {
                return false;
            };
            tile.neighbors()
                .any(|(_, other)| board.tile(other).number() == Some(number))
        })
    })
}

/// No two linked tiles may share a kind (terrain or harbor alike).
pub fn no_terr_pairs() -> Validator {
    Box::new(|board| {
        !board.tiles().any(|tile| {
            tile.neighbors()
                .any(|(_, other)| board.tile(other).kind() == tile.kind())
        })
    })
}

/// No three-tile intersection may be a single terrain.
pub fn no_terr_tri() -> Validator {
    Box::new(|board| {
        board.intersections_of_size(3).all(|inter| {
            let mut terrains = inter.tiles().iter().map(|&id| board.tile(id).terrain());
            let first = terrains.next().flatten();
            first.is_none() || terrains.any(|t| t != first)
        })
    })
}

/// Every terrain tile outside `ignore` must have at least one neighbor of
/// the same terrain.
pub fn regions(ignore: Vec<Terrain>) -> Validator {
    Box::new(move |board| {
        board.terrain_tiles().all(|tile| {
            let Some(terrain) = tile.terrain() else {
                return true;
            };
            if ignore.contains(&terrain) {
                return true;
            }
            tile.neighbors()
                .any(|(_, other)| board.tile(other).terrain() == Some(terrain))
        })
    })
}

/// A 2:1 port may see at most `cap` pips of its own resource next door.
pub fn max_port_pips(cap: u32) -> Validator {
    Box::new(move |board| {
        board.port_tiles().all(|port| {
            let Some(Harbor::Specific(resource)) = port.harbor() else {
                return true;
            };
            let own_terrain = resource.terrain();
            let pips: u32 = port
                .neighbors()
                .filter(|&(_, other)| board.tile(other).terrain() == Some(own_terrain))
                .map(|(_, other)| u32::from(board.tile(other).pips().unwrap_or(0)))
                .sum();
            pips <= cap
        })
    })
}

/// At least one ore-producing tile must weigh `min_pips` or more.
pub fn good_rock(min_pips: u8) -> Validator {
    Box::new(move |board| {
        board
            .terrain_tiles()
            .filter(|tile| tile.terrain() == Some(Terrain::Mountains))
            .filter_map(|tile| tile.pips())
            .any(|pips| pips >= min_pips)
    })
}
