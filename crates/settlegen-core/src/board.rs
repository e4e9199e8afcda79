//! Board topology: construction sequences and derived orderings.
//!
//! A [`Board`] drives the generic [`HexMap`] through a variant-specific
//! growth sequence, prunes the port ring down to the kept ports, and then
//! derives the three orderings everything downstream works from:
//!
//! - **columns**: terrain tiles grouped into top-to-bottom chains, the
//!   ordering terrain assignment writes onto
//! - **spiral**: one counter-clockwise total order over the terrain tiles
//!   starting from the bottom, the ordering number assignment writes onto
//! - **intersections**: the deduplicated groups of 2 or 3 mutually adjacent
//!   terrain tiles where settlements can sit
//!
//! The graph shape is fixed once built; layout passes only rewrite tile
//! attributes.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hex::{Direction, Terrain, Tile, TileId};
use crate::map::{Bounds, HexMap, TileTemplate};

/// Index-based port spacing matching the printed frame of the 5/6 player
/// edition, applied to the clockwise-sorted port candidates.
const FRAME_PORT_INDEXES: [usize; 11] = [1, 4, 6, 7, 9, 11, 13, 14, 16, 19, 21];

/// Errors raised while constructing a board
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BoardError {
    /// The spiral walk dead-ended with unvisited terrain remaining. The
    /// topology is malformed and must not be handed to layout or queries.
    #[error("spiral walk stuck at tile {tile:?} after {visited} tiles")]
    SpiralStuck { tile: TileId, visited: usize },
}

/// The supported board shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardVariant {
    /// The 19-terrain-tile board: one center tile plus two rings
    Standard,
    /// The 30-terrain-tile 5/6 player board grown from a 2x2 center block
    FiveSix,
}

/// An id-sorted group of 2 or 3 mutually adjacent terrain tiles.
///
/// Sorting by id gives every group a canonical form, which is what lets
/// construction deduplicate the groups found from each member tile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Intersection(Vec<TileId>);

impl Intersection {
    /// Number of tiles in the group (2 for edges, 3 for vertices)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Member tile ids in ascending order
    pub fn tiles(&self) -> &[TileId] {
        &self.0
    }
}

/// Per-terrain production aggregate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TerrainStats {
    /// How many tiles hold this terrain
    pub tiles: u32,
    /// Total pips across those tiles
    pub pips: u32,
}

/// A complete board topology.
///
/// Built once via [`Board::new`]; afterwards the layout engine rewrites
/// attributes in place while the graph and its derived orderings stay fixed.
#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) map: HexMap,
    variant: BoardVariant,
    use_frame: bool,
    pub(crate) terrain: Vec<TileId>,
    pub(crate) ports: Vec<TileId>,
    pub(crate) columns: Vec<TileId>,
    pub(crate) spiral: Vec<TileId>,
    intersections: Vec<Intersection>,
    bounds: Bounds,
    pub(crate) tries: u32,
}

impl Board {
    /// Build the topology for a board variant.
    ///
    /// `use_frame` selects the fixed frame spacing of ports on the 5/6
    /// player board; the standard board ignores it. Fails only if the
    /// constructed graph cannot be spiraled, which would mean the growth
    /// sequence itself is broken.
    pub fn new(variant: BoardVariant, use_frame: bool) -> Result<Self, BoardError> {
        let mut map = HexMap::new();
        let (terrain, ports) = match variant {
            BoardVariant::Standard => {
                let center = map.start(TileTemplate::TERRAIN);
                map.surround(center, TileTemplate::TERRAIN);
                map.surround_all(TileTemplate::TERRAIN);
                let terrain: Vec<TileId> = map.ids().collect();
                let candidates = map.surround_all(TileTemplate::PORT);
                let ports = select_ports(&map, candidates, None);
                (terrain, ports)
            }
            BoardVariant::FiveSix => {
                map.start(TileTemplate::TERRAIN);
                map.grow_all(&[Direction::SouthEast], TileTemplate::TERRAIN);
                map.grow_all(&[Direction::South], TileTemplate::TERRAIN);
                map.surround_all(TileTemplate::TERRAIN);
                map.surround_all(TileTemplate::TERRAIN);
                let terrain: Vec<TileId> = map.ids().collect();
                let candidates = map.surround_all(TileTemplate::PORT);
                let frame = use_frame.then_some(FRAME_PORT_INDEXES.as_slice());
                let ports = select_ports(&map, candidates, frame);
                (terrain, ports)
            }
        };
        map.recompute_bounds();

        let columns = arrange_columns(&map);
        let spiral = arrange_spiral(&map, terrain.len())?;
        let intersections = arrange_intersections(&map, &terrain);
        let bounds = Bounds::of(terrain.iter().chain(&ports).map(|&id| map.tile(id)));
        debug!(
            "built {:?} board: {} terrain tiles, {} ports, {} intersections",
            variant,
            terrain.len(),
            ports.len(),
            intersections.len()
        );

        Ok(Self {
            map,
            variant,
            use_frame,
            terrain,
            ports,
            columns,
            spiral,
            intersections,
            bounds,
            tries: 0,
        })
    }

    // ==================== Query API ====================

    pub fn variant(&self) -> BoardVariant {
        self.variant
    }

    pub fn use_frame(&self) -> bool {
        self.use_frame
    }

    /// Look up any tile by id, including pruned port-ring tiles that are
    /// still reachable through neighbor links.
    pub fn tile(&self, id: TileId) -> &Tile {
        self.map.tile(id)
    }

    /// All board tiles: terrain first, then the kept ports
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.terrain
            .iter()
            .chain(&self.ports)
            .map(|&id| self.map.tile(id))
    }

    /// The terrain tiles in creation order
    pub fn terrain_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.terrain.iter().map(|&id| self.map.tile(id))
    }

    /// The kept port tiles, clockwise from 12 o'clock
    pub fn port_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.ports.iter().map(|&id| self.map.tile(id))
    }

    /// Terrain tiles grouped into columns, top-to-bottom within each column
    pub fn columns(&self) -> &[TileId] {
        &self.columns
    }

    /// The counter-clockwise spiral over all terrain tiles
    pub fn spiral(&self) -> &[TileId] {
        &self.spiral
    }

    /// Every 2- and 3-tile intersection, canonically ordered
    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    /// Intersections with exactly `size` member tiles.
    ///
    /// An unmatched size yields an empty iterator, not an error.
    pub fn intersections_of_size(&self, size: usize) -> impl Iterator<Item = &Intersection> {
        self.intersections.iter().filter(move |i| i.len() == size)
    }

    /// Summed pips for every `size`-tile intersection whose members all
    /// produce. Intersections touching a desert or unnumbered tile are
    /// excluded entirely.
    pub fn intersection_pips(&self, size: usize) -> Vec<u32> {
        self.intersections_of_size(size)
            .filter_map(|inter| {
                inter
                    .tiles()
                    .iter()
                    .map(|&id| self.map.tile(id).pips().map(u32::from))
                    .sum::<Option<u32>>()
            })
            .collect()
    }

    /// Tile count and total pips per assigned terrain
    pub fn terrain_production(&self) -> BTreeMap<Terrain, TerrainStats> {
        let mut stats: BTreeMap<Terrain, TerrainStats> = BTreeMap::new();
        for tile in self.terrain_tiles() {
            if let Some(terrain) = tile.terrain() {
                let entry = stats.entry(terrain).or_default();
                entry.tiles += 1;
                entry.pips += u32::from(tile.pips().unwrap_or(0));
            }
        }
        stats
    }

    /// Average pairwise distance between tiles of each terrain.
    ///
    /// Distances are Euclidean over the planar coordinates, truncated to
    /// whole tiles before averaging. Terrains with fewer than two tiles
    /// have no pairs and are omitted.
    pub fn terrain_spread(&self) -> BTreeMap<Terrain, f64> {
        let mut groups: BTreeMap<Terrain, Vec<&Tile>> = BTreeMap::new();
        for tile in self.terrain_tiles() {
            if let Some(terrain) = tile.terrain() {
                groups.entry(terrain).or_default().push(tile);
            }
        }

        let mut spread = BTreeMap::new();
        for (terrain, tiles) in groups {
            let mut total = 0.0;
            let mut pairs = 0u32;
            for (a, b) in tiles.iter().tuple_combinations() {
                let dx = f64::from(b.x() - a.x());
                let dy = b.y() - a.y();
                total += (dx * dx + dy * dy).sqrt().trunc();
                pairs += 1;
            }
            if pairs > 0 {
                spread.insert(terrain, total / f64::from(pairs));
            }
        }
        spread
    }

    /// How many assignment passes the last [`Board::layout`] call made
    pub fn tries(&self) -> u32 {
        self.tries
    }

    /// Bounding box over the board tiles (terrain plus kept ports)
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// A neighbor that exists and is not part of the port ring.
fn land_neighbor(map: &HexMap, id: TileId, dir: Direction) -> Option<TileId> {
    map.tile(id)
        .neighbor(dir)
        .filter(|&n| !map.tile(n).is_port())
}

/// Sort port candidates clockwise from 12 o'clock and keep either every
/// other one or the fixed frame indexes.
fn select_ports(map: &HexMap, mut candidates: Vec<TileId>, frame: Option<&[usize]>) -> Vec<TileId> {
    let polar = |id: TileId| {
        let tile = map.tile(id);
        f64::from(tile.x()).atan2(tile.y())
    };
    // Descending angle with y growing downward = clockwise from the top.
    candidates.sort_by(|&a, &b| polar(b).total_cmp(&polar(a)));

    match frame {
        Some(indexes) => indexes
            .iter()
            .filter_map(|&i| candidates.get(i).copied())
            .collect(),
        None => candidates.into_iter().skip(1).step_by(2).collect(),
    }
}

/// Enumerate the terrain tiles column by column.
///
/// Climbs to the topmost terrain tile, fans out left and right along the
/// column tops, then walks each column straight down. Column order is
/// center first, then alternating right and left, matching the reference
/// layouts the beginner terrain sequence was transcribed from.
fn arrange_columns(map: &HexMap) -> Vec<TileId> {
    let mut top = TileId(0);
    'climb: loop {
        for dir in [Direction::North, Direction::NorthEast, Direction::NorthWest] {
            if let Some(higher) = land_neighbor(map, top, dir) {
                top = higher;
                continue 'climb;
            }
        }
        break;
    }

    let mut toppers = vec![top];
    let mut right = land_neighbor(map, top, Direction::SouthEast);
    let mut left = land_neighbor(map, top, Direction::SouthWest);
    toppers.extend(right);
    toppers.extend(left);
    loop {
        let mut grew = false;
        right = right.and_then(|r| land_neighbor(map, r, Direction::SouthEast));
        if let Some(r) = right {
            toppers.push(r);
            grew = true;
        }
        left = left.and_then(|l| land_neighbor(map, l, Direction::SouthWest));
        if let Some(l) = left {
            toppers.push(l);
            grew = true;
        }
        if !grew {
            break;
        }
    }

    let mut columns = Vec::new();
    for topper in toppers {
        let mut current = topper;
        columns.push(current);
        while let Some(lower) = land_neighbor(map, current, Direction::South) {
            columns.push(lower);
            current = lower;
        }
    }
    columns
}

/// Walk the terrain tiles in a counter-clockwise spiral from the bottom.
///
/// At each step the walk keeps its current direction while the next tile is
/// valid, and otherwise turns 60 degrees counter-clockwise. Needing to turn
/// through all six directions means the topology cannot be spiraled.
fn arrange_spiral(map: &HexMap, terrain_count: usize) -> Result<Vec<TileId>, BoardError> {
    let mut bottom = TileId(0);
    'descend: loop {
        for dir in [Direction::South, Direction::SouthEast, Direction::SouthWest] {
            if let Some(lower) = land_neighbor(map, bottom, dir) {
                bottom = lower;
                continue 'descend;
            }
        }
        break;
    }

    let mut spiral = vec![bottom];
    let mut visited: HashSet<TileId> = HashSet::from([bottom]);
    let mut current = bottom;
    let mut dir = Direction::NorthEast;
    while spiral.len() < terrain_count {
        let start_dir = dir;
        loop {
            match land_neighbor(map, current, dir).filter(|next| !visited.contains(next)) {
                Some(next) => {
                    spiral.push(next);
                    visited.insert(next);
                    current = next;
                    break;
                }
                None => {
                    dir = dir.turn_ccw();
                    if dir == start_dir {
                        return Err(BoardError::SpiralStuck {
                            tile: current,
                            visited: spiral.len(),
                        });
                    }
                }
            }
        }
    }
    Ok(spiral)
}

/// Collect every 2- and 3-tile group of mutually adjacent terrain tiles.
///
/// Each terrain tile contributes the groups formed with its neighbors at
/// consecutive direction pairs; id-sorting makes the groups canonical so a
/// set collapses the duplicates seen from different member tiles.
fn arrange_intersections(map: &HexMap, terrain: &[TileId]) -> Vec<Intersection> {
    let mut found = BTreeSet::new();
    for &id in terrain {
        for dir in Direction::ALL {
            let mut group = vec![id];
            group.extend(land_neighbor(map, id, dir));
            group.extend(land_neighbor(map, id, dir.turn_cw()));
            if group.len() < 2 {
                continue;
            }
            group.sort();
            found.insert(Intersection(group));
        }
    }
    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_board_has_19_terrain_and_9_ports() {
        let board = Board::new(BoardVariant::Standard, false).unwrap();
        assert_eq!(board.terrain_tiles().count(), 19);
        assert_eq!(board.port_tiles().count(), 9);
        assert!(board.terrain_tiles().all(|t| !t.is_port()));
        assert!(board.port_tiles().all(|t| t.is_port()));
    }

    #[test]
    fn five_six_board_has_30_terrain_and_11_ports() {
        for use_frame in [false, true] {
            let board = Board::new(BoardVariant::FiveSix, use_frame).unwrap();
            assert_eq!(board.terrain_tiles().count(), 30);
            assert_eq!(board.port_tiles().count(), 11);
            assert_eq!(board.spiral().len(), 30);
        }
    }

    #[test]
    fn adjacency_is_mutual_across_the_whole_board() {
        let board = Board::new(BoardVariant::Standard, false).unwrap();
        for tile in board.map.tiles() {
            for (dir, other) in tile.neighbors() {
                assert_eq!(
                    board.tile(other).neighbor(dir.opposite()),
                    Some(tile.id())
                );
            }
        }
    }

    #[test]
    fn spiral_covers_every_terrain_tile_once() {
        let board = Board::new(BoardVariant::Standard, false).unwrap();
        let spiral = board.spiral();
        assert_eq!(spiral.len(), 19);

        let distinct: HashSet<TileId> = spiral.iter().copied().collect();
        assert_eq!(distinct.len(), 19);
        assert!(spiral.iter().all(|&id| !board.tile(id).is_port()));
    }

    #[test]
    fn spiral_starts_at_the_bottom_and_ends_in_the_center() {
        let board = Board::new(BoardVariant::Standard, false).unwrap();
        let first = board.tile(board.spiral()[0]);
        let lowest = board
            .terrain_tiles()
            .map(Tile::half_y)
            .max()
            .unwrap();
        assert_eq!(first.half_y(), lowest);
        // The walk tightens inward, so the last tile is the original center.
        assert_eq!(board.spiral()[18], TileId(0));
    }

    #[test]
    fn columns_enumerate_the_terrain_center_first() {
        let board = Board::new(BoardVariant::Standard, false).unwrap();
        let columns = board.columns();
        assert_eq!(columns.len(), 19);

        let as_set: HashSet<TileId> = columns.iter().copied().collect();
        assert_eq!(as_set.len(), 19);

        // First chain is the five-tile center column, walked top to bottom.
        for pair in columns[..5].windows(2) {
            let (a, b) = (board.tile(pair[0]), board.tile(pair[1]));
            assert_eq!(a.x(), 0);
            assert_eq!(b.x(), 0);
            assert_eq!(b.half_y() - a.half_y(), 2);
        }
    }

    #[test]
    fn intersections_are_canonical_and_sized_2_or_3() {
        let board = Board::new(BoardVariant::Standard, false).unwrap();
        assert!(!board.intersections().is_empty());
        for inter in board.intersections() {
            assert!(matches!(inter.len(), 2 | 3), "bad size {}", inter.len());
            assert!(inter.tiles().windows(2).all(|w| w[0] < w[1]));
        }
        // No size filter ever errors; unmatched sizes are just empty.
        assert_eq!(board.intersections_of_size(5).count(), 0);
    }

    #[test]
    fn rebuilding_yields_identical_intersections() {
        let a = Board::new(BoardVariant::Standard, false).unwrap();
        let b = Board::new(BoardVariant::Standard, false).unwrap();
        assert_eq!(a.intersections(), b.intersections());
    }

    #[test]
    fn ports_alternate_around_the_ring() {
        let board = Board::new(BoardVariant::Standard, false).unwrap();
        // Kept ports are never adjacent to each other on the alternating
        // selection; the dropped candidate between them breaks the chain.
        for port in board.port_tiles() {
            for (_, neighbor) in port.neighbors() {
                let neighbor = board.tile(neighbor);
                if neighbor.is_port() {
                    assert!(
                        !board.ports.contains(&neighbor.id()),
                        "kept ports {:?} and {:?} touch",
                        port.id(),
                        neighbor.id()
                    );
                }
            }
        }
    }

    #[test]
    fn frame_ports_follow_the_fixed_spacing() {
        let alternating = Board::new(BoardVariant::FiveSix, false).unwrap();
        let framed = Board::new(BoardVariant::FiveSix, true).unwrap();
        assert_eq!(alternating.ports.len(), 11);
        assert_eq!(framed.ports.len(), 11);
        assert_ne!(alternating.ports, framed.ports);
    }

    #[test]
    fn bounds_span_the_board() {
        let board = Board::new(BoardVariant::Standard, false).unwrap();
        let bounds = board.bounds();
        assert!(bounds.left < 0 && bounds.right > 0);
        assert!(bounds.top < 0 && bounds.bottom > 0);
        assert_eq!(bounds.width(), bounds.right - bounds.left + 1);
    }
}
