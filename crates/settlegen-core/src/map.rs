//! Generic hex-tessellation growth, independent of any board semantics.
//!
//! A [`HexMap`] owns an arena of tiles and grows it incrementally: start a
//! tile, grow neighbors in chosen directions, or surround a tile or the
//! whole map. Growth keeps the adjacency graph closed under tessellation -
//! whenever a new tile lands next to two tiles that are themselves 60
//! degrees apart, corner propagation links the pair without any manual
//! bookkeeping by the caller.

use log::trace;
use serde::Serialize;
use thiserror::Error;

use crate::hex::{Direction, Tile, TileId};

/// Errors from map-level queries
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MapError {
    #[error("no tile at ({x}, {y})")]
    NoTileAt { x: i32, y: f64 },
}

/// Coordinate bounding box over a set of tiles.
///
/// Horizontal extents are in columns, vertical extents in half-rows. The
/// box always includes the origin, where the first tile of every map sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Bounds {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Bounds {
    pub(crate) fn of<'a>(tiles: impl Iterator<Item = &'a Tile>) -> Self {
        let mut bounds = Bounds::default();
        for tile in tiles {
            bounds.left = bounds.left.min(tile.x());
            bounds.right = bounds.right.max(tile.x());
            bounds.top = bounds.top.min(tile.half_y());
            bounds.bottom = bounds.bottom.max(tile.half_y());
        }
        bounds
    }

    /// Width in columns
    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    /// Height in full rows
    pub fn height(&self) -> f64 {
        f64::from(self.bottom - self.top) / 2.0
    }
}

/// Seed for tiles created by the growth methods.
///
/// The map itself assigns identity and position; the template carries the
/// one structural attribute that varies between growth passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TileTemplate {
    pub port: bool,
}

impl TileTemplate {
    pub const TERRAIN: TileTemplate = TileTemplate { port: false };
    pub const PORT: TileTemplate = TileTemplate { port: true };
}

/// A map made of tessellated hexes.
///
/// Tiles live in an insertion-ordered arena and are addressed by [`TileId`].
/// Iteration order is creation order, which the board layer relies on for
/// deterministic derived orderings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HexMap {
    tiles: Vec<Tile>,
    bounds: Bounds,
}

impl HexMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Look up a tile by id. Ids issued by this map are always valid.
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id.index()]
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> &mut Tile {
        &mut self.tiles[id.index()]
    }

    /// All tiles in creation order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// All tile ids in creation order
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.tiles.len() as u32).map(TileId)
    }

    /// Create a free-standing tile at the origin.
    pub fn start(&mut self, template: TileTemplate) -> TileId {
        let id = self.push(template);
        self.tiles[id.index()].placed = true;
        id
    }

    fn push(&mut self, template: TileTemplate) -> TileId {
        let id = TileId(self.tiles.len() as u32);
        self.tiles.push(Tile::new(id, template.port));
        id
    }

    /// Link `from` and `to` as mutual neighbors and place `to` at the fixed
    /// offset for `dir`.
    ///
    /// Linking outward from a tile whose own position is not yet established
    /// is a programmer error; only the origin tile starts out placed.
    pub fn connect(&mut self, from: TileId, dir: Direction, to: TileId) {
        debug_assert!(
            self.tiles[from.index()].placed,
            "cannot connect from a tile with no established position"
        );
        let (x, half_y) = {
            let parent = &self.tiles[from.index()];
            (parent.x, parent.half_y)
        };
        let (dx, dy) = dir.offset();
        let child = &mut self.tiles[to.index()];
        child.x = x + dx;
        child.half_y = half_y + dy;
        child.placed = true;
        self.link(from, dir, to);
    }

    /// Mutual link without touching coordinates. Positions are fixed at
    /// creation and never recomputed.
    fn link(&mut self, a: TileId, dir: Direction, b: TileId) {
        self.tiles[a.index()].neighbors[dir.index()] = Some(b);
        self.tiles[b.index()].neighbors[dir.opposite().index()] = Some(a);
    }

    /// Remove all of a tile's neighbor links, symmetrically.
    ///
    /// Only used while editing a topology; normal construction never unlinks.
    pub fn disconnect_all(&mut self, id: TileId) {
        for dir in Direction::ALL {
            if let Some(other) = self.tiles[id.index()].neighbors[dir.index()].take() {
                self.tiles[other.index()].neighbors[dir.opposite().index()] = None;
            }
        }
    }

    /// Link pairs of this tile's neighbors that geometry makes adjacent.
    ///
    /// For every pair of neighbors 60 degrees apart, the two are linked
    /// along the direction bisecting them. This is how a tile grown from
    /// one parent becomes connected to the parent's other neighbors,
    /// completing the tessellation.
    pub fn propagate_corners(&mut self, id: TileId) {
        for dir in Direction::ALL {
            let target = self.tiles[id.index()].neighbors[dir.index()];
            let join = self.tiles[id.index()].neighbors[dir.turn_cw().index()];
            if let (Some(target), Some(join)) = (target, join) {
                self.link(target, dir.turn_cw().turn_cw(), join);
            }
        }
    }

    /// Grow new neighbors for one tile in the given directions.
    ///
    /// Directions that already hold a neighbor are left untouched. Returns
    /// the tiles created, in direction order.
    pub fn grow(&mut self, at: TileId, dirs: &[Direction], template: TileTemplate) -> Vec<TileId> {
        let mut created = Vec::new();
        for &dir in dirs {
            if self.tiles[at.index()].neighbors[dir.index()].is_some() {
                continue;
            }
            let id = self.push(template);
            self.connect(at, dir, id);
            created.push(id);
        }
        self.propagate_corners(at);
        trace!("grew {} tiles around tile {:?}", created.len(), at);
        created
    }

    /// Grow new neighbors for every tile currently on the map.
    ///
    /// The pass visits a snapshot of the tile collection, so tiles created
    /// during the pass are not themselves grown.
    pub fn grow_all(&mut self, dirs: &[Direction], template: TileTemplate) -> Vec<TileId> {
        let snapshot: Vec<TileId> = self.ids().collect();
        let mut created = Vec::new();
        for id in snapshot {
            created.extend(self.grow(id, dirs, template));
        }
        created
    }

    /// Grow a tile's missing neighbors in all six directions.
    pub fn surround(&mut self, at: TileId, template: TileTemplate) -> Vec<TileId> {
        self.grow(at, &Direction::ALL, template)
    }

    /// Surround the whole map with a border of new tiles.
    pub fn surround_all(&mut self, template: TileTemplate) -> Vec<TileId> {
        self.grow_all(&Direction::ALL, template)
    }

    /// Rescan every tile and update the bounding box.
    ///
    /// Growth leaves the box stale on purpose; call this once after a
    /// construction sequence finishes.
    pub fn recompute_bounds(&mut self) {
        self.bounds = Bounds::of(self.tiles.iter());
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Find the tile at the given coordinates.
    ///
    /// Intended for tests and debugging; construction never needs it.
    pub fn find_by_coordinate(&self, x: i32, y: f64) -> Result<TileId, MapError> {
        let half_y = (y * 2.0).round() as i32;
        self.tiles
            .iter()
            .find(|tile| tile.x() == x && tile.half_y() == half_y)
            .map(Tile::id)
            .ok_or(MapError::NoTileAt { x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_mutual(map: &HexMap) {
        for tile in map.tiles() {
            for (dir, other) in tile.neighbors() {
                assert_eq!(
                    map.tile(other).neighbor(dir.opposite()),
                    Some(tile.id()),
                    "link {:?} -> {:?} is not mutual",
                    tile.id(),
                    other
                );
            }
        }
    }

    #[test]
    fn grow_links_both_ways_and_places_the_child() {
        let mut map = HexMap::new();
        let center = map.start(TileTemplate::TERRAIN);
        let created = map.grow(center, &[Direction::North], TileTemplate::TERRAIN);
        assert_eq!(created.len(), 1);

        let up = created[0];
        assert_eq!(map.tile(center).neighbor(Direction::North), Some(up));
        assert_eq!(map.tile(up).neighbor(Direction::South), Some(center));
        assert_eq!(map.tile(up).x(), 0);
        assert_eq!(map.tile(up).y(), -1.0);
    }

    #[test]
    fn existing_neighbors_are_never_overwritten() {
        let mut map = HexMap::new();
        let center = map.start(TileTemplate::TERRAIN);
        let first = map.grow(center, &[Direction::North], TileTemplate::TERRAIN);
        let second = map.grow(center, &[Direction::North], TileTemplate::TERRAIN);
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn surround_closes_the_ring() {
        let mut map = HexMap::new();
        let center = map.start(TileTemplate::TERRAIN);
        let ring = map.surround(center, TileTemplate::TERRAIN);
        assert_eq!(ring.len(), 6);
        assert_mutual(&map);

        // Corner propagation must have linked consecutive ring tiles to
        // each other, not just to the center.
        for i in 0..6 {
            let here = ring[i];
            let next = ring[(i + 1) % 6];
            let linked = map
                .tile(here)
                .neighbors()
                .any(|(_, other)| other == next);
            assert!(linked, "ring tiles {:?} and {:?} not linked", here, next);
        }
    }

    #[test]
    fn grow_all_visits_a_snapshot() {
        let mut map = HexMap::new();
        let center = map.start(TileTemplate::TERRAIN);
        map.surround(center, TileTemplate::TERRAIN);

        let lacking_north = map
            .tiles()
            .filter(|t| t.neighbor(Direction::North).is_none())
            .count();
        let created = map.grow_all(&[Direction::North], TileTemplate::TERRAIN);

        // Tiles created mid-pass are not grown in the same pass.
        assert_eq!(created.len(), lacking_north);
        assert_mutual(&map);
    }

    #[test]
    fn two_surrounds_make_nineteen_tiles() {
        let mut map = HexMap::new();
        let center = map.start(TileTemplate::TERRAIN);
        map.surround(center, TileTemplate::TERRAIN);
        map.surround_all(TileTemplate::TERRAIN);
        assert_eq!(map.len(), 19);
        assert_mutual(&map);

        // Interior tiles have all six neighbors.
        assert_eq!(map.tile(center).neighbors().count(), 6);
    }

    #[test]
    fn disconnect_all_is_symmetric() {
        let mut map = HexMap::new();
        let center = map.start(TileTemplate::TERRAIN);
        let ring = map.surround(center, TileTemplate::TERRAIN);

        map.disconnect_all(center);
        assert_eq!(map.tile(center).neighbors().count(), 0);
        for id in ring {
            assert!(map
                .tile(id)
                .neighbors()
                .all(|(_, other)| other != center));
        }
    }

    #[test]
    fn bounds_cover_the_grown_map() {
        let mut map = HexMap::new();
        let center = map.start(TileTemplate::TERRAIN);
        map.surround(center, TileTemplate::TERRAIN);
        map.recompute_bounds();
        assert_eq!(
            map.bounds(),
            Bounds {
                left: -1,
                right: 1,
                top: -2,
                bottom: 2
            }
        );
    }

    #[test]
    fn find_by_coordinate_round_trips() {
        let mut map = HexMap::new();
        let center = map.start(TileTemplate::TERRAIN);
        let ring = map.surround(center, TileTemplate::TERRAIN);

        let north_east = ring[1];
        let tile = map.tile(north_east);
        assert_eq!(
            map.find_by_coordinate(tile.x(), tile.y()),
            Ok(north_east)
        );
        assert_eq!(
            map.find_by_coordinate(40, 2.0),
            Err(MapError::NoTileAt { x: 40, y: 2.0 })
        );
    }
}
