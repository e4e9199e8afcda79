//! Tile primitives for the hex board graph.
//!
//! This module provides the building blocks the rest of the crate works with:
//! - `Direction`: the six edge directions of a flat-top hex column layout
//! - `TileId`: an arena index identifying one tile
//! - `Tile`: a node in the adjacency graph plus its board attributes
//! - `Resource` / `Terrain` / `Harbor`: the board attribute vocabulary
//!
//! Tiles never hold references to each other. Neighbor slots store `TileId`
//! values resolved through the owning [`crate::map::HexMap`] arena, which
//! sidesteps ownership cycles in the mutually-linked graph.

use serde::{Deserialize, Serialize};

/// The six edge directions of a hex, clockwise from straight up.
///
/// The board uses flat-top hexes arranged in vertical columns, so the six
/// neighbors sit above, below, and at the four diagonals. Directions are
/// also the angle vocabulary for the derived orderings: the spiral walk
/// turns counter-clockwise one step at a time, and corner propagation works
/// on pairs of directions 60 degrees apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Straight up
    North,
    /// Up and to the right
    NorthEast,
    /// Down and to the right
    SouthEast,
    /// Straight down
    South,
    /// Down and to the left
    SouthWest,
    /// Up and to the left
    NorthWest,
}

impl Direction {
    /// All six directions in clockwise order starting from North
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing back the other way (180 degrees around)
    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 3) % 6]
    }

    /// Rotate one step (60 degrees) clockwise
    pub fn turn_cw(self) -> Direction {
        Direction::ALL[(self.index() + 1) % 6]
    }

    /// Rotate one step (60 degrees) counter-clockwise
    pub fn turn_ccw(self) -> Direction {
        Direction::ALL[(self.index() + 5) % 6]
    }

    /// Planar offset of a neighbor in this direction.
    ///
    /// The x unit is one column; the y unit is one *half-row*. Diagonal
    /// neighbors sit half a tile higher or lower than their parent, so
    /// half-rows keep every coordinate an exact integer.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -2),
            Direction::NorthEast => (1, -1),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 2),
            Direction::SouthWest => (-1, 1),
            Direction::NorthWest => (-1, -1),
        }
    }
}

/// Identifier of a tile inside its map arena.
///
/// Ids are assigned in creation order and never reused, so they double as a
/// stable sort key when intersections are canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub(crate) u32);

impl TileId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Resource types produced by terrain tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Brick,
    Lumber,
    Ore,
    Grain,
    Wool,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Ore,
        Resource::Grain,
        Resource::Wool,
    ];

    /// The terrain that produces this resource
    pub fn terrain(self) -> Terrain {
        match self {
            Resource::Brick => Terrain::Hills,
            Resource::Lumber => Terrain::Forest,
            Resource::Ore => Terrain::Mountains,
            Resource::Grain => Terrain::Fields,
            Resource::Wool => Terrain::Pasture,
        }
    }
}

/// Terrain categories a land tile can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Hills,
    Forest,
    Mountains,
    Fields,
    Pasture,
    /// Produces nothing and never carries a number
    Desert,
}

impl Terrain {
    /// All terrain categories
    pub const ALL: [Terrain; 6] = [
        Terrain::Hills,
        Terrain::Forest,
        Terrain::Mountains,
        Terrain::Fields,
        Terrain::Pasture,
        Terrain::Desert,
    ];

    /// The resource this terrain produces, if any
    pub fn resource(self) -> Option<Resource> {
        match self {
            Terrain::Hills => Some(Resource::Brick),
            Terrain::Forest => Some(Resource::Lumber),
            Terrain::Mountains => Some(Resource::Ore),
            Terrain::Fields => Some(Resource::Grain),
            Terrain::Pasture => Some(Resource::Wool),
            Terrain::Desert => None,
        }
    }
}

/// Harbor types for the port tiles around the board edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Harbor {
    /// 3:1 trade for any resource
    Generic,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

impl Harbor {
    /// The exchange rate offered by this harbor
    pub fn rate(self) -> u32 {
        match self {
            Harbor::Generic => 3,
            Harbor::Specific(_) => 2,
        }
    }
}

/// What a tile currently holds.
///
/// Every tile starts out `Unassigned`; the layout engine rewrites kinds on
/// each assignment pass, so a kind is never a structural property of the
/// graph (the port *flag* is - see [`Tile::is_port`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// No layout pass has touched this tile yet
    Unassigned,
    /// A land tile with a terrain category
    Terrain(Terrain),
    /// A port tile with a harbor
    Harbor(Harbor),
}

/// Production frequency weight for a dice number.
///
/// The weight counts the ways the number can be rolled on two dice:
/// `6 - |7 - n|`, so 6 and 8 weigh 5 while 2 and 12 weigh 1.
pub fn pips_for(number: u8) -> u8 {
    debug_assert!((2..=12).contains(&number) && number != 7);
    6 - (7 - i32::from(number)).unsigned_abs() as u8
}

/// One hexagonal cell in the board graph.
///
/// A tile records its identity, its planar position (fixed relative to its
/// parent at creation and never recomputed), its six neighbor slots, and the
/// board attributes the layout engine assigns: kind, production number, and
/// the port flag. Pips are derived from the number on demand rather than
/// stored, so the two can never drift apart.
#[derive(Debug, Clone, Serialize)]
pub struct Tile {
    pub(crate) id: TileId,
    pub(crate) x: i32,
    pub(crate) half_y: i32,
    pub(crate) neighbors: [Option<TileId>; 6],
    pub(crate) kind: TileKind,
    pub(crate) number: Option<u8>,
    pub(crate) port: bool,
    #[serde(skip)]
    pub(crate) placed: bool,
}

impl Tile {
    pub(crate) fn new(id: TileId, port: bool) -> Self {
        Self {
            id,
            x: 0,
            half_y: 0,
            neighbors: [None; 6],
            kind: TileKind::Unassigned,
            number: None,
            port,
            placed: false,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    /// Column coordinate
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Row coordinate in half-row units (diagonal neighbors differ by 1)
    pub fn half_y(&self) -> i32 {
        self.half_y
    }

    /// Row coordinate in full rows
    pub fn y(&self) -> f64 {
        f64::from(self.half_y) / 2.0
    }

    /// The neighbor in the given direction, if linked
    pub fn neighbor(&self, dir: Direction) -> Option<TileId> {
        self.neighbors[dir.index()]
    }

    /// All linked neighbors with their directions
    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, TileId)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.neighbor(dir).map(|id| (dir, id)))
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// The terrain on this tile, if a layout pass assigned one
    pub fn terrain(&self) -> Option<Terrain> {
        match self.kind {
            TileKind::Terrain(t) => Some(t),
            _ => None,
        }
    }

    /// The harbor on this tile, if a layout pass assigned one
    pub fn harbor(&self) -> Option<Harbor> {
        match self.kind {
            TileKind::Harbor(h) => Some(h),
            _ => None,
        }
    }

    /// The production number (2-12, never 7), if assigned
    pub fn number(&self) -> Option<u8> {
        self.number
    }

    /// Production frequency weight derived from the number.
    ///
    /// `None` for tiles that produce nothing: deserts, ports, and tiles no
    /// layout pass has numbered yet.
    pub fn pips(&self) -> Option<u8> {
        self.number.map(pips_for)
    }

    /// Whether this tile belongs to the port ring around the board
    pub fn is_port(&self) -> bool {
        self.port
    }

    pub(crate) fn set_kind(&mut self, kind: TileKind) {
        self.kind = kind;
    }

    pub(crate) fn set_number(&mut self, number: Option<u8>) {
        debug_assert!(number.map_or(true, |n| (2..=12).contains(&n) && n != 7));
        self.number = number;
    }
}
