//! Settlegen - a procedural board generator for hex-tile games
//!
//! This crate builds hexagonal-tile game boards, links the tiles into an
//! adjacency graph, derives the traversal orders layout needs (columns,
//! spiral, intersections), and assigns randomized terrain, number, and port
//! layouts validated against a pluggable set of structural constraints.
//!
//! # Architecture
//!
//! Construction is layered bottom-up:
//! - [`hex`]: tile primitives - directions, ids, tiles, and the resource
//!   vocabulary
//! - [`map`]: generic hex-tessellation growth with automatic corner linking
//! - [`board`]: the board-specific construction sequences plus the derived
//!   orderings computed once after construction
//! - [`layout`]: the assign-then-validate retry loop
//! - [`validate`]: the constraint predicates the retry loop evaluates
//!
//! The graph shape is fixed once built; only tile attributes change between
//! layout attempts. Rendering and statistics live outside this crate and
//! consume the board's query surface.
//!
//! # Example
//!
//! ```
//! use settlegen_core::{Board, BoardVariant, LayoutConfig, validate};
//!
//! let mut board = Board::new(BoardVariant::Standard, false)?;
//! let config = LayoutConfig {
//!     max_tries: Some(10_000),
//!     ..LayoutConfig::default()
//! };
//! let tries = board.layout(&config, &[validate::no_6_8(), validate::max_pip(11)])?;
//! assert!(tries >= 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod board;
pub mod hex;
pub mod layout;
pub mod map;
pub mod validate;

// Re-export commonly used types
pub use board::{Board, BoardError, BoardVariant, Intersection, TerrainStats};
pub use hex::{pips_for, Direction, Harbor, Resource, Terrain, Tile, TileId, TileKind};
pub use layout::{LayoutConfig, LayoutError, NumberMode, PortMode, TerrainMode};
pub use map::{Bounds, HexMap, MapError, TileTemplate};
pub use validate::Validator;
