//! Character-grid rendering of a laid-out board.
//!
//! Each hex is drawn as a 7-column block of ASCII art; port tiles show
//! their trade label and ratio instead of an outline. Tiles overlay a
//! shared grid so adjacent hexes interlock the way they do on the table.

use settlegen_core::{Board, Harbor, Resource, Terrain, Tile};

/// Grid label for a terrain category
fn terrain_label(terrain: Terrain) -> &'static str {
    match terrain {
        Terrain::Hills => "HILLS",
        Terrain::Forest => "FORST",
        Terrain::Mountains => "MOUNT",
        Terrain::Fields => "FIELD",
        Terrain::Pasture => "PASTR",
        Terrain::Desert => "DESRT",
    }
}

/// Grid label for the resource a harbor trades
fn harbor_label(harbor: Harbor) -> &'static str {
    match harbor {
        Harbor::Generic => "ANY",
        Harbor::Specific(Resource::Brick) => "BRICK",
        Harbor::Specific(Resource::Lumber) => "WOOD",
        Harbor::Specific(Resource::Ore) => "ORE",
        Harbor::Specific(Resource::Grain) => "GRAIN",
        Harbor::Specific(Resource::Wool) => "WOOL",
    }
}

/// The 5-row character block for one tile.
fn tile_block(tile: &Tile) -> Vec<String> {
    if tile.is_port() {
        let (label, rate) = match tile.harbor() {
            Some(harbor) => (harbor_label(harbor), harbor.rate()),
            None => ("?", 3),
        };
        return vec![
            String::new(),
            String::new(),
            format!("  {:^5}", label),
            format!("   {}:1", rate),
        ];
    }

    let label = tile.terrain().map(terrain_label).unwrap_or("");
    let mut block = vec![
        "  _____".to_string(),
        r" /     \ ".to_string(),
        format!("/ {:^5} \\ ", label),
    ];
    match tile.number() {
        Some(number) => block.push(format!("\\ {:^5} /", number)),
        None => block.push(r"\       /".to_string()),
    }
    block.push(r" \_____/".to_string());
    block
}

/// Draw the whole board as a text grid.
pub fn draw(board: &Board) -> String {
    let bounds = board.bounds();
    let width = (bounds.width() as usize) * 7 + 2;
    let height = ((bounds.height() + 1.5) as usize) * 4 + 1;
    let mut grid = vec![vec![' '; width]; height];

    for tile in board.tiles() {
        let start_col = ((tile.x() - bounds.left) * 7) as usize;
        let start_row = ((tile.half_y() - bounds.top) * 2) as usize;
        for (dy, line) in tile_block(tile).iter().enumerate() {
            for (dx, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                if let Some(cell) = grid
                    .get_mut(start_row + dy)
                    .and_then(|row| row.get_mut(start_col + dx))
                {
                    *cell = ch;
                }
            }
        }
    }

    let rows: Vec<String> = grid
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect();
    let first = rows.iter().position(|r| !r.is_empty()).unwrap_or(0);
    let last = rows.iter().rposition(|r| !r.is_empty()).unwrap_or(0);
    rows[first..=last].join("\n")
}
