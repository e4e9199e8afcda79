//! Command-line front end: build a board, lay it out under the requested
//! constraints, then render or analyze it.

mod render;
mod stats;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use settlegen_core::{
    validate, Board, BoardVariant, LayoutConfig, NumberMode, PortMode, Terrain, TerrainMode,
    Validator,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    /// The 19-tile board for 3-4 players
    Standard,
    /// The 30-tile board for 5-6 players
    FiveSix,
}

impl From<VariantArg> for BoardVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Standard => BoardVariant::Standard,
            VariantArg::FiveSix => BoardVariant::FiveSix,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NumbersArg {
    Beginner,
    Standard,
    Shuffle,
}

impl From<NumbersArg> for NumberMode {
    fn from(arg: NumbersArg) -> Self {
        match arg {
            NumbersArg::Beginner => NumberMode::Beginner,
            NumbersArg::Standard => NumberMode::Standard,
            NumbersArg::Shuffle => NumberMode::Shuffle,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PortsArg {
    Beginner,
    Shuffle,
}

impl From<PortsArg> for PortMode {
    fn from(arg: PortsArg) -> Self {
        match arg {
            PortsArg::Beginner => PortMode::Beginner,
            PortsArg::Shuffle => PortMode::Shuffle,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TerrainArg {
    Beginner,
    Shuffle,
}

impl From<TerrainArg> for TerrainMode {
    fn from(arg: TerrainArg) -> Self {
        match arg {
            TerrainArg::Beginner => TerrainMode::Beginner,
            TerrainArg::Shuffle => TerrainMode::Shuffle,
        }
    }
}

/// Named layout constraints selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CheckArg {
    /// No intersection over 11 pips
    MaxPip,
    /// 6 and 8 never neighbor each other
    #[value(name = "no-6-8")]
    No68,
    /// 2 and 12 never neighbor each other
    #[value(name = "no-2-12")]
    No212,
    /// No equal numbers on neighboring tiles
    NoNumPairs,
    /// No equal terrain on neighboring tiles
    NoTerrPairs,
    /// No single-terrain three-tile intersection
    NoTerrTri,
    /// No terrain with two five-pip tiles
    #[value(name = "no-double-6-8")]
    NoDouble68,
    /// Every terrain tile has a same-terrain neighbor
    Regions,
    /// 2:1 ports see at most 3 pips of their own resource
    MaxPortPips,
    /// At least one mountain with 4+ pips
    GoodRock,
}

impl CheckArg {
    fn validator(self) -> Validator {
        match self {
            CheckArg::MaxPip => validate::max_pip(11),
            CheckArg::No68 => validate::no_6_8(),
            CheckArg::No212 => validate::no_2_12(),
            CheckArg::NoNumPairs => validate::no_num_pairs(),
            CheckArg::NoTerrPairs => validate::no_terr_pairs(),
            CheckArg::NoTerrTri => validate::no_terr_tri(),
            CheckArg::NoDouble68 => validate::no_double_6_8(),
            CheckArg::Regions => validate::regions(vec![Terrain::Desert]),
            CheckArg::MaxPortPips => validate::max_port_pips(3),
            CheckArg::GoodRock => validate::good_rock(4),
        }
    }
}

#[derive(Parser)]
#[command(name = "settlegen", about = "Procedural Settlers board generator", version)]
struct Cli {
    /// Board shape to generate
    #[arg(long, value_enum, default_value_t = VariantArg::Standard)]
    variant: VariantArg,

    /// Use the printed frame's port spacing (5/6 player board only)
    #[arg(long)]
    frame: bool,

    /// How to order the production numbers
    #[arg(long, value_enum, default_value_t = NumbersArg::Standard)]
    numbers: NumbersArg,

    /// How to order the terrain tiles
    #[arg(long, value_enum, default_value_t = TerrainArg::Shuffle)]
    terrain: TerrainArg,

    /// How to order the ports
    #[arg(long, value_enum, default_value_t = PortsArg::Shuffle)]
    ports: PortsArg,

    /// Layout constraints to enforce (repeatable)
    #[arg(long = "check", value_enum)]
    checks: Vec<CheckArg>,

    /// Give up after this many layout attempts
    #[arg(long)]
    max_tries: Option<u32>,

    /// Seed for reproducible generation
    #[arg(long)]
    seed: Option<u64>,

    /// Dump the laid-out board as JSON instead of a text grid
    #[arg(long)]
    json: bool,

    /// Skip the layout analysis report
    #[arg(long)]
    no_analysis: bool,

    /// Generate this many boards and report aggregate statistics instead
    #[arg(long)]
    sample: Option<u32>,
}

fn generate(
    cli: &Cli,
    config: &LayoutConfig,
    validators: &[Validator],
    rng: &mut Option<StdRng>,
) -> Result<Board> {
    let mut board =
        Board::new(cli.variant.into(), cli.frame).context("board construction failed")?;
    match rng {
        Some(rng) => board.layout_with_rng(config, validators, rng),
        None => board.layout(config, validators),
    }
    .context("no valid layout found")?;
    info!("layout accepted after {} tries", board.tries());
    Ok(board)
}

fn dump_json(board: &Board) -> Result<()> {
    let tiles: Vec<_> = board.tiles().collect();
    let dump = serde_json::json!({
        "variant": board.variant(),
        "tries": board.tries(),
        "bounds": board.bounds(),
        "tiles": tiles,
    });
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = LayoutConfig {
        numbers: cli.numbers.into(),
        ports: cli.ports.into(),
        terrain: cli.terrain.into(),
        max_tries: cli.max_tries,
    };
    let validators: Vec<Validator> = cli.checks.iter().map(|c| c.validator()).collect();
    // One RNG for the whole run, so a seed makes a sample batch reproducible
    // without every board in it coming out identical.
    let mut rng = cli.seed.map(StdRng::seed_from_u64);

    if let Some(count) = cli.sample {
        let mut data = stats::SampleData::default();
        for _ in 0..count {
            let board = generate(&cli, &config, &validators, &mut rng)?;
            data.record(&board);
        }
        data.report();
        return Ok(());
    }

    let board = generate(&cli, &config, &validators, &mut rng)?;
    if cli.json {
        dump_json(&board)?;
    } else {
        println!("{}", render::draw(&board));
        if !cli.no_analysis {
            println!();
            stats::analysis(&board);
        }
    }
    Ok(())
}
