//! Descriptive statistics and printed reports over generated boards.

use std::collections::BTreeMap;

use settlegen_core::{Board, Terrain};

/// Mean and standard deviation of a sequence.
///
/// `sample` switches the variance denominator from `n` to `n - 1`.
pub fn mean_dev(values: &[f64], sample: bool) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let denominator = if sample { n - 1.0 } else { n };
    let variance = values.iter().map(|v| (mean - v).powi(2)).sum::<f64>() / denominator;
    (mean, variance.sqrt())
}

/// Deciles of a sequence, from the minimum through the maximum.
pub fn percentiles(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    if sorted.is_empty() {
        return Vec::new();
    }
    let count = sorted.len();
    let mut quantiles = vec![sorted[0]];
    for percent in 1..10 {
        quantiles.push(sorted[count * percent / 10]);
    }
    quantiles.push(sorted[count - 1]);
    quantiles
}

fn terrain_name(terrain: Terrain) -> &'static str {
    match terrain {
        Terrain::Hills => "Hills",
        Terrain::Forest => "Forest",
        Terrain::Mountains => "Mountains",
        Terrain::Fields => "Fields",
        Terrain::Pasture => "Pasture",
        Terrain::Desert => "Desert",
    }
}

/// Print an analysis of the board's layout: generation effort, production
/// balance across terrains, terrain spread, and intersection quality.
pub fn analysis(board: &Board) {
    match board.tries() {
        0 => {}
        1 => println!("It took one try to generate this layout."),
        n => println!("It took {} tries to generate this layout.", n),
    }

    println!();
    let production = board.terrain_production();
    let total_pips: u32 = production.values().map(|s| s.pips).sum();
    let mut per_tile_scores = Vec::new();
    for (&terrain, stats) in &production {
        if terrain == Terrain::Desert {
            continue;
        }
        let per_tile = f64::from(stats.pips) / f64::from(stats.tiles);
        per_tile_scores.push(per_tile);
        println!(
            "{}: {} / {} pips ({:.1} per tile)",
            terrain_name(terrain),
            stats.pips,
            total_pips,
            per_tile
        );
    }
    let (_, dev) = mean_dev(&per_tile_scores, false);
    println!("The standard deviation for per tile production is {:.1}", dev);

    println!();
    let spread = board.terrain_spread();
    for (&terrain, &distance) in &spread {
        if terrain == Terrain::Desert {
            continue;
        }
        println!(
            "{} has an average distance of {:.1}.",
            terrain_name(terrain),
            distance
        );
    }
    let distances: Vec<f64> = spread.values().copied().collect();
    let (_, dev) = mean_dev(&distances, false);
    println!(
        "The standard deviation for terrain average distances is {:.1}",
        dev
    );

    println!();
    let tri_pips: Vec<f64> = board
        .intersection_pips(3)
        .into_iter()
        .map(f64::from)
        .collect();
    println!(
        "There are {} triple production intersections.",
        tri_pips.len()
    );
    let (mean, dev) = mean_dev(&tri_pips, false);
    println!(
        "Three tile pips have a mean of {:.1} and a deviation of {:.1}",
        mean, dev
    );
}

/// Aggregate statistics over a batch of generated boards.
#[derive(Debug, Default)]
pub struct SampleData {
    series: BTreeMap<&'static str, Vec<f64>>,
}

impl SampleData {
    fn push(&mut self, key: &'static str, value: f64) {
        self.series.entry(key).or_default().push(value);
    }

    /// Record one laid-out board.
    pub fn record(&mut self, board: &Board) {
        let production = board.terrain_production();
        let per_tile: Vec<f64> = production
            .iter()
            .filter(|(terrain, _)| **terrain != Terrain::Desert)
            .map(|(_, stats)| f64::from(stats.pips) / f64::from(stats.tiles))
            .collect();
        if let (Some(min), Some(max)) = (
            per_tile.iter().copied().reduce(f64::min),
            per_tile.iter().copied().reduce(f64::max),
        ) {
            self.push("min terrain pips per tile", min);
            self.push("max terrain pips per tile", max);
        }
        let (mean, dev) = mean_dev(&per_tile, false);
        self.push("terrain pips mean", mean);
        self.push("terrain pips deviation", dev);

        let distances: Vec<f64> = board.terrain_spread().values().copied().collect();
        if let (Some(min), Some(max)) = (
            distances.iter().copied().reduce(f64::min),
            distances.iter().copied().reduce(f64::max),
        ) {
            self.push("min terrain distance", min);
            self.push("max terrain distance", max);
        }
        let (mean, dev) = mean_dev(&distances, false);
        self.push("terrain distance mean", mean);
        self.push("terrain distance deviation", dev);

        let tri_pips: Vec<f64> = board
            .intersection_pips(3)
            .into_iter()
            .map(f64::from)
            .collect();
        let (mean, dev) = mean_dev(&tri_pips, false);
        self.push("triple intersection pips mean", mean);
        self.push("triple intersection pips deviation", dev);
    }

    /// Print a summary line per collected series plus the decile spread of
    /// the triple-intersection means.
    pub fn report(&self) {
        for (name, values) in &self.series {
            let (mean, dev) = mean_dev(values, true);
            println!("{}: mean {:.2}, deviation {:.2}", name, mean, dev);
        }
        if let Some(values) = self.series.get("triple intersection pips mean") {
            println!();
            println!("Decile spread of triple intersection means:");
            for (i, value) in percentiles(values).iter().enumerate() {
                match i {
                    0 => println!("  min: {:.2}", value),
                    10 => println!("  max: {:.2}", value),
                    n => println!("  {}0th percentile: {:.2}", n, value),
                }
            }
        }
    }
}
