use crate::models::{cbsa::Cbsa, layer::RenderedLayer, style::Colour};
use crate::traits::LoadingSurface;
use crate::utils::format::format_count;
use comfy_table::{Attribute, Cell, CellAlignment, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

fn swatch(colour: &Colour) -> String {
    format!(
        "\x1b[38;2;{};{};{}m█\x1b[0m",
        colour.red, colour.green, colour.blue
    )
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| {
            Cell::new(t)
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center)
        })
        .collect()
}

/// Table of the highest-valued block groups in a rendered layer.
pub fn layer_summary_table(layer: &RenderedLayer, top: usize) -> Table {
    let mut ranked: Vec<_> = layer.features.iter().collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.geoid.cmp(&b.geoid)));

    let mut table = Table::new();
    table
        .set_header(header(&["#", "Block group", "Jobs", "Share of max", "Fill"]))
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED);

    for (rank, feature) in ranked.into_iter().take(top).enumerate() {
        let share = if layer.max_value > 0.0 {
            feature.value / layer.max_value * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(&feature.geoid),
            Cell::new(format_count(feature.value)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", share)).set_alignment(CellAlignment::Right),
            Cell::new(format!(
                "{} {}",
                swatch(&feature.style.fill_colour),
                feature.style.fill_colour
            )),
        ]);
    }
    table
}

pub fn print_layer_summary(layer: &RenderedLayer, legend: &[Colour], top: usize) {
    let bar: String = legend.iter().map(swatch).collect();
    println!(
        "\n🗺️ {} block groups, 0 {} {}\n{}",
        layer.len(),
        bar,
        format_count(layer.max_value),
        layer_summary_table(layer, top)
    );
    if layer.len() > top {
        println!("  … {} more", layer.len() - top);
    }
}

pub fn cbsa_table(cbsas: &[Cbsa]) -> Table {
    let mut table = Table::new();
    table
        .set_header(header(&["Code", "Name", "Jobs"]))
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED);
    for cbsa in cbsas {
        table.add_row(vec![
            Cell::new(&cbsa.code),
            Cell::new(&cbsa.name),
            Cell::new(format_count(cbsa.total_jobs as f64)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Terminal spinner standing in for the map's loading overlay.
#[derive(Default)]
pub struct SpinnerSurface {
    bar: Mutex<Option<ProgressBar>>,
}

impl LoadingSurface for SpinnerSurface {
    fn show(&self) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Loading block groups…");
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn hide(&self) {
        if let Some(pb) = self.bar.lock().ok().and_then(|mut bar| bar.take()) {
            pb.finish_and_clear();
        }
    }
}
