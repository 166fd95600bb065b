use colored::Colorize;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

use crate::food::analysis::{extract_variable, AnalysisError, Histogram};
use crate::food::menu::MenuItem;

pub const Y_LABEL: &str = "Number of menu items";
/// Bar width as a share of the bin width.
const BAR_FILL: f64 = 0.7;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Failed to render chart: {0}")]
    Render(String),
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Histogram of one numeric field, labelled for display.
#[derive(Debug, Clone)]
pub struct MenuHistogram {
    pub title: String,
    pub x_label: String,
    pub histogram: Histogram,
}

impl MenuHistogram {
    /// `param_name` is the human-readable axis label; the raw field name is used without one.
    pub fn build<'a, I>(
        menu_items: I,
        title: &str,
        param: &str,
        param_name: Option<&str>,
        bin_count: usize,
    ) -> Result<Self, ChartError>
    where
        I: IntoIterator<Item = &'a MenuItem>,
    {
        let values = extract_variable(menu_items, param);
        let histogram = Histogram::from_values(&values, bin_count)?;

        Ok(Self {
            title: title.to_string(),
            x_label: param_name.unwrap_or(param).to_string(),
            histogram,
        })
    }

    pub fn render_svg(&self, path: &Path, size: (u32, u32)) -> Result<(), ChartError> {
        let (lo, hi) = self.histogram.range();
        let top = self.histogram.max_count() as u32 + 1;
        let half_bar = BAR_FILL * self.histogram.bin_width() / 2.0;

        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(lo..hi, 0u32..top)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(Y_LABEL)
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(self.histogram.bins().iter().map(|bin| {
                let center = bin.center();
                Rectangle::new(
                    [(center - half_bar, 0u32), (center + half_bar, bin.count as u32)],
                    BLUE.mix(0.8).filled(),
                )
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        log::info!("Wrote histogram of '{}' to {}", self.x_label, path.display());
        Ok(())
    }

    /// Horizontal bar chart, one row per bin, fitted to `width` columns.
    pub fn render_text(&self, width: usize) -> String {
        let bins = self.histogram.bins();
        let max_count = self.histogram.max_count().max(1);

        let labels: Vec<String> = bins
            .iter()
            .map(|bin| format!("{:>9.1} .. {:<9.1}", bin.lower, bin.upper))
            .collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let count_width = max_count.to_string().len();
        let bar_room = width.saturating_sub(label_width + count_width + 4).max(10);

        let mut out = String::new();
        out.push_str(&format!("{}\n", self.title.bold()));
        out.push_str(&format!("{} by {}\n\n", Y_LABEL, self.x_label));

        for (label, bin) in labels.iter().zip(bins) {
            let len = (bin.count * bar_room + max_count - 1) / max_count;
            out.push_str(&format!(
                "{} │{} {:>width$}\n",
                label,
                "█".repeat(len).cyan(),
                bin.count,
                width = count_width
            ));
        }
        out.push_str(&format!("\n{}: {}", "x".dimmed(), self.x_label));
        out
    }
}
