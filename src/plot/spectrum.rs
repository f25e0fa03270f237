use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::color::series_palette;
use crate::data::loader::load_spectrum;
use crate::data::model::SpectrumTable;
use crate::plot::{render_line_chart, Marker, Series, SeriesPlot};

// ---------------------------------------------------------------------------
// Single-dataset plots: energies and gaps vs coupling
// ---------------------------------------------------------------------------

/// Where spectrum logs are read from and plots are written to. Both
/// directories must already exist.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub log_dir: PathBuf,
    pub plot_dir: PathBuf,
    /// Output bitmap size in pixels; 2560x1920 is a 6.4x4.8 in figure at
    /// 400 dpi.
    pub size: (u32, u32),
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            plot_dir: PathBuf::from("./plots"),
            size: (2560, 1920),
        }
    }
}

/// Plot the spectrum in `<log_dir>/<fname>_energies.csv`: every level as its
/// own series against the coupling, then the gap of every excited level to
/// the ground state. Levels are taken in file order, unsorted.
pub fn plot_energies(cfg: &PlotConfig, fname: &str) -> Result<()> {
    let log_file = cfg.log_dir.join(format!("{fname}_energies.csv"));
    let table = load_spectrum(&log_file)
        .with_context(|| format!("loading spectrum {}", log_file.display()))?;

    let energies_png = cfg.plot_dir.join(format!("{fname}_energies.png"));
    render_line_chart(
        &energies_png,
        cfg.size,
        &SeriesPlot {
            caption: String::from("Energies"),
            x_desc: String::from("J"),
            y_desc: String::from("energy"),
            x_window: None,
            series: level_series(&table),
        },
    )?;
    log::info!("wrote {}", energies_png.display());

    let gap_png = cfg.plot_dir.join(format!("{fname}_gap.png"));
    render_line_chart(
        &gap_png,
        cfg.size,
        &SeriesPlot {
            caption: String::from("Energy gap"),
            x_desc: String::from("J"),
            y_desc: String::from("energy gap"),
            x_window: None,
            series: gap_series(&table),
        },
    )?;
    log::info!("wrote {}", gap_png.display());

    Ok(())
}

/// One series per level column, labelled `E0..Ek`.
pub(crate) fn level_series(table: &SpectrumTable) -> Vec<Series> {
    let colors = series_palette(table.level_count());
    (0..table.level_count())
        .map(|e| Series {
            name: format!("E{e}"),
            color: colors[e],
            marker: Marker::Cross,
            points: table
                .j
                .iter()
                .copied()
                .zip(table.level_column(e))
                .collect(),
        })
        .collect()
}

/// One series per excited level, labelled `|E0-E1|..|E0-Ek|`.
pub(crate) fn gap_series(table: &SpectrumTable) -> Vec<Series> {
    let colors = series_palette(table.level_count().saturating_sub(1));
    (1..table.level_count())
        .map(|e| Series {
            name: format!("|E0-E{e}|"),
            color: colors[e - 1],
            marker: Marker::Cross,
            points: table.j.iter().copied().zip(table.gap_column(e)).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SpectrumTable {
        SpectrumTable::new(
            vec![0.0, 0.5],
            vec![vec![1.0, 2.0, 4.0], vec![1.5, 2.0, 4.5]],
        )
        .unwrap()
    }

    #[test]
    fn level_series_follow_file_order() {
        let series = level_series(&table());
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].name, "E0");
        assert_eq!(series[0].points, vec![(0.0, 1.0), (0.5, 1.5)]);
        assert_eq!(series[2].points, vec![(0.0, 4.0), (0.5, 4.5)]);
    }

    #[test]
    fn gap_series_measure_against_ground_state() {
        let series = gap_series(&table());
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "|E0-E1|");
        assert_eq!(series[0].points, vec![(0.0, 1.0), (0.5, 0.5)]);
        assert_eq!(series[1].name, "|E0-E2|");
        assert_eq!(series[1].points, vec![(0.0, 3.0), (0.5, 3.0)]);
    }
}
