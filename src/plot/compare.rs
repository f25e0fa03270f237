use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::color::series_palette;
use crate::data::loader::load_spectrum;
use crate::data::model::{SpectrumTable, TableError};
use crate::plot::{render_line_chart, Marker, Series, SeriesPlot};

/// Couplings closer than this are the same grid point.
const ALIGN_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Comparison job: MPS spectrum, optionally against an ED reference
// ---------------------------------------------------------------------------

/// One comparison run. `new` derives the conventional per-spin-sector
/// directories; every field stays overridable.
#[derive(Debug, Clone)]
pub struct CompareJob {
    pub model: String,
    pub n_sites: usize,
    pub spin: String,
    pub log_dir: PathBuf,
    pub plot_dir: PathBuf,
    /// ED reference spectrum to overlay; `None` plots the MPS data alone.
    pub reference: Option<PathBuf>,
    /// How many of the lowest levels the energies and deviation plots show.
    pub levels_shown: usize,
    /// Coupling window applied when a reference is overlaid.
    pub x_window: Option<(f64, f64)>,
    pub size: (u32, u32),
}

impl CompareJob {
    pub fn new(model: &str, n_sites: usize, spin: &str) -> Self {
        Self {
            model: model.to_string(),
            n_sites,
            spin: spin.to_string(),
            log_dir: PathBuf::from(format!("./logs_spin{spin}")),
            plot_dir: PathBuf::from(format!("./plots_spin{spin}")),
            reference: None,
            levels_shown: 3,
            x_window: Some((0.1, 2.1)),
            size: (2560, 1920),
        }
    }

    /// Point `reference` at the conventional ED output for this model and
    /// size.
    pub fn with_ed_reference(mut self) -> Self {
        self.reference = Some(PathBuf::from(format!(
            "./exact-diagonalisation/{}_{}.csv",
            self.model, self.n_sites
        )));
        self
    }

    /// Base name shared by the log file and every plot file.
    pub fn fname(&self) -> String {
        format!("{}{}", self.model, self.n_sites)
    }
}

// ---------------------------------------------------------------------------
// Plotting
// ---------------------------------------------------------------------------

/// Plot `<log_dir>/<model><n>_energies.csv`: the lowest `levels_shown`
/// levels (rows re-sorted ascending, in case the solver converged to a
/// permuted ordering), the gap of every excited level, and, when a
/// reference is configured, the overlay and the pointwise deviation
/// `|MPS_i - ED_i|` over the reference coupling grid.
pub fn plot_mps_vs_ed(job: &CompareJob) -> Result<()> {
    let fname = job.fname();
    let log_file = job.log_dir.join(format!("{fname}_energies.csv"));
    let mut table = load_spectrum(&log_file)
        .with_context(|| format!("loading spectrum {}", log_file.display()))?;
    require_levels(&table, job.levels_shown)?;
    table.sort_rows();

    let reference = match &job.reference {
        Some(path) => {
            let r = load_spectrum(path)
                .with_context(|| format!("loading reference {}", path.display()))?;
            require_levels(&r, job.levels_shown)?;
            Some(r)
        }
        None => None,
    };

    let caption_tail = format!("{fname} spin{}", job.spin);
    let x_window = reference.as_ref().and(job.x_window);

    // lowest levels, with the reference overlaid on the same axes
    let mut series = lowest_level_series(&table, job.levels_shown);
    if let Some(r) = &reference {
        series.extend(reference_series(r, job.levels_shown));
    }
    let energies_png = job.plot_dir.join(format!("{fname}_energies.png"));
    render_line_chart(
        &energies_png,
        job.size,
        &SeriesPlot {
            caption: format!("MPS energies | {caption_tail}"),
            x_desc: String::from("J"),
            y_desc: String::from("energy"),
            x_window,
            series,
        },
    )?;
    log::info!("wrote {}", energies_png.display());

    // pointwise deviation from the reference, aligned by coupling value
    if let Some(r) = &reference {
        let deviations = aligned_deviations(&table, r, job.levels_shown)?;
        let colors = series_palette(job.levels_shown);
        let series = deviations
            .into_iter()
            .enumerate()
            .map(|(e, points)| Series {
                name: format!("|MPS-ED|{e}"),
                color: colors[e],
                marker: Marker::Cross,
                points,
            })
            .collect();
        let diff_png = job.plot_dir.join(format!("{fname}_mps_vs_ed.png"));
        render_line_chart(
            &diff_png,
            job.size,
            &SeriesPlot {
                caption: format!("MPS vs ED | {caption_tail}"),
                x_desc: String::from("J"),
                y_desc: String::from("energy"),
                x_window,
                series,
            },
        )?;
        log::info!("wrote {}", diff_png.display());
    }

    // gaps over every level column, not just the plotted ones
    let gap_png = job.plot_dir.join(format!("{fname}_gap.png"));
    render_line_chart(
        &gap_png,
        job.size,
        &SeriesPlot {
            caption: format!("MPS energy gap | {caption_tail}"),
            x_desc: String::from("J"),
            y_desc: String::from("energy gap"),
            x_window: None,
            series: super::spectrum::gap_series(&table),
        },
    )?;
    log::info!("wrote {}", gap_png.display());

    Ok(())
}

fn lowest_level_series(table: &SpectrumTable, count: usize) -> Vec<Series> {
    let colors = series_palette(count * 2);
    (0..count)
        .map(|e| Series {
            name: format!("MPS{e}"),
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

fn reference_series(reference: &SpectrumTable, count: usize) -> Vec<Series> {
    let colors = series_palette(count * 2);
    (0..count)
        .map(|e| Series {
            name: format!("ED{e}"),
            color: colors[count + e],
            marker: Marker::Circle,
            points: reference
                .j
                .iter()
                .copied()
                .zip(reference.level_column(e))
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

fn require_levels(table: &SpectrumTable, needed: usize) -> Result<(), TableError> {
    if table.level_count() < needed {
        return Err(TableError::TooFewLevels {
            needed,
            found: table.level_count(),
        });
    }
    Ok(())
}

/// Index of the primary row whose coupling matches the reference's first
/// coupling value. The two datasets may have been sampled over different
/// ranges; the shared tail is located by value, not by a fixed skip.
fn align_offset(j: &[f64], j_ref: f64) -> Result<usize, TableError> {
    j.iter()
        .position(|&x| (x - j_ref).abs() <= ALIGN_TOLERANCE)
        .ok_or(TableError::Misaligned {
            j_ref,
            rows: j.len(),
        })
}

/// Per-level deviation series `|MPS_e - ED_e|` over the reference coupling
/// grid, after aligning the primary rows to the reference grid.
fn aligned_deviations(
    table: &SpectrumTable,
    reference: &SpectrumTable,
    levels: usize,
) -> Result<Vec<Vec<(f64, f64)>>, TableError> {
    let offset = align_offset(&table.j, reference.j[0])?;
    let remaining = table.len() - offset;
    if remaining != reference.len() {
        return Err(TableError::RowCountMismatch {
            remaining,
            reference: reference.len(),
        });
    }

    Ok((0..levels)
        .map(|e| {
            reference
                .j
                .iter()
                .enumerate()
                .map(|(i, &jc)| {
                    let diff = (table.levels[offset + i][e] - reference.levels[i][e]).abs();
                    (jc, diff)
                })
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mps() -> SpectrumTable {
        // grid 0.0..0.4, reference starts at 0.2
        SpectrumTable::new(
            vec![0.0, 0.1, 0.2, 0.3, 0.4],
            vec![
                vec![-1.0, 0.0, 1.0],
                vec![-1.1, 0.0, 1.0],
                vec![-1.2, 0.1, 1.0],
                vec![-1.3, 0.2, 1.0],
                vec![-1.4, 0.3, 1.0],
            ],
        )
        .unwrap()
    }

    fn ed() -> SpectrumTable {
        SpectrumTable::new(
            vec![0.2, 0.3, 0.4],
            vec![
                vec![-1.25, 0.1, 1.0],
                vec![-1.25, 0.2, 1.0],
                vec![-1.45, 0.3, 1.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn offset_is_found_by_coupling_value() {
        assert_eq!(align_offset(&mps().j, 0.2).unwrap(), 2);
        assert_eq!(align_offset(&mps().j, 0.0).unwrap(), 0);
    }

    #[test]
    fn unmatched_coupling_is_misaligned() {
        let err = align_offset(&mps().j, 0.25).unwrap_err();
        assert!(matches!(err, TableError::Misaligned { .. }));
    }

    #[test]
    fn deviations_run_over_the_reference_grid() {
        let dev = aligned_deviations(&mps(), &ed(), 3).unwrap();
        assert_eq!(dev.len(), 3);
        // level 0: |-1.2 - -1.25|, |-1.3 - -1.25|, |-1.4 - -1.45|
        let expected = [0.05, 0.05, 0.05];
        for ((jc, diff), (j_ref, want)) in
            dev[0].iter().zip(ed().j.iter().zip(expected.iter()))
        {
            assert_eq!(jc, j_ref);
            assert!((diff - want).abs() < 1e-12);
        }
        // level 1 matches exactly
        for &(_, diff) in &dev[1] {
            assert_eq!(diff, 0.0);
        }
    }

    #[test]
    fn row_count_mismatch_is_an_error() {
        let short = SpectrumTable::new(vec![0.2, 0.3], vec![vec![0.0; 3], vec![0.0; 3]]).unwrap();
        let err = aligned_deviations(&mps(), &short, 3).unwrap_err();
        assert!(matches!(err, TableError::RowCountMismatch { .. }));
    }

    #[test]
    fn too_few_levels_is_an_error() {
        let narrow = SpectrumTable::new(vec![0.0], vec![vec![1.0, 2.0]]).unwrap();
        assert!(matches!(
            require_levels(&narrow, 3).unwrap_err(),
            TableError::TooFewLevels { needed: 3, found: 2 }
        ));
    }

    #[test]
    fn job_derives_conventional_paths() {
        let job = CompareJob::new("ising", 16, "Half").with_ed_reference();
        assert_eq!(job.fname(), "ising16");
        assert_eq!(job.log_dir, PathBuf::from("./logs_spinHalf"));
        assert_eq!(job.plot_dir, PathBuf::from("./plots_spinHalf"));
        assert_eq!(
            job.reference.as_deref(),
            Some(std::path::Path::new("./exact-diagonalisation/ising_16.csv"))
        );
    }
}
