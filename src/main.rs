mod color;
mod data;
mod plot;

use std::path::Path;

use anyhow::Result;

use data::reshape::{self, ReshapeConfig};
use plot::compare::{self, CompareJob};
use plot::spectrum::{self, PlotConfig};

fn main() -> Result<()> {
    env_logger::init();

    // Batch runs are selected by editing the calls below. Every entry point
    // is an independent transform and safe to re-run; output files are
    // overwritten in place.
    reshape::table_to_files(&ReshapeConfig::default(), Path::new("table.csv"))?;

    spectrum::plot_energies(&PlotConfig::default(), "ising")?;

    // ising16, ising32, heisenberg16, heisenberg32
    // compare::plot_mps_vs_ed(&CompareJob::new("ising", 4, "Half").with_ed_reference())?;
    // compare::plot_mps_vs_ed(&CompareJob::new("ising", 8, "Half").with_ed_reference())?;
    compare::plot_mps_vs_ed(&CompareJob::new("ising", 16, "Half").with_ed_reference())?;
    // compare::plot_mps_vs_ed(&CompareJob::new("ising", 64, "Half"))?;
    // compare::plot_mps_vs_ed(&CompareJob::new("ising", 128, "Half"))?;

    Ok(())
}
