use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::TableError;

// ---------------------------------------------------------------------------
// Wide-table reshaper: one solver table → one CSV per system size
// ---------------------------------------------------------------------------

/// Layout of the wide solver table and naming of the per-size output files.
///
/// The wide table is one CSV holding every system size: after a header row,
/// one row of coupling values, then `levels_per_size` consecutive rows of
/// energies per system size, smallest size first. Values start at column
/// `value_offset`; the leading columns carry row labels.
#[derive(Debug, Clone)]
pub struct ReshapeConfig {
    /// Energy rows per system size (the block period).
    pub levels_per_size: usize,
    /// First value-carrying column of each row.
    pub value_offset: usize,
    /// System size of the first block.
    pub first_size: usize,
    /// Size increment between consecutive blocks.
    pub size_step: usize,
    /// Output directory; must already exist.
    pub out_dir: PathBuf,
    /// Output file name prefix, completed as `<prefix><size>.csv`.
    pub prefix: String,
}

impl Default for ReshapeConfig {
    fn default() -> Self {
        Self {
            levels_per_size: 3,
            value_offset: 2,
            first_size: 4,
            size_step: 1,
            out_dir: PathBuf::from("./0_exact-diagonalisation_archive-h"),
            prefix: String::from("ising_"),
        }
    }
}

/// Split a wide solver table into one `[j, E0, E1, ...]` CSV per system
/// size. Returns the written paths, smallest size first.
///
/// Each complete block is transposed (rows become coupling samples, columns
/// become levels) and prepended with the coupling column. A trailing
/// incomplete block is dropped with a warning: its rows cannot form a
/// rectangular per-size table.
pub fn table_to_files(cfg: &ReshapeConfig, input: &Path) -> Result<Vec<PathBuf>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_path(input)
        .with_context(|| format!("opening {}", input.display()))?;

    let mut j: Vec<f64> = Vec::new();
    let mut block: Vec<Vec<f64>> = Vec::new();
    let mut size = cfg.first_size;
    let mut written = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("reading row {row_no}"))?;
        if row_no == 0 {
            // header row
            continue;
        }

        let values = parse_values(&record, cfg.value_offset, row_no)?;
        if row_no == 1 {
            j = values;
            continue;
        }

        if values.len() != j.len() {
            return Err(TableError::RaggedRow {
                row: row_no,
                expected: j.len(),
                found: values.len(),
            }
            .into());
        }
        block.push(values);

        if block.len() == cfg.levels_per_size {
            let path = cfg.out_dir.join(format!("{}{}.csv", cfg.prefix, size));
            write_size_file(&path, &j, &block)?;
            log::info!(
                "wrote {} ({} samples, {} levels)",
                path.display(),
                j.len(),
                block.len()
            );
            written.push(path);
            size += cfg.size_step;
            block.clear();
        }
    }

    if !block.is_empty() {
        log::warn!(
            "dropping incomplete final block for size {size}: {} of {} level rows",
            block.len(),
            cfg.levels_per_size
        );
    }

    Ok(written)
}

fn parse_values(record: &csv::StringRecord, offset: usize, row_no: usize) -> Result<Vec<f64>> {
    record
        .iter()
        .skip(offset)
        .enumerate()
        .map(|(col, tok)| {
            tok.trim().parse::<f64>().with_context(|| {
                format!("row {row_no}, column {}: '{tok}' is not a number", col + offset)
            })
        })
        .collect()
}

/// Write one per-size file: row i is `j[i]` followed by level i of every
/// block row (the transpose of the accumulated block).
fn write_size_file(path: &Path, j: &[f64], block: &[Vec<f64>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for (i, &ji) in j.iter().enumerate() {
        let mut row = Vec::with_capacity(1 + block.len());
        row.push(ji.to_string());
        for level_row in block {
            row.push(level_row[i].to_string());
        }
        writer
            .write_record(&row)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}
