use std::path::Path;

use anyhow::{Context, Result};

use super::model::SpectrumTable;

// ---------------------------------------------------------------------------
// Spectrum CSV loader
// ---------------------------------------------------------------------------

/// Load a spectrum table from a CSV file.
///
/// Expected layout: one sample per line, `j,E0,E1,...,Ek`, comma-delimited,
/// no header. Lines starting with `#` are comments and are skipped. All
/// fields are parsed as `f64`; rows must all carry the same number of level
/// columns.
pub fn load_spectrum(path: &Path) -> Result<SpectrumTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut j = Vec::new();
    let mut levels = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("reading row {row_no}"))?;
        let mut fields = record.iter();

        let j_field = fields
            .next()
            .with_context(|| format!("row {row_no}: empty record"))?;
        j.push(parse_field(j_field, row_no, 0)?);

        let row: Vec<f64> = fields
            .enumerate()
            .map(|(col, tok)| parse_field(tok, row_no, col + 1))
            .collect::<Result<_>>()?;
        levels.push(row);
    }

    SpectrumTable::new(j, levels)
        .with_context(|| format!("malformed spectrum table {}", path.display()))
}

fn parse_field(tok: &str, row: usize, col: usize) -> Result<f64> {
    tok.trim()
        .parse::<f64>()
        .with_context(|| format!("row {row}, column {col}: '{tok}' is not a number"))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_rows_and_skips_comments() {
        let path = fixture(
            "gapplot_loader_comments.csv",
            "# solver metadata\n0.1,-4.0,-3.5\n# midway note\n0.2,-4.2,-3.6\n",
        );
        let table = load_spectrum(&path).unwrap();
        assert_eq!(table.j, vec![0.1, 0.2]);
        assert_eq!(table.levels, vec![vec![-4.0, -3.5], vec![-4.2, -3.6]]);
    }

    #[test]
    fn non_numeric_field_names_position() {
        let path = fixture("gapplot_loader_bad_field.csv", "0.1,-4.0\n0.2,oops\n");
        let err = load_spectrum(&path).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("row 1"), "got: {msg}");
        assert!(msg.contains("oops"), "got: {msg}");
    }

    #[test]
    fn ragged_row_is_rejected() {
        let path = fixture("gapplot_loader_ragged.csv", "0.1,-4.0,-3.5\n0.2,-4.2\n");
        assert!(load_spectrum(&path).is_err());
    }

    #[test]
    fn comment_only_file_is_empty() {
        let path = fixture("gapplot_loader_empty.csv", "# nothing but comments\n");
        assert!(load_spectrum(&path).is_err());
    }
}
