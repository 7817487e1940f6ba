// Primitives for reading CSV files.

use crate::survey::{io_common::simplify_file_name, *};

/// Reads a table with a header row.
///
/// Rows may have fewer cells than the header: the missing cells are empty.
pub fn read_csv_table(path: &str) -> SurveyResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu {
            path,
            lineno: 1usize,
        })?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    debug!("read_csv_table: {:?}: header: {:?}", path, header);

    let mut rows: Vec<Vec<RawValue>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let row: Vec<RawValue> = line.iter().map(RawValue::parse).collect();
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, row);
        rows.push(row);
    }
    info!("read_csv_table: {:?}: {} rows", path, rows.len());
    Ok(RawTable::new(&simplify_file_name(path), header, rows))
}
