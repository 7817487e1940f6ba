use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::survey::{io_common::simplify_file_name, *};

/// Reads a worksheet whose first row is the header.
pub fn read_excel_table(path: &str, cfs: &FileSource) -> SurveyResult<RawTable> {
    let wrange = get_range(path, cfs)?;
    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(|c| to_raw_value(c).to_label().unwrap_or_default())
        .map(|s| s.trim().to_string())
        .collect();
    debug!("read_excel_table: {:?}: header: {:?}", path, header);

    let mut rows: Vec<Vec<RawValue>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let row: Vec<RawValue> = row.iter().map(to_raw_value).collect();
        debug!("read_excel_table: idx: {:?} row: {:?}", idx, row);
        rows.push(row);
    }
    info!("read_excel_table: {:?}: {} rows", path, rows.len());
    Ok(RawTable::new(&simplify_file_name(path), header, rows))
}

fn to_raw_value(cell: &DataType) -> RawValue {
    match cell {
        DataType::Int(i) => RawValue::Int(*i),
        DataType::Float(f) => RawValue::Float(*f),
        DataType::String(s) if s.trim().is_empty() => RawValue::Empty,
        DataType::String(s) => RawValue::Text(s.clone()),
        DataType::Bool(b) => RawValue::Text(b.to_string()),
        DataType::DateTime(f) => RawValue::Float(*f),
        DataType::Empty => RawValue::Empty,
        x => {
            warn!("to_raw_value: unreadable cell {:?}, treated as empty", x);
            RawValue::Empty
        }
    }
}

fn get_range(path: &str, cfs: &FileSource) -> SurveyResult<Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "get_range: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => {
                let names: Vec<String> = all_worksheets.iter().map(|(n, _)| n.clone()).collect();
                MultipleWorksheetsSnafu {
                    path,
                    names: names.join(", "),
                }
                .fail()
            }
        }
    }
}
