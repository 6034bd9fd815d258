//! Decoding of spreadsheet exports into [`Row`]s.
//!
//! The first row of the sheet is the header. Blank header cells become
//! `Unnamed: <index>` and repeated headers get `.1`, `.2`, ... suffixes so every
//! column keeps a distinct name.

use crate::domain::model::{CellValue, Row};
use crate::utils::error::{EtlError, Result};
use calamine::{Data, DataType, Reader, Xlsx};
use std::collections::HashMap;
use std::io::Cursor;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn decode_xlsx(bytes: &[u8], worksheet: &str) -> Result<Vec<Row>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let sheet_names = workbook.sheet_names();
    if !sheet_names.iter().any(|name| name == worksheet) {
        return Err(EtlError::WorksheetNotFoundError {
            name: worksheet.to_string(),
            available: sheet_names.join(", "),
        });
    }

    let range = workbook.worksheet_range(worksheet)?;
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        tracing::warn!("⚠️ Worksheet '{}' is empty", worksheet);
        return Ok(Vec::new());
    };

    // range 從第一個有值的欄開始，補回 A 欄起的空白欄
    let leading = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    let columns = normalize_headers(
        std::iter::repeat(None)
            .take(leading)
            .chain(header.iter().map(header_name))
            .collect(),
    );
    tracing::debug!("Worksheet '{}' columns: {:?}", worksheet, columns);

    Ok(rows
        .map(|cells| {
            let padded = std::iter::repeat(CellValue::Null)
                .take(leading)
                .chain(cells.iter().map(xlsx_cell));
            build_row(&columns, padded)
        })
        .collect())
}

pub fn decode_csv(bytes: &[u8]) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();
    let Some(header) = records.next().transpose()? else {
        tracing::warn!("⚠️ CSV export is empty");
        return Ok(Vec::new());
    };

    let columns = normalize_headers(
        header
            .iter()
            .map(|name| (!name.is_empty()).then(|| name.to_string()))
            .collect(),
    );
    tracing::debug!("CSV columns: {:?}", columns);

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        if record.len() > columns.len() {
            tracing::warn!(
                "⚠️ CSV line {} has {} fields but only {} columns; extra fields dropped",
                record.position().map(|p| p.line()).unwrap_or_default(),
                record.len(),
                columns.len()
            );
        }
        rows.push(build_row(&columns, record.iter().map(csv_cell)));
    }

    Ok(rows)
}

fn build_row(columns: &[String], mut cells: impl Iterator<Item = CellValue>) -> Row {
    let mut row = Row::with_capacity(columns.len());
    for column in columns {
        row.push(column.clone(), cells.next().unwrap_or_default());
    }
    row
}

fn header_name(cell: &Data) -> Option<String> {
    match xlsx_cell(cell) {
        CellValue::Null => None,
        value => Some(value.to_string()),
    }
}

fn normalize_headers(raw: Vec<Option<String>>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(index, name)| {
            let name = name.unwrap_or_else(|| format!("Unnamed: {}", index));
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            unique
        })
        .collect()
}

fn xlsx_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| CellValue::Text(dt.format(DATETIME_FORMAT).to_string()))
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn csv_cell(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Null;
    }
    let trimmed = field.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(field.to_string()),
    }
}
