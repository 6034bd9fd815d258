#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

#[derive(Debug, Clone)]
pub enum Cell {
    Num(f64),
    Str(&'static str),
    Empty,
}

pub const CABLE_LAYOUT_HEADER: [&str; 7] = [
    "Crate",
    "AMC/WFD5",
    "AMC Channel",
    "Detector System",
    "Subdetector",
    "Enabled",
    "Notes",
];

pub fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn sheet_xml(rows: &[Vec<Cell>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        let row_num = r + 1;
        xml.push_str(&format!(r#"<row r="{}">"#, row_num));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letter(c), row_num);
            match cell {
                Cell::Num(n) => xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n)),
                Cell::Str(s) => xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    reference,
                    escape(s)
                )),
                Cell::Empty => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Builds a minimal XLSX workbook with the given worksheets.
pub fn build_xlsx(sheets: &[(&str, Vec<Vec<Cell>>)]) -> Vec<u8> {
    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    );
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for (i, (name, _)) in sheets.iter().enumerate() {
        let n = i + 1;
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            n
        ));
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name),
            n,
            n
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));
    }
    content_types.push_str("</Types>");
    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");

    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>("[Content_Types].xml", FileOptions::default())
        .unwrap();
    zip.write_all(content_types.as_bytes()).unwrap();

    zip.start_file::<_, ()>("_rels/.rels", FileOptions::default())
        .unwrap();
    zip.write_all(root_rels.as_bytes()).unwrap();

    zip.start_file::<_, ()>("xl/workbook.xml", FileOptions::default())
        .unwrap();
    zip.write_all(workbook.as_bytes()).unwrap();

    zip.start_file::<_, ()>("xl/_rels/workbook.xml.rels", FileOptions::default())
        .unwrap();
    zip.write_all(rels.as_bytes()).unwrap();

    for (i, (_, rows)) in sheets.iter().enumerate() {
        zip.start_file::<_, ()>(
            format!("xl/worksheets/sheet{}.xml", i + 1),
            FileOptions::default(),
        )
        .unwrap();
        zip.write_all(sheet_xml(rows).as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

fn header_row() -> Vec<Cell> {
    CABLE_LAYOUT_HEADER.iter().map(|h| Cell::Str(*h)).collect()
}

/// The three-row layout from the channel map docs plus a notes column.
pub fn example_layout() -> Vec<Vec<Cell>> {
    vec![
        header_row(),
        vec![
            Cell::Num(1.0),
            Cell::Num(2.0),
            Cell::Num(3.0),
            Cell::Str("TPC"),
            Cell::Str("East"),
            Cell::Num(1.0),
            Cell::Empty,
        ],
        vec![
            Cell::Num(2.0),
            Cell::Empty,
            Cell::Num(4.0),
            Cell::Str("TPC"),
            Cell::Empty,
            Cell::Num(1.0),
            Cell::Str("spare"),
        ],
        vec![
            Cell::Num(3.0),
            Cell::Num(5.0),
            Cell::Num(6.0),
            Cell::Str("TPC"),
            Cell::Str("West"),
            Cell::Num(0.0),
            Cell::Str("off for run 12"),
        ],
    ]
}

pub fn example_workbook() -> Vec<u8> {
    build_xlsx(&[
        ("Readme", vec![vec![Cell::Str("see Cable Layout")]]),
        ("Cable Layout", example_layout()),
    ])
}
