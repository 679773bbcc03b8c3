//! Minimal .xlsx writer for report fixtures
//!
//! Produces just enough SpreadsheetML for calamine to read: workbook,
//! relationships, styles and one worksheet per sheet with inline strings.
//! Dates are written as ISO `t="d"` cells, or as serial numbers with a
//! built-in date format the way Excel saves them.

use chrono::{Months, NaiveDate};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use callstats_ingest::services::workbook::{SUMMARY_SHEET, VERBATIM_SHEET, VOC_SHEET};

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

pub type Grid = Vec<Vec<Cell>>;

/// How date cells are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `t="d"` ISO 8601 text; calamine reads `Data::DateTimeIso`
    Iso,
    /// Day serial with number format 14; calamine reads `Data::DateTime`
    Serial,
}

/// Values of summary data row `i` (0 = oldest month)
///
/// Every field differs per row so stored rows cannot be confused.
pub fn summary_values(i: usize) -> (i64, f64, f64, f64, f64) {
    let i = i as f64;
    (
        2000 + 11 * i as i64,
        0.20 + 0.01 * i,
        0.80 - 0.01 * i,
        0.10 + 0.005 * i,
        0.85 + 0.01 * i,
    )
}

/// (promoters, passives, detractors) of VOC column `i` (0 = oldest month)
pub fn voc_values(i: usize) -> (i64, i64, i64) {
    let i = i as i64;
    (300 + i, 100 + i, 50 + i)
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

/// `count` first-of-month dates, oldest first, ending at (year, month)
pub fn months_ending(year: i32, month: u32, count: u32) -> Vec<NaiveDate> {
    let last = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    (0..count)
        .rev()
        .map(|back| last - Months::new(back))
        .collect()
}

/// Header row plus twelve months ending at the report period
///
/// The report month holds 2121 calls, 31% abandoned, 69% FCR, 96% CSAT.
fn summary_grid(year: i32, month: u32) -> Grid {
    let mut grid = vec![vec![
        text("Month"),
        text("Calls Offered"),
        text("Abandon after 30s"),
        text("FCR"),
        text("DSAT"),
        text("CSAT"),
    ]];

    for (i, date) in months_ending(year, month, 12).into_iter().enumerate() {
        let (calls, abandoned, fcr, dsat, csat) = summary_values(i);
        grid.push(vec![
            Cell::Date(date),
            Cell::Number(calls as f64),
            Cell::Number(abandoned),
            Cell::Number(fcr),
            Cell::Number(dsat),
            Cell::Number(csat),
        ]);
    }
    grid
}

/// Row 1 dates in B..W; promoters, passives, detractors in rows 4, 6, 8
fn voc_grid(year: i32, month: u32) -> Grid {
    let dates = months_ending(year, month, 22);

    let mut header = vec![text("Base Size")];
    header.extend(dates.iter().map(|d| Cell::Date(*d)));

    let counts = |label: &str, pick: fn((i64, i64, i64)) -> i64| {
        let mut row = vec![text(label)];
        row.extend((0..dates.len()).map(|i| Cell::Number(pick(voc_values(i)) as f64)));
        row
    };
    let blank = |label: &str| vec![text(label)];

    vec![
        header,
        blank("NPS"),
        blank(""),
        counts("Promoters", |v| v.0),
        blank(""),
        counts("Passives", |v| v.1),
        blank(""),
        counts("Detractors", |v| v.2),
    ]
}

/// The three required sheets of a valid report for (year, month)
pub fn report_sheets(year: i32, month: u32) -> Vec<(String, Grid)> {
    vec![
        (SUMMARY_SHEET.to_string(), summary_grid(year, month)),
        (VOC_SHEET.to_string(), voc_grid(year, month)),
        (
            VERBATIM_SHEET.to_string(),
            vec![vec![text("Great service, thank you")]],
        ),
    ]
}

/// Bytes of a valid report workbook for (year, month)
pub fn report_workbook(year: i32, month: u32) -> Vec<u8> {
    write_xlsx(&report_sheets(year, month))
}

/// Serialize sheets into .xlsx bytes with ISO date cells
pub fn write_xlsx(sheets: &[(String, Grid)]) -> Vec<u8> {
    write_xlsx_with(sheets, DateStyle::Iso)
}

/// Serialize sheets into .xlsx bytes
pub fn write_xlsx_with(sheets: &[(String, Grid)], dates: DateStyle) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut put = |name: String, body: String| {
        zip.start_file(name, options).expect("start zip entry");
        zip.write_all(body.as_bytes()).expect("write zip entry");
    };

    put("[Content_Types].xml".to_string(), content_types(sheets.len()));
    put(
        "_rels/.rels".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
        ),
    );
    put("xl/workbook.xml".to_string(), workbook_xml(sheets));
    put("xl/_rels/workbook.xml.rels".to_string(), workbook_rels(sheets.len()));
    put(
        "xl/styles.xml".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="{MAIN_NS}"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs></styleSheet>"#
        ),
    );
    for (i, (_, grid)) in sheets.iter().enumerate() {
        put(format!("xl/worksheets/sheet{}.xml", i + 1), sheet_xml(grid, dates));
    }

    zip.finish().expect("finish zip").into_inner()
}

fn content_types(sheet_count: usize) -> String {
    let overrides: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>{overrides}</Types>"#
    )
}

fn workbook_xml(sheets: &[(String, Grid)]) -> String {
    let entries: String = sheets
        .iter()
        .enumerate()
        .map(|(i, (name, _))| {
            format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(name),
                i + 1,
                i + 1
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets>{entries}</sheets></workbook>"#
    )
}

fn workbook_rels(sheet_count: usize) -> String {
    let mut rels: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{i}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{i}.xml"/>"#
            )
        })
        .collect();
    rels.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="{REL_NS}/styles" Target="styles.xml"/>"#,
        sheet_count + 1
    ));

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}">{rels}</Relationships>"#
    )
}

fn sheet_xml(grid: &Grid, dates: DateStyle) -> String {
    let mut rows = String::new();
    for (r, row) in grid.iter().enumerate() {
        let cells: String = row
            .iter()
            .enumerate()
            .filter_map(|(c, cell)| cell_xml(r, c, cell, dates))
            .collect();
        if !cells.is_empty() {
            rows.push_str(&format!(r#"<row r="{}">{}</row>"#, r + 1, cells));
        }
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{MAIN_NS}"><sheetData>{rows}</sheetData></worksheet>"#
    )
}

fn cell_xml(row: usize, col: usize, cell: &Cell, dates: DateStyle) -> Option<String> {
    let reference = format!("{}{}", column_name(col), row + 1);
    match cell {
        Cell::Empty => None,
        Cell::Text(s) if s.is_empty() => None,
        Cell::Number(n) => Some(format!(r#"<c r="{reference}"><v>{n}</v></c>"#)),
        Cell::Text(s) => Some(format!(
            r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
            escape(s)
        )),
        Cell::Date(d) => Some(match dates {
            DateStyle::Iso => format!(
                r#"<c r="{reference}" t="d"><v>{}</v></c>"#,
                d.format("%Y-%m-%dT00:00:00")
            ),
            DateStyle::Serial => format!(
                r#"<c r="{reference}" s="1"><v>{}</v></c>"#,
                excel_serial(*d)
            ),
        }),
    }
}

/// Days since 1899-12-30 (1900 date system)
fn excel_serial(date: NaiveDate) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch");
    (date - epoch).num_days()
}

/// 0 -> "A", 25 -> "Z", 26 -> "AA"
fn column_name(mut col: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).expect("ascii column name")
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
