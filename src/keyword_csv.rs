// src/keyword_csv.rs
use crate::core::types::{KeywordRow, Mode, Root};
use crate::error::{Result, RootError, NO_TERMS};
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: &str = "\u{feff}";

pub const FULL_HEADER: [&str; 5] = ["", "Normalized Root", "Frequency", "Broad Search Volume", ""];
pub const SIMPLE_HEADER: [&str; 2] = ["Unique Normalized Keywords", "Consolidated Search Volume"];

/// Parses keyword rows from an export: header first, keyword in column 1 and
/// search volume in column 2. Short rows, blank keywords and volumes that are
/// not non-negative integers are skipped.
pub fn parse_rows(text: &str) -> Result<Vec<KeywordRow>> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record?;
        let (Some(keyword), Some(volume)) = (record.get(1), record.get(2)) else {
            skipped += 1;
            continue;
        };
        let keyword = keyword.trim();
        match volume.trim().parse::<u64>() {
            Ok(search_volume) if !keyword.is_empty() => rows.push(KeywordRow::new(keyword, search_volume)),
            _ => skipped += 1,
        }
    }
    debug!("Keyword rows parsed - kept={}, skipped={}", rows.len(), skipped);
    Ok(rows)
}

/// Reads an export from disk. Bytes that are not valid UTF-8 are replaced
/// with U+FFFD and reported once.
pub fn read_rows(path: &Path) -> Result<Vec<KeywordRow>> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    if let Cow::Owned(ref decoded) = text {
        let replaced = decoded.chars().filter(|&c| c == char::REPLACEMENT_CHARACTER).count();
        warn!(
            "Input is not valid UTF-8, invalid bytes replaced - path={}, replacements={}",
            path.display(),
            replaced
        );
    }
    parse_rows(&text)
}

/// Renders a ratio the way the root report has always shown it: shortest
/// round-trip digits, whole numbers without a fraction, and exponent form with
/// a two-digit exponent below 1e-4.
pub fn render_ratio(ratio: f64) -> String {
    if ratio != 0.0 && ratio.abs() < 1e-4 {
        let formatted = format!("{ratio:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => formatted,
        };
    }
    format!("{ratio}")
}

/// Builds the output records for `roots` in the layout of `mode`.
pub fn output_records(roots: &[Root], mode: Mode) -> Vec<Vec<String>> {
    match mode {
        Mode::Full => {
            let mut records = vec![FULL_HEADER.iter().map(|s| s.to_string()).collect()];
            records.extend(roots.iter().map(|root| {
                vec![
                    String::new(),
                    root.normalized_term.clone(),
                    root.frequency.to_string(),
                    root.search_volume.to_string(),
                    render_ratio(root.relative_volume.unwrap_or(0.0)),
                ]
            }));
            records
        }
        Mode::Simple => {
            let mut records = vec![SIMPLE_HEADER.iter().map(|s| s.to_string()).collect()];
            records.extend(
                roots
                    .iter()
                    .map(|root| vec![root.normalized_term.clone(), root.search_volume.to_string()]),
            );
            records
        }
    }
}

/// Writes a BOM followed by fully quoted, CRLF-terminated records.
pub fn write_output<W: Write>(mut writer: W, roots: &[Root], mode: Mode) -> Result<()> {
    if roots.is_empty() {
        return Err(RootError::InvalidInput(NO_TERMS));
    }
    writer.write_all(UTF8_BOM.as_bytes())?;

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    for record in output_records(roots, mode) {
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_output_file(path: &Path, roots: &[Root], mode: Mode) -> Result<()> {
    let file = File::create(path)?;
    write_output(BufWriter::new(file), roots, mode)
}
