// CSV/TSV reading and writing

use std::io::{Read, Write};
use std::path::Path;

use abgleich_core::{CellValue, Matrix};

use crate::ReadError;

pub fn read(path: &Path) -> Result<Matrix, ReadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    log::debug!("{}: delimiter {:?}", path.display(), delimiter as char);
    read_from_str(&content, delimiter)
}

pub fn read_with_delimiter(path: &Path, delimiter: u8) -> Result<Matrix, ReadError> {
    let content = read_file_as_utf8(path)?;
    read_from_str(&content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample: Vec<&str> = content.lines().take(10).collect();

    let mut best = b',';
    let mut best_score = 0usize;

    for &delim in candidates {
        let counts: Vec<usize> = sample.iter().map(|line| field_count(line, delim)).collect();

        let target = match counts.first() {
            Some(&n) if n > 1 => n,
            _ => continue,
        };

        // More columns break ties between equally consistent candidates
        let score = counts.iter().filter(|&&c| c == target).count() * target;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map(|r| r.len())
        .unwrap_or(1)
}

/// Read file and convert to UTF-8 if needed (Excel exports are often Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, ReadError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| ReadError::Io(format!("{}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            log::debug!("{}: not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
            decoded.into_owned()
        }
    };
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

pub fn read_from_str(content: &str, delimiter: u8) -> Result<Matrix, ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut matrix = Matrix::new();
    for record in reader.records() {
        let record = record?;
        matrix.push(record.iter().map(CellValue::from).collect());
    }
    Ok(matrix)
}

/// Write a matrix as comma-separated text. Rows may differ in width.
pub fn write_matrix<W: Write>(matrix: &[Vec<CellValue>], writer: W) -> Result<(), ReadError> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for row in matrix {
        writer.write_record(row.iter().map(|c| c.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_matrix_file(matrix: &[Vec<CellValue>], path: &Path) -> Result<(), ReadError> {
    let file = std::fs::File::create(path)
        .map_err(|e| ReadError::Io(format!("cannot create {}: {e}", path.display())))?;
    write_matrix(matrix, std::io::BufWriter::new(file))
}
