use crate::cell::CellValue;

/// Row-major cell matrix, row 0 = header. The shape a spreadsheet reader produces.
pub type Matrix = Vec<Vec<CellValue>>;

/// A tabular dataset: a header row plus data rows.
///
/// Rows may be ragged; a cell past the end of its row reads as `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    header: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

static EMPTY: CellValue = CellValue::Empty;

impl Dataset {
    pub fn new(header: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { header, rows }
    }

    /// Split a matrix into header + data rows. Returns `None` for an empty matrix.
    pub fn from_matrix(matrix: Matrix) -> Option<Self> {
        let mut iter = matrix.into_iter();
        let header = iter.next()?.iter().map(|c| c.to_string()).collect();
        Some(Self {
            header,
            rows: iter.collect(),
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Reassemble the header + rows into a matrix.
    pub fn into_matrix(self) -> Matrix {
        let mut matrix = Vec::with_capacity(self.rows.len() + 1);
        matrix.push(self.header.into_iter().map(CellValue::from).collect());
        matrix.extend(self.rows);
        matrix
    }
}
