//! Genes × cells expression matrix.
//!
//! The first column of the file is the gene index; every other column is one
//! cell. Missing values are held as `NaN` and written back out as empty cells.

use std::collections::HashSet;
use std::path::Path;

use cernet_common::{CernetError, Result};
use cernet_ingestion::io::{fit_rows, read_raw, write_atomic, RawTable};
use tracing::{debug, info};

/// A dense expression matrix with unique gene keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMatrix {
    index_name: String,
    cells: Vec<String>,
    genes: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl ExpressionMatrix {
    /// Build a matrix from parts. Every row must have one value per cell and
    /// gene keys must be unique.
    pub fn new(
        index_name: impl Into<String>,
        cells: Vec<String>,
        rows: Vec<(String, Vec<f64>)>,
    ) -> Result<Self> {
        let mut seen = HashSet::with_capacity(rows.len());
        let mut genes = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());
        for (gene, row) in rows {
            if row.len() != cells.len() {
                return Err(CernetError::InvalidData(format!(
                    "gene '{gene}' has {} values for {} cells",
                    row.len(),
                    cells.len()
                )));
            }
            if !seen.insert(gene.clone()) {
                return Err(CernetError::InvalidData(format!("duplicate gene '{gene}'")));
            }
            genes.push(gene);
            values.push(row);
        }
        Ok(Self { index_name: index_name.into(), cells, genes, values })
    }

    /// Read a matrix, trying tab first and falling back to comma when the
    /// tab-split header is a single comma-bearing field.
    ///
    /// A header one field shorter than the first data row (as R's
    /// `write.table` produces) names the cells only; the index name is then
    /// empty.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut table = read_raw(path, b'\t')?;
        if table.headers.len() == 1 && table.headers[0].contains(',') {
            debug!(path = %path.display(), "Header is not tab-delimited; re-reading as CSV");
            table = read_raw(path, b',')?;
        }
        if table.rows.first().is_some_and(|row| row.len() == table.headers.len() + 1) {
            debug!(path = %path.display(), "Header has no index column; using an empty index name");
            table.headers.insert(0, String::new());
        }
        fit_rows(path, &mut table.rows, table.headers.len())?;

        let matrix = Self::from_raw(path, table)?;
        info!(
            path = %path.display(),
            n_genes = matrix.n_genes(),
            n_cells = matrix.n_cells(),
            "Loaded expression matrix"
        );
        Ok(matrix)
    }

    fn from_raw(path: &Path, table: RawTable) -> Result<Self> {
        let RawTable { mut headers, rows } = table;
        let index_name = headers.remove(0);
        let cells = headers;

        let mut seen = HashSet::with_capacity(rows.len());
        let mut genes = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());
        for (row_no, mut row) in rows.into_iter().enumerate() {
            let Some(gene) = row[0].take() else {
                return Err(CernetError::parse(path, format!("row {row_no}: missing gene identifier")));
            };
            if !seen.insert(gene.clone()) {
                return Err(CernetError::parse(path, format!("row {row_no}: duplicate gene '{gene}'")));
            }
            let mut parsed = Vec::with_capacity(cells.len());
            for (col, cell) in row[1..].iter().enumerate() {
                let value = match cell.as_deref() {
                    None => f64::NAN,
                    Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
                        CernetError::parse(
                            path,
                            format!("row {row_no}: value '{raw}' for cell '{}' is not numeric", cells[col]),
                        )
                    })?,
                };
                parsed.push(value);
            }
            genes.push(gene);
            values.push(parsed);
        }

        Ok(Self { index_name, cells, genes, values })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn row(&self, gene: &str) -> Option<&[f64]> {
        self.genes.iter().position(|g| g == gene).map(|i| self.values[i].as_slice())
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.genes.iter().map(String::as_str).zip(self.values.iter().map(Vec::as_slice))
    }

    /// Keep the rows matching `keep`, preserving order. Returns the number removed.
    pub fn retain_rows<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str, &[f64]) -> bool,
    {
        let before = self.genes.len();
        let (genes, values): (Vec<_>, Vec<_>) = std::mem::take(&mut self.genes)
            .into_iter()
            .zip(std::mem::take(&mut self.values))
            .filter(|(g, v)| keep(g.as_str(), v.as_slice()))
            .unzip();
        self.genes = genes;
        self.values = values;
        before - self.genes.len()
    }

    /// Write tab-delimited with the index column first. Parent directories
    /// are created.
    pub fn write_tsv(&self, path: &Path) -> Result<()> {
        write_atomic(path, |out| {
            let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);
            let mut header = Vec::with_capacity(self.cells.len() + 1);
            header.push(self.index_name.as_str());
            header.extend(self.cells.iter().map(String::as_str));
            writer.write_record(&header)?;

            for (gene, row) in self.rows() {
                let mut record = Vec::with_capacity(row.len() + 1);
                record.push(gene.to_string());
                record.extend(row.iter().map(|v| if v.is_nan() { String::new() } else { v.to_string() }));
                writer.write_record(&record)?;
            }
            writer.flush()?;
            Ok(())
        })?;
        info!(path = %path.display(), n_genes = self.n_genes(), "Expression matrix saved");
        Ok(())
    }
}
