//! Company ledger and the revenue estimates written into it.
//!
//! A ledger is either a CSV file or an Excel workbook, picked by file
//! extension. It is rewritten as a whole on every checkpoint. Writes go to a
//! temp file in the destination directory and are then renamed over the
//! target, so a crash mid-write never leaves a truncated ledger behind.

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use estimation::{Company, Estimate};
use rust_xlsxwriter::Workbook;
use std::io::{Read, Seek, Write};
use std::path::Path;
use tracing::{debug, info};

pub const DBA_NAME_COLUMN: &str = "DBA NAME";
pub const BUSINESS_NAME_COLUMN: &str = "BUSINESS NAME";
pub const ADDRESS_COLUMN: &str = "ADDRESS";
pub const CITY_COLUMN: &str = "CITY";
pub const REVENUE_COLUMN: &str = "Revenue(millions)";

/// Cell values that spreadsheets export for a missing value.
const MISSING_MARKERS: &[&str] = &["nan", "n/a"];

/// On-disk ledger format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerFormat {
    Csv,
    Xlsx,
}

impl LedgerFormat {
    /// `.xlsx` files are workbooks, everything else is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Self::Xlsx,
            _ => Self::Csv,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    dba_name: usize,
    business_name: Option<usize>,
    address: Option<usize>,
    city: Option<usize>,
    revenue: usize,
}

/// One ledger row, ready for the estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub company: Company,
    pub backup_name: Option<String>,
}

/// Companies to estimate plus the estimates written so far.
#[derive(Debug, Clone)]
pub struct Ledger {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    columns: Columns,
}

impl Ledger {
    /// Load a ledger, reading the format from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let ledger = match LedgerFormat::from_path(path) {
            LedgerFormat::Csv => {
                let file = std::fs::File::open(path)
                    .with_context(|| format!("Failed to open ledger {}", path.display()))?;
                Self::from_reader(file)
            }
            LedgerFormat::Xlsx => Self::from_workbook(path),
        };
        ledger.with_context(|| format!("Failed to parse ledger {}", path.display()))
    }

    /// Parse a CSV ledger.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .context("Failed to read header row")?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.context("Failed to read ledger row")?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Self::from_table(headers, rows)
    }

    /// Parse the first sheet of an Excel workbook.
    pub fn from_workbook(path: &Path) -> Result<Self> {
        let mut workbook: Sheets<_> = open_workbook_auto(path)
            .with_context(|| format!("Failed to open workbook {}", path.display()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| anyhow!("workbook contains no sheets"))?
            .context("Failed to read first sheet")?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
        let headers = rows.next().ok_or_else(|| anyhow!("ledger has no header row"))?;

        Self::from_table(headers, rows.collect())
    }

    /// Locate the known columns, adding the revenue column if it is missing.
    fn from_table(mut headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Result<Self> {
        let revenue = match find_column(&headers, REVENUE_COLUMN) {
            Some(idx) => idx,
            None => {
                headers.push(REVENUE_COLUMN.to_string());
                headers.len() - 1
            }
        };

        let columns = Columns {
            dba_name: find_column(&headers, DBA_NAME_COLUMN)
                .ok_or_else(|| anyhow!("ledger is missing the {} column", DBA_NAME_COLUMN))?,
            business_name: find_column(&headers, BUSINESS_NAME_COLUMN),
            address: find_column(&headers, ADDRESS_COLUMN),
            city: find_column(&headers, CITY_COLUMN),
            revenue,
        };

        for row in &mut rows {
            row.resize(headers.len(), String::new());
        }

        debug!(rows = rows.len(), "Loaded ledger");
        Ok(Self {
            headers,
            rows,
            columns,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows whose revenue cell is filled in, "N/A" included.
    pub fn processed_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| !row[self.columns.revenue].trim().is_empty())
            .count()
    }

    /// Carry estimates over from an earlier output and return the row to resume at.
    ///
    /// A missing or unreadable previous output means starting from row 0.
    pub fn resume_from(&mut self, previous: &Path) -> usize {
        if !previous.exists() {
            return 0;
        }

        let earlier = match Ledger::load(previous) {
            Ok(ledger) => ledger,
            Err(e) => {
                tracing::warn!("Error reading progress from {}: {:#}", previous.display(), e);
                return 0;
            }
        };

        for (row, earlier_row) in self.rows.iter_mut().zip(&earlier.rows) {
            let value = &earlier_row[earlier.columns.revenue];
            if !value.trim().is_empty() {
                row[self.columns.revenue] = value.clone();
            }
        }

        let processed = earlier.processed_count().min(self.rows.len());
        info!(processed, path = %previous.display(), "Carried estimates from previous output");
        processed
    }

    /// The company described by a row.
    pub fn entry(&self, row: usize) -> LedgerEntry {
        let cells = &self.rows[row];
        let cell = |idx: Option<usize>| idx.map(|i| sanitize_cell(&cells[i])).unwrap_or_default();

        let company = Company::new(sanitize_cell(&cells[self.columns.dba_name]))
            .with_address(cell(self.columns.address))
            .with_city(cell(self.columns.city));
        let backup_name = Some(cell(self.columns.business_name)).filter(|name| !name.is_empty());

        LedgerEntry {
            company,
            backup_name,
        }
    }

    pub fn set_estimate(&mut self, row: usize, estimate: Estimate) {
        self.rows[row][self.columns.revenue] = estimate.to_string();
    }

    pub fn revenue(&self, row: usize) -> &str {
        &self.rows[row][self.columns.revenue]
    }

    /// Write as CSV.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write as a single-sheet workbook. Revenue values go in as numbers.
    pub fn write_workbook_to<W: Write + Seek + Send>(&self, writer: W) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string(0, sheet_col(col)?, header)?;
        }

        for (idx, row) in self.rows.iter().enumerate() {
            let sheet_row = u32::try_from(idx + 1).context("ledger has too many rows for a worksheet")?;
            for (col, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let number = (col == self.columns.revenue)
                    .then(|| value.parse::<f64>().ok())
                    .flatten()
                    .filter(|n| n.is_finite());
                match number {
                    Some(n) => worksheet.write_number(sheet_row, sheet_col(col)?, n)?,
                    None => worksheet.write_string(sheet_row, sheet_col(col)?, value)?,
                };
            }
        }

        workbook.save_to_writer(writer)?;
        Ok(())
    }

    /// Write via temp file + rename, in the format the extension names.
    pub fn save_atomic(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let format = LedgerFormat::from_path(path);
        let mut temp = tempfile::Builder::new()
            .prefix(".ledger")
            .suffix(&format!(".{}", format.extension()))
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        match format {
            LedgerFormat::Csv => self.write_to(&mut temp)?,
            LedgerFormat::Xlsx => self.write_workbook_to(&mut temp)?,
        }
        temp.persist(path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

/// Blank out spreadsheet placeholders for missing values.
pub fn sanitize_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if MISSING_MARKERS.contains(&trimmed.to_lowercase().as_str()) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn sheet_col(col: usize) -> Result<u16> {
    u16::try_from(col).context("ledger has too many columns for a worksheet")
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}
