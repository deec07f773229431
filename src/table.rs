//! In-memory table of listing records.
//!
//! Cells read from CSV are kept as text so columns no stage touches are written
//! back exactly as they were read. Numbers only appear as the result of a
//! computation (the quality score).

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{CleanerError, Result};

/// A single cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Text(String),
    Number(f64),
}

impl Value {
    /// Build a cell from a raw CSV field; an empty field is missing
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Value::Missing
        } else {
            Value::Text(field.to_string())
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// The cell as text, the way it is written to CSV
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Value::Missing => Cow::Borrowed(""),
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            Value::Number(n) => Cow::Owned(format_number(*n)),
        }
    }

    /// Numeric interpretation of the cell. Text must parse to a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Missing => None,
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Number(_) => None,
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Whole numbers keep one decimal (`10.0`) so a float column reads as one
fn format_number(n: f64) -> String {
    if n.is_nan() {
        String::new()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

/// Ordered records sharing one header row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from literal rows; every row must match the header width
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let mut table = Self::new(headers);

        for record in reader.records() {
            let record = record?;
            table.rows.push(record.iter().map(Value::from_field).collect());
        }

        Ok(table)
    }

    pub fn to_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|v| v.render().into_owned()))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(CleanerError::Config(format!(
                "row has {} fields but the table has {} columns",
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Position of a column, matched exactly
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like `column_index`, but a missing column is an error attributed to `stage`
    pub fn require_column(&self, stage: &str, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| CleanerError::missing_column(stage, name))
    }

    /// All cells of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Replace every cell of `idx` with `f(cell)`. Stops at the first error and
    /// returns how many cells changed.
    pub fn map_column<F>(&mut self, idx: usize, mut f: F) -> Result<usize>
    where
        F: FnMut(&Value) -> Result<Value>,
    {
        let mut changed = 0;
        for row in &mut self.rows {
            let updated = f(&row[idx])?;
            if updated != row[idx] {
                changed += 1;
                row[idx] = updated;
            }
        }
        Ok(changed)
    }

    /// Replace every cell in the table with `f(cell)`, returning how many changed
    pub fn map_cells<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&Value) -> Option<Value>,
    {
        let mut changed = 0;
        for cell in self.rows.iter_mut().flat_map(|row| row.iter_mut()) {
            if let Some(updated) = f(cell) {
                if updated != *cell {
                    *cell = updated;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Append a new column; it must not already exist
    pub fn push_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if self.has_column(name) {
            return Err(CleanerError::DuplicateColumn(name.to_string()));
        }
        if values.len() != self.rows.len() {
            return Err(CleanerError::Config(format!(
                "column '{}' has {} values but the table has {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Rewrite every header through `f`, returning how many changed
    pub fn rename_headers<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&str) -> String,
    {
        let mut changed = 0;
        for header in &mut self.headers {
            let renamed = f(header);
            if renamed != *header {
                *header = renamed;
                changed += 1;
            }
        }
        changed
    }
}
