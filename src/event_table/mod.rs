//! # Event Table
//!
//! Column-major storage of per-event measurements. Every column holds the
//! same number of events and every value in a table shares one numeric
//! representation ([`NumberFormat::Float`] or [`NumberFormat::Double`]).
//!
//! Each column is described by a [`ParameterInfo`]: a unique short name, an
//! optional long name, the minimum/maximum declared by the instrument or file
//! ("specified" range) and the minimum/maximum computed from the loaded values
//! ("data" range).
//!
//! ## Example
//!
//! ```rust
//! use flowgate::event_table::{EventTable, NumberFormat};
//!
//! let mut table = EventTable::new(NumberFormat::Float, &["FSC-A", "SSC-A"], 3)?;
//! table.float_column_mut(0).unwrap().copy_from_slice(&[1.0, 2.0, 3.0]);
//! table.compute_data_ranges();
//! assert_eq!(table.parameter(0).unwrap().data_maximum, Some(3.0));
//! # Ok::<(), flowgate::event_table::EventTableError>(())
//! ```

mod error;

#[cfg(test)]
mod tests;

pub use error::EventTableError;

use std::collections::HashSet;
use std::fmt;

/// Numeric representation shared by every value in a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// 32-bit IEEE 754
    #[default]
    Float,
    /// 64-bit IEEE 754
    Double,
}

impl NumberFormat {
    /// Name used in binary headers
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberFormat::Float => "float",
            NumberFormat::Double => "double",
        }
    }

    /// Parse a header name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "float" => Some(NumberFormat::Float),
            "double" => Some(NumberFormat::Double),
            _ => None,
        }
    }

    /// Get the byte size per value
    pub fn byte_size(&self) -> usize {
        match self {
            NumberFormat::Float => 4,
            NumberFormat::Double => 8,
        }
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-column description
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    /// Unique, non-empty identifier
    pub short_name: String,
    /// Descriptive label, may be empty
    pub long_name: String,
    /// Minimum declared by the source
    pub specified_minimum: f64,
    /// Maximum declared by the source
    pub specified_maximum: f64,
    /// Minimum of the loaded values
    pub data_minimum: Option<f64>,
    /// Maximum of the loaded values
    pub data_maximum: Option<f64>,
}

impl ParameterInfo {
    fn new(short_name: String) -> Self {
        Self {
            short_name,
            long_name: String::new(),
            specified_minimum: 0.0,
            specified_maximum: 0.0,
            data_minimum: None,
            data_maximum: None,
        }
    }
}

/// Column storage; one variant per numeric representation
#[derive(Debug, Clone, PartialEq)]
enum Columns {
    Float(Vec<Vec<f32>>),
    Double(Vec<Vec<f64>>),
}

/// Column-major table of events
#[derive(Debug, Clone, PartialEq)]
pub struct EventTable {
    parameters: Vec<ParameterInfo>,
    columns: Columns,
    number_of_events: usize,
}

fn check_names<S: AsRef<str>>(names: &[S]) -> Result<(), EventTableError> {
    let mut seen = HashSet::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(EventTableError::EmptyShortName(index));
        }
        if !seen.insert(name) {
            return Err(EventTableError::DuplicateShortName(name.to_string()));
        }
    }
    Ok(())
}

impl EventTable {
    /// Create a zero-filled table
    pub fn new<S: AsRef<str>>(
        format: NumberFormat,
        short_names: &[S],
        number_of_events: usize,
    ) -> Result<Self, EventTableError> {
        check_names(short_names)?;
        let n = short_names.len();
        let columns = match format {
            NumberFormat::Float => Columns::Float(vec![vec![0.0; number_of_events]; n]),
            NumberFormat::Double => Columns::Double(vec![vec![0.0; number_of_events]; n]),
        };
        Ok(Self {
            parameters: short_names
                .iter()
                .map(|s| ParameterInfo::new(s.as_ref().to_string()))
                .collect(),
            columns,
            number_of_events,
        })
    }

    /// Build a single-precision table from existing columns
    pub fn from_float_columns<S: AsRef<str>>(
        short_names: &[S],
        columns: Vec<Vec<f32>>,
    ) -> Result<Self, EventTableError> {
        let number_of_events = Self::check_columns(short_names, columns.iter().map(Vec::len))?;
        Ok(Self {
            parameters: short_names
                .iter()
                .map(|s| ParameterInfo::new(s.as_ref().to_string()))
                .collect(),
            columns: Columns::Float(columns),
            number_of_events,
        })
    }

    /// Build a double-precision table from existing columns
    pub fn from_double_columns<S: AsRef<str>>(
        short_names: &[S],
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, EventTableError> {
        let number_of_events = Self::check_columns(short_names, columns.iter().map(Vec::len))?;
        Ok(Self {
            parameters: short_names
                .iter()
                .map(|s| ParameterInfo::new(s.as_ref().to_string()))
                .collect(),
            columns: Columns::Double(columns),
            number_of_events,
        })
    }

    fn check_columns<S: AsRef<str>>(
        short_names: &[S],
        lengths: impl ExactSizeIterator<Item = usize>,
    ) -> Result<usize, EventTableError> {
        check_names(short_names)?;
        if lengths.len() != short_names.len() {
            return Err(EventTableError::ColumnCountMismatch {
                parameters: short_names.len(),
                columns: lengths.len(),
            });
        }
        let mut number_of_events = None;
        for (index, len) in lengths.enumerate() {
            match number_of_events {
                None => number_of_events = Some(len),
                Some(expected) if expected != len => {
                    return Err(EventTableError::ColumnLengthMismatch {
                        parameter: short_names[index].as_ref().to_string(),
                        expected,
                        actual: len,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(number_of_events.unwrap_or(0))
    }

    /// Numeric representation of every value
    pub fn number_format(&self) -> NumberFormat {
        match self.columns {
            Columns::Float(_) => NumberFormat::Float,
            Columns::Double(_) => NumberFormat::Double,
        }
    }

    /// Rows per column
    pub fn number_of_events(&self) -> usize {
        self.number_of_events
    }

    /// Number of columns
    pub fn number_of_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Column descriptions in column order
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    /// Description of one column
    pub fn parameter(&self, index: usize) -> Option<&ParameterInfo> {
        self.parameters.get(index)
    }

    /// Short names in column order
    pub fn short_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.short_name.as_str())
    }

    /// Column index of a short name
    pub fn parameter_index(&self, short_name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.short_name == short_name)
    }

    /// Set a column's long name
    pub fn set_long_name(
        &mut self,
        index: usize,
        long_name: impl Into<String>,
    ) -> Result<(), EventTableError> {
        self.parameter_mut(index)?.long_name = long_name.into();
        Ok(())
    }

    /// Set a column's specified minimum and maximum
    pub fn set_specified_range(
        &mut self,
        index: usize,
        minimum: f64,
        maximum: f64,
    ) -> Result<(), EventTableError> {
        let parameter = self.parameter_mut(index)?;
        parameter.specified_minimum = minimum;
        parameter.specified_maximum = maximum;
        Ok(())
    }

    fn parameter_mut(&mut self, index: usize) -> Result<&mut ParameterInfo, EventTableError> {
        let count = self.parameters.len();
        self.parameters
            .get_mut(index)
            .ok_or(EventTableError::IndexOutOfRange { index, count })
    }

    /// Single-precision column, or `None` for a double table or bad index
    pub fn float_column(&self, index: usize) -> Option<&[f32]> {
        match &self.columns {
            Columns::Float(c) => c.get(index).map(Vec::as_slice),
            Columns::Double(_) => None,
        }
    }

    /// Mutable single-precision column
    pub fn float_column_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        match &mut self.columns {
            Columns::Float(c) => c.get_mut(index).map(Vec::as_mut_slice),
            Columns::Double(_) => None,
        }
    }

    /// Double-precision column, or `None` for a float table or bad index
    pub fn double_column(&self, index: usize) -> Option<&[f64]> {
        match &self.columns {
            Columns::Double(c) => c.get(index).map(Vec::as_slice),
            Columns::Float(_) => None,
        }
    }

    /// Mutable double-precision column
    pub fn double_column_mut(&mut self, index: usize) -> Option<&mut [f64]> {
        match &mut self.columns {
            Columns::Double(c) => c.get_mut(index).map(Vec::as_mut_slice),
            Columns::Float(_) => None,
        }
    }

    /// One value widened to f64
    pub fn value(&self, parameter: usize, event: usize) -> Option<f64> {
        match &self.columns {
            Columns::Float(c) => c.get(parameter)?.get(event).map(|&v| v as f64),
            Columns::Double(c) => c.get(parameter)?.get(event).copied(),
        }
    }

    /// A column widened to f64
    pub fn column_as_f64(&self, parameter: usize) -> Option<Vec<f64>> {
        match &self.columns {
            Columns::Float(c) => c.get(parameter).map(|v| v.iter().map(|&x| x as f64).collect()),
            Columns::Double(c) => c.get(parameter).cloned(),
        }
    }

    /// Recompute every column's data minimum and maximum, ignoring NaN.
    /// Columns with no finite-or-infinite values get `None`.
    pub fn compute_data_ranges(&mut self) {
        for index in 0..self.parameters.len() {
            let range = match &self.columns {
                Columns::Float(c) => min_max(c[index].iter().map(|&v| v as f64)),
                Columns::Double(c) => min_max(c[index].iter().copied()),
            };
            let parameter = &mut self.parameters[index];
            parameter.data_minimum = range.map(|r| r.0);
            parameter.data_maximum = range.map(|r| r.1);
        }
    }

    /// Copy of the first `number_of_events` rows (or all rows if fewer)
    pub fn truncated(&self, number_of_events: usize) -> Self {
        let n = number_of_events.min(self.number_of_events);
        let columns = match &self.columns {
            Columns::Float(c) => Columns::Float(c.iter().map(|v| v[..n].to_vec()).collect()),
            Columns::Double(c) => Columns::Double(c.iter().map(|v| v[..n].to_vec()).collect()),
        };
        let mut table = Self {
            parameters: self.parameters.clone(),
            columns,
            number_of_events: n,
        };
        table.compute_data_ranges();
        table
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| !v.is_nan()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
