//! Per-operation diagnostics: the file log and file attributes.
//!
//! Each codec owns one [`FileLog`] and one [`FileAttributes`] map. Both are
//! reset at the start of every load or save, so after a call they describe
//! that call only.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::CodecError;

#[cfg(feature = "colorized_output")]
use console::style;

/// Attribute key for the path of the last loaded or saved file
pub const ATTR_PATH: &str = "path";

/// Attribute key for the format version token
pub const ATTR_VERSION: &str = "versionNumber";

/// Attribute key for the recorded byte order (`lsbf` or `msbf`)
pub const ATTR_BYTE_ORDER: &str = "byteOrder";

/// Attribute key for the numeric representation (`float` or `double`)
pub const ATTR_NUMBER_FORMAT: &str = "numberFormat";

/// Attribute key for the number of events loaded or saved
pub const ATTR_NUMBER_OF_EVENTS: &str = "numberOfEvents";

/// Attribute key for the number of events recorded in the file
pub const ATTR_NUMBER_OF_EVENTS_IN_FILE: &str = "numberOfEventsInFile";

/// Attribute key for the number of parameters
pub const ATTR_NUMBER_OF_PARAMETERS: &str = "numberOfParameters";

/// Attribute key for a parameter map's name
pub const ATTR_NAME: &str = "name";

/// Attribute key for a parameter map's description
pub const ATTR_DESCRIPTION: &str = "description";

/// Attribute key for the software that created a parameter map
pub const ATTR_CREATOR_SOFTWARE_NAME: &str = "creatorSoftwareName";

/// Category of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// The operation was aborted
    Error,
    /// A non-fatal anomaly
    Warning,
}

impl LogCategory {
    /// Lower-case name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Error => "error",
            LogCategory::Warning => "warning",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One categorized message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Error or warning
    pub category: LogCategory,
    /// Human-readable detail
    pub message: String,
}

/// Ordered list of messages accumulated during one load or save
#[derive(Debug, Clone, Default)]
pub struct FileLog {
    entries: Vec<LogEntry>,
}

impl FileLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append an error entry (mirrored to the `log` facade)
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.entries.push(LogEntry {
            category: LogCategory::Error,
            message,
        });
    }

    /// Append a warning entry (mirrored to the `log` facade)
    pub fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.entries.push(LogEntry {
            category: LogCategory::Warning,
            message,
        });
    }

    /// Record the detail of a fatal condition and hand back its summary error
    pub(crate) fn fail(&mut self, error: CodecError, detail: impl Into<String>) -> CodecError {
        self.error(detail);
        error
    }

    /// All entries in the order they were added
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any entry is an error
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.category == LogCategory::Error)
    }

    /// True if any entry is a warning
    pub fn has_warnings(&self) -> bool {
        self.entries.iter().any(|e| e.category == LogCategory::Warning)
    }

    /// Count the error entries
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.category == LogCategory::Error)
            .count()
    }

    /// Count the warning entries
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.category == LogCategory::Warning)
            .count()
    }

    /// Format the log with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            for entry in &self.entries {
                let label = match entry.category {
                    LogCategory::Error => style("ERROR").red().bold(),
                    LogCategory::Warning => style("WARNING").yellow().bold(),
                };
                output.push_str(&format!("{}: {}\n", label, entry.message));
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for FileLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            let label = match entry.category {
                LogCategory::Error => "ERROR",
                LogCategory::Warning => "WARNING",
            };
            writeln!(f, "{}: {}", label, entry.message)?;
        }
        Ok(())
    }
}

/// String-keyed description of the most recently loaded or saved file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAttributes {
    values: BTreeMap<String, String>,
}

impl FileAttributes {
    /// Create an empty attribute map
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all attributes
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Set an attribute, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up an attribute
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// True if the attribute is present
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over attributes sorted by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no attributes
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
