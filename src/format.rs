//! File format selection by extension.

use std::fmt;
use std::path::Path;

/// Extensions recognized for binary event files
pub const BINARY_EVENTS_EXTENSIONS: &[&str] = &["fgb"];

/// Extensions recognized for JSON parameter-map files
pub const PARAMETER_MAP_EXTENSIONS: &[&str] = &["json", "map"];

/// The file formats handled by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Binary columnar event table (`.fgb`)
    BinaryEvents,
    /// JSON parameter map (`.json`, `.map`)
    ParameterMap,
}

impl FileFormat {
    /// All supported formats
    pub const ALL: [FileFormat; 2] = [FileFormat::BinaryEvents, FileFormat::ParameterMap];

    /// File extensions recognized for this format, without the leading dot
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileFormat::BinaryEvents => BINARY_EVENTS_EXTENSIONS,
            FileFormat::ParameterMap => PARAMETER_MAP_EXTENSIONS,
        }
    }

    /// Match an extension (case-insensitive, with or without a leading dot)
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.');
        Self::ALL.into_iter().find(|format| {
            format
                .extensions()
                .iter()
                .any(|e| e.eq_ignore_ascii_case(extension))
        })
    }

    /// Select a format from a path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// True if the path carries one of this format's extensions
    pub fn matches_path<P: AsRef<Path>>(&self, path: P) -> bool {
        Self::from_path(path) == Some(*self)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::BinaryEvents => f.write_str("FlowGate binary events"),
            FileFormat::ParameterMap => f.write_str("FlowGate JSON parameter map"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(FileFormat::from_path("run1.fgb"), Some(FileFormat::BinaryEvents));
        assert_eq!(FileFormat::from_path("RUN1.FGB"), Some(FileFormat::BinaryEvents));
        assert_eq!(FileFormat::from_path("panel.json"), Some(FileFormat::ParameterMap));
        assert_eq!(FileFormat::from_path("/data/panel.map"), Some(FileFormat::ParameterMap));
        assert_eq!(FileFormat::from_path("sample.fcs"), None);
        assert_eq!(FileFormat::from_path("noextension"), None);
    }

    #[test]
    fn test_from_extension_with_dot() {
        assert_eq!(FileFormat::from_extension(".Map"), Some(FileFormat::ParameterMap));
        assert!(FileFormat::BinaryEvents.matches_path("a/b/c.fgb"));
        assert!(!FileFormat::BinaryEvents.matches_path("a/b/c.json"));
    }
}
