//! # JSON Parameter-Map Codec
//!
//! Reads and writes parameter maps as JSON documents:
//!
//! ```json
//! {
//!    "version": "FlowGateJsonParameterMap_1.0",
//!    "name": "T cell panel",
//!    "parameters": [
//!       {
//!          "name": "FL1-A",
//!          "longName": "CD3 FITC",
//!          "visibleForGating": 1,
//!          "defaultTransform": {
//!             "transformType": "Logicle",
//!             "t": 262144.0, "a": 0.0, "m": 4.5, "w": 0.5
//!          }
//!       }
//!    ]
//! }
//! ```
//!
//! Loading replaces the contents of the codec's map in place, so a caller
//! that shared the map with the codec sees the loaded entries.
//!
//! ## Example
//!
//! ```rust
//! use flowgate::json::JsonParameterMapCodec;
//!
//! let text = r#"{"version": "FlowGateJsonParameterMap_1.0",
//!                "parameters": [{"name": "FSC-A", "visibleForGating": 0}]}"#;
//! let mut codec = JsonParameterMapCodec::new();
//! let map = codec.load_from_text(text)?;
//! assert!(!map.borrow().find_visible_for_gating("FSC-A"));
//! # Ok::<(), flowgate::error::CodecError>(())
//! ```

mod reader;
mod writer;


use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::rc::Rc;

use log::info;
use tempfile::NamedTempFile;

use crate::diagnostics::{
    FileAttributes, FileLog, ATTR_CREATOR_SOFTWARE_NAME, ATTR_DESCRIPTION, ATTR_NAME,
    ATTR_NUMBER_OF_PARAMETERS, ATTR_PATH, ATTR_VERSION,
};
use crate::error::CodecError;
use crate::parameter_map::ParameterMap;

use self::reader::MapReader;

/// Version token every document must carry
pub const VERSION_TOKEN: &str = "FlowGateJsonParameterMap_1.0";

/// Leading part of the version token shared by all versions of the format
pub const VERSION_PREFIX: &str = "FlowGateJsonParameterMap_";

/// Indentation used by [`JsonParameterMapCodec::save`]
pub const DEFAULT_JSON_INDENT: usize = 3;

/// File name extensions handled by this codec
pub const FILE_EXTENSIONS: &[&str] = crate::format::PARAMETER_MAP_EXTENSIONS;

/// Parameter map shared between a codec and its caller
pub type SharedParameterMap = Rc<RefCell<ParameterMap>>;

/// Loads and saves JSON parameter maps
#[derive(Debug, Default)]
pub struct JsonParameterMapCodec {
    map: SharedParameterMap,
    file_log: FileLog,
    file_attributes: FileAttributes,
}

impl JsonParameterMapCodec {
    /// Codec holding an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec holding a private deep copy of `map`
    pub fn with_map(map: &ParameterMap) -> Self {
        Self::with_shared_map(Rc::new(RefCell::new(map.clone())))
    }

    /// Codec sharing `map` with the caller
    pub fn with_shared_map(map: SharedParameterMap) -> Self {
        Self {
            map,
            ..Self::default()
        }
    }

    /// Handle to the held map
    pub fn parameter_map(&self) -> SharedParameterMap {
        Rc::clone(&self.map)
    }

    /// Messages from the most recent load or save
    pub fn file_log(&self) -> &FileLog {
        &self.file_log
    }

    /// Description of the most recently loaded or saved file
    pub fn file_attributes(&self) -> &FileAttributes {
        &self.file_attributes
    }

    fn reset(&mut self) {
        self.file_log.clear();
        self.file_attributes.clear();
    }

    /// Load a document from a file, replacing every entry in the held map
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<SharedParameterMap, CodecError> {
        let path = path.as_ref();
        self.reset();
        self.file_attributes
            .insert(ATTR_PATH, path.display().to_string());

        let mut file = File::open(path).map_err(|e| {
            let detail = format!("Cannot open \"{}\" for reading: {}", path.display(), e);
            self.file_log.fail(CodecError::from_open_error(path, e), detail)
        })?;
        let text = self.read_text(&mut file, &path.display().to_string())?;

        let mut map = MapReader::new(&mut self.file_log, &mut self.file_attributes).read(&text)?;
        if let Some(file_name) = path.file_name() {
            map.set_file_name(file_name.to_string_lossy());
        }
        let count = map.number_of_parameters();
        self.install(map)?;
        info!("Loaded {} parameters from {}", count, path.display());
        Ok(self.parameter_map())
    }

    /// Load a document from a string
    pub fn load_from_text(&mut self, text: &str) -> Result<SharedParameterMap, CodecError> {
        self.reset();
        let map = MapReader::new(&mut self.file_log, &mut self.file_attributes).read(text)?;
        self.install(map)?;
        Ok(self.parameter_map())
    }

    /// Load a document from any reader
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<SharedParameterMap, CodecError> {
        self.reset();
        let text = self.read_text(reader, "stream")?;
        let map = MapReader::new(&mut self.file_log, &mut self.file_attributes).read(&text)?;
        self.install(map)?;
        Ok(self.parameter_map())
    }

    fn read_text<R: Read>(&mut self, reader: &mut R, source: &str) -> Result<String, CodecError> {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(|e| {
            if e.kind() == io::ErrorKind::InvalidData {
                self.file_log.fail(
                    CodecError::Malformed("not UTF-8 text".to_string()),
                    format!("{} is not valid UTF-8 text", source),
                )
            } else {
                self.file_log.fail(
                    CodecError::Truncated("read failed".to_string()),
                    format!("Read error in {}: {}", source, e),
                )
            }
        })?;
        Ok(text)
    }

    fn install(&mut self, map: ParameterMap) -> Result<(), CodecError> {
        let mut held = self.map.try_borrow_mut().map_err(|_| {
            self.file_log.fail(
                CodecError::InvalidArgument("parameter map is in use".to_string()),
                "The parameter map is borrowed elsewhere; loaded entries were discarded",
            )
        })?;
        *held = map;
        Ok(())
    }

    /// Save the held map with [`DEFAULT_JSON_INDENT`]
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CodecError> {
        self.save_with_indent(path, DEFAULT_JSON_INDENT)
    }

    /// Save the held map with `indent` spaces per level (0 for a single line).
    ///
    /// The document is written to a temporary sibling and moved into place
    /// only after every byte was written.
    pub fn save_with_indent<P: AsRef<Path>>(
        &mut self,
        path: P,
        indent: usize,
    ) -> Result<(), CodecError> {
        let path = path.as_ref();
        self.reset();
        self.file_attributes
            .insert(ATTR_PATH, path.display().to_string());

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(directory).map_err(|e| {
            let detail = format!("Cannot create \"{}\" for writing: {}", path.display(), e);
            self.file_log.fail(CodecError::from_open_error(path, e), detail)
        })?;

        let target = path.display().to_string();
        {
            let mut writer = BufWriter::new(&mut temp);
            self.encode(&mut writer, indent, &target)?;
            writer
                .flush()
                .map_err(|e| self.write_failure(&target, e.to_string()))?;
        }
        temp.persist(path)
            .map_err(|e| self.write_failure(&target, e.error.to_string()))?;

        info!(
            "Saved {} parameters to {}",
            self.map.borrow().number_of_parameters(),
            path.display()
        );
        Ok(())
    }

    /// Render the held map as a document; `indent` 0 gives a single line
    pub fn save_to_text(&mut self, indent: usize) -> Result<String, CodecError> {
        self.reset();
        let mut buffer = Vec::new();
        self.encode(&mut buffer, indent, "text")?;
        String::from_utf8(buffer).map_err(|e| self.write_failure("text", e.to_string()))
    }

    /// Write the held map to any writer
    pub fn write_to<W: Write>(&mut self, writer: &mut W, indent: usize) -> Result<(), CodecError> {
        self.reset();
        self.encode(&mut *writer, indent, "stream")?;
        writer
            .flush()
            .map_err(|e| self.write_failure("stream", e.to_string()))
    }

    fn encode<W: Write>(
        &mut self,
        writer: W,
        indent: usize,
        target: &str,
    ) -> Result<(), CodecError> {
        let shared = Rc::clone(&self.map);
        let map = shared.try_borrow().map_err(|_| {
            self.file_log.fail(
                CodecError::InvalidArgument("parameter map is in use".to_string()),
                "The parameter map is mutably borrowed elsewhere during save",
            )
        })?;

        if let Some((name, argument, value)) = writer::non_finite_argument(&map) {
            return Err(self.file_log.fail(
                CodecError::InvalidArgument("transform argument is not finite".to_string()),
                format!(
                    "Parameter \"{}\" has a non-finite default transform argument {} = {}",
                    name, argument, value
                ),
            ));
        }
        for name in writer::unwritable_transforms(&map) {
            self.file_log.warning(format!(
                "Parameter \"{}\" has an unrecognized transform type; it is saved without a default transform",
                name
            ));
        }
        writer::write_document(writer, &map, indent)
            .map_err(|e| self.write_failure(target, e.to_string()))?;

        let attributes = &mut self.file_attributes;
        attributes.insert(ATTR_VERSION, VERSION_TOKEN);
        attributes.insert(
            ATTR_NUMBER_OF_PARAMETERS,
            map.number_of_parameters().to_string(),
        );
        for (key, value) in [
            (ATTR_NAME, map.name()),
            (ATTR_DESCRIPTION, map.description()),
            (ATTR_CREATOR_SOFTWARE_NAME, map.creator_software_name()),
        ] {
            if !value.is_empty() {
                attributes.insert(key, value);
            }
        }
        Ok(())
    }

    fn write_failure(&mut self, target: &str, detail: String) -> CodecError {
        self.file_log.fail(
            CodecError::Write("cannot write parameter map".to_string()),
            format!("Cannot write the parameter map to {}: {}", target, detail),
        )
    }
}
