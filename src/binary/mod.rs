//! # Binary Event Codec
//!
//! Reads and writes `.fgb` files: a fixed-width ASCII header followed by one
//! contiguous binary column per parameter.
//!
//! ```text
//! +--------------------------------------------+
//! | "FlowGateBinaryEvents_1.0.0"   (40 bytes)  |
//! | byte order | number format | events | N     |  4 x 20 bytes
//! | short names, long names (length + bytes)   |
//! | specified minimums, specified maximums     |  N x 20 bytes each
//! +--------------------------------------------+
//! | column 0 | column 1 | ... | column N-1     |  events x 4 or 8 bytes each
//! +--------------------------------------------+
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use flowgate::binary::BinaryEventCodec;
//!
//! let mut codec = BinaryEventCodec::new();
//! match codec.load("cells.fgb", Some(10_000)) {
//!     Ok(table) => println!("{} events", table.borrow().number_of_events()),
//!     Err(e) => eprintln!("{}\n{}", e, codec.file_log()),
//! }
//! ```

mod columns;
mod config;
mod header;


pub use config::{BinaryCodecConfig, ByteOrder};
pub use header::{FIELD_WIDTH, VERSION_FIELD_WIDTH, VERSION_TOKEN};

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::rc::Rc;

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::diagnostics::{
    FileAttributes, FileLog, ATTR_BYTE_ORDER, ATTR_NUMBER_FORMAT, ATTR_NUMBER_OF_EVENTS,
    ATTR_NUMBER_OF_EVENTS_IN_FILE, ATTR_NUMBER_OF_PARAMETERS, ATTR_PATH, ATTR_VERSION,
};
use crate::error::CodecError;
use crate::event_table::EventTable;

use self::columns::ColumnLayout;
use self::header::{Header, HeaderReader};

/// File name extensions handled by this codec
pub const FILE_EXTENSIONS: &[&str] = crate::format::BINARY_EVENTS_EXTENSIONS;

/// Event table shared between a codec and its caller
pub type SharedEventTable = Rc<RefCell<EventTable>>;

/// Loads and saves binary event files
#[derive(Debug, Default)]
pub struct BinaryEventCodec {
    config: BinaryCodecConfig,
    table: Option<SharedEventTable>,
    file_log: FileLog,
    file_attributes: FileAttributes,
}

impl BinaryEventCodec {
    /// Codec with no table, ready to load
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec with custom configuration
    pub fn with_config(config: BinaryCodecConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Codec holding a private deep copy of `table`, ready to save
    pub fn with_table(table: &EventTable) -> Self {
        Self::with_shared_table(Rc::new(RefCell::new(table.clone())))
    }

    /// Codec sharing `table` with the caller; later mutations are visible to both
    pub fn with_shared_table(table: SharedEventTable) -> Self {
        Self {
            table: Some(table),
            ..Self::default()
        }
    }

    /// Current configuration
    pub fn config(&self) -> &BinaryCodecConfig {
        &self.config
    }

    /// Replace the configuration
    pub fn set_config(&mut self, config: BinaryCodecConfig) {
        self.config = config;
    }

    /// Messages from the most recent load or save
    pub fn file_log(&self) -> &FileLog {
        &self.file_log
    }

    /// Description of the most recently loaded or saved file
    pub fn file_attributes(&self) -> &FileAttributes {
        &self.file_attributes
    }

    /// Handle to the held event table, if any
    pub fn event_table(&self) -> Option<SharedEventTable> {
        self.table.clone()
    }

    /// Replace the held event table
    pub fn set_event_table(&mut self, table: SharedEventTable) {
        self.table = Some(table);
    }

    fn reset(&mut self) {
        self.file_log.clear();
        self.file_attributes.clear();
    }

    /// Load a file, keeping at most `max_events` events (`None` for all).
    ///
    /// `Some(0)` reads the header only: the returned table has full parameter
    /// metadata and no rows. On success the codec's table is replaced by a new
    /// one and a handle to it is returned.
    pub fn load<P: AsRef<Path>>(
        &mut self,
        path: P,
        max_events: Option<usize>,
    ) -> Result<SharedEventTable, CodecError> {
        let path = path.as_ref();
        self.reset();
        self.file_attributes
            .insert(ATTR_PATH, path.display().to_string());

        let file = File::open(path).map_err(|e| {
            let detail = format!("Cannot open \"{}\" for reading: {}", path.display(), e);
            self.file_log.fail(CodecError::from_open_error(path, e), detail)
        })?;
        let mut reader = BufReader::new(file);

        let size = match stream_size(&mut reader) {
            Ok(size) => Some(size),
            Err(e) => {
                debug!("Seek to end failed ({}), using file metadata for size", e);
                fs::metadata(path).ok().map(|m| m.len())
            }
        };

        let table = self.decode(&mut reader, 0, size, max_events)?;
        info!(
            "Loaded {} events x {} parameters from {}",
            table.number_of_events(),
            table.number_of_parameters(),
            path.display()
        );
        Ok(self.install(table))
    }

    /// Load from any seekable stream positioned at the start of the header
    pub fn read_from<R: Read + Seek>(
        &mut self,
        reader: &mut R,
        max_events: Option<usize>,
    ) -> Result<SharedEventTable, CodecError> {
        self.reset();
        let start = reader.stream_position().map_err(|e| {
            self.file_log.fail(
                CodecError::Truncated("read failed".to_string()),
                format!("Cannot determine the stream position: {}", e),
            )
        })?;
        let size = match stream_size(reader) {
            Ok(size) => Some(size),
            Err(e) => {
                return Err(self.file_log.fail(
                    CodecError::Truncated("read failed".to_string()),
                    format!("Cannot determine the stream length: {}", e),
                ))
            }
        };
        let table = self.decode(reader, start, size, max_events)?;
        Ok(self.install(table))
    }

    fn install(&mut self, table: EventTable) -> SharedEventTable {
        let shared = Rc::new(RefCell::new(table));
        self.table = Some(Rc::clone(&shared));
        shared
    }

    fn decode<R: Read + Seek>(
        &mut self,
        reader: &mut R,
        start: u64,
        size: Option<u64>,
        max_events: Option<usize>,
    ) -> Result<EventTable, CodecError> {
        let (header, header_size) = HeaderReader::new(reader, &mut self.file_log, size).read()?;
        let events_to_read = max_events.map_or(header.number_of_events, |max| {
            max.min(header.number_of_events)
        });

        let data_size = header.data_size().ok_or_else(|| {
            self.file_log.fail(
                CodecError::Malformed("event data too large".to_string()),
                format!(
                    "{} events x {} parameters of {} overflows the addressable size",
                    header.number_of_events,
                    header.parameters.len(),
                    header.number_format
                ),
            )
        })?;
        if let Some(size) = size {
            let expected = header_size.saturating_add(data_size);
            if events_to_read > 0 && size < expected {
                return Err(self.file_log.fail(
                    CodecError::Truncated("event data ends early".to_string()),
                    format!(
                        "Header declares {} events x {} parameters ({} bytes of {} data) \
                         but only {} bytes follow the header",
                        header.number_of_events,
                        header.parameters.len(),
                        data_size,
                        header.number_format,
                        size.saturating_sub(header_size)
                    ),
                ));
            }
            if size > expected {
                self.file_log.warning(format!(
                    "{} unexpected bytes follow the last column",
                    size - expected
                ));
            }
        }

        let short_names: Vec<&str> = header
            .parameters
            .iter()
            .map(|p| p.short_name.as_str())
            .collect();
        let mut table = EventTable::new(header.number_format, &short_names, events_to_read)
            .map_err(|e| {
                let detail = format!("Cannot build the event table: {}", e);
                self.file_log.fail(CodecError::from(e), detail)
            })?;
        for (index, parameter) in header.parameters.iter().enumerate() {
            table.set_long_name(index, parameter.long_name.as_str())?;
            table.set_specified_range(
                index,
                parameter.specified_minimum,
                parameter.specified_maximum,
            )?;
        }

        let layout = ColumnLayout {
            data_offset: start + header_size,
            events_in_file: header.number_of_events,
            events_to_read,
            byte_order: header.byte_order,
        };
        columns::read_columns(reader, &mut table, &layout).map_err(|(index, err)| {
            let name = &header.parameters[index].short_name;
            if err.kind() == io::ErrorKind::UnexpectedEof {
                self.file_log.fail(
                    CodecError::Truncated("event data ends early".to_string()),
                    format!("File ends inside column {} (\"{}\")", index + 1, name),
                )
            } else {
                self.file_log.fail(
                    CodecError::Truncated("read failed".to_string()),
                    format!("Read error in column {} (\"{}\"): {}", index + 1, name, err),
                )
            }
        })?;
        table.compute_data_ranges();

        self.record_attributes(&header, events_to_read);
        self.file_attributes.insert(
            ATTR_NUMBER_OF_EVENTS_IN_FILE,
            header.number_of_events.to_string(),
        );
        Ok(table)
    }

    fn record_attributes(&mut self, header: &Header, number_of_events: usize) {
        let attributes = &mut self.file_attributes;
        attributes.insert(ATTR_VERSION, VERSION_TOKEN);
        attributes.insert(ATTR_BYTE_ORDER, header.byte_order.as_str());
        attributes.insert(ATTR_NUMBER_FORMAT, header.number_format.as_str());
        attributes.insert(ATTR_NUMBER_OF_EVENTS, number_of_events.to_string());
        attributes.insert(ATTR_NUMBER_OF_PARAMETERS, header.parameters.len().to_string());
    }

    /// Save the held table, writing at most `max_events` events (`None` for all).
    ///
    /// The file is written to a temporary sibling and moved into place only
    /// after every byte was written, so a failed save leaves `path` untouched.
    pub fn save<P: AsRef<Path>>(
        &mut self,
        path: P,
        max_events: Option<usize>,
    ) -> Result<(), CodecError> {
        let path = path.as_ref();
        self.reset();
        self.file_attributes
            .insert(ATTR_PATH, path.display().to_string());

        let shared = self.held_table()?;
        let table = self.borrow_table(&shared)?;
        let number_of_events = self.events_to_write(&table, max_events)?;

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
            self.encode(&mut writer, &table, number_of_events, &target)?;
            writer
                .flush()
                .map_err(|e| self.write_failure("event data", &target, e))?;
        }
        temp.persist(path)
            .map_err(|e| self.write_failure("file", &target, e.error))?;

        info!(
            "Saved {} events x {} parameters to {}",
            number_of_events,
            table.number_of_parameters(),
            path.display()
        );
        Ok(())
    }

    /// Write the held table to any stream, at most `max_events` events
    pub fn write_to<W: Write>(
        &mut self,
        writer: &mut W,
        max_events: Option<usize>,
    ) -> Result<(), CodecError> {
        self.reset();
        let shared = self.held_table()?;
        let table = self.borrow_table(&shared)?;
        let number_of_events = self.events_to_write(&table, max_events)?;
        self.encode(writer, &table, number_of_events, "stream")?;
        writer
            .flush()
            .map_err(|e| self.write_failure("event data", "stream", e))
    }

    fn held_table(&mut self) -> Result<SharedEventTable, CodecError> {
        match &self.table {
            Some(table) => Ok(Rc::clone(table)),
            None => Err(self.file_log.fail(
                CodecError::InvalidArgument("no event table to save".to_string()),
                "Save called on a codec that holds no event table",
            )),
        }
    }

    fn borrow_table<'t>(
        &mut self,
        shared: &'t SharedEventTable,
    ) -> Result<std::cell::Ref<'t, EventTable>, CodecError> {
        shared.try_borrow().map_err(|_| {
            self.file_log.fail(
                CodecError::InvalidArgument("event table is in use".to_string()),
                "The event table is mutably borrowed elsewhere during save",
            )
        })
    }

    fn events_to_write(
        &mut self,
        table: &EventTable,
        max_events: Option<usize>,
    ) -> Result<usize, CodecError> {
        let number_of_events =
            max_events.map_or(table.number_of_events(), |max| max.min(table.number_of_events()));
        if number_of_events == 0 || table.number_of_parameters() == 0 {
            return Err(self.file_log.fail(
                CodecError::InvalidArgument("nothing to save".to_string()),
                format!(
                    "Cannot save {} events x {} parameters; the format needs at least one of each",
                    number_of_events,
                    table.number_of_parameters()
                ),
            ));
        }
        Ok(number_of_events)
    }

    fn encode<W: Write>(
        &mut self,
        writer: &mut W,
        table: &EventTable,
        number_of_events: usize,
        target: &str,
    ) -> Result<(), CodecError> {
        let header = Header::from_table(table, number_of_events, self.config.byte_order);
        header::write_header(writer, &header)
            .map_err(|e| self.write_failure("header", target, e))?;
        columns::write_columns(writer, table, number_of_events, header.byte_order).map_err(
            |(index, e)| {
                let name = &header.parameters[index].short_name;
                let what = format!("column {} (\"{}\")", index + 1, name);
                self.write_failure(&what, target, e)
            },
        )?;
        self.record_attributes(&header, number_of_events);
        debug!(
            "Encoded {} events in {} byte order",
            number_of_events, header.byte_order
        );
        Ok(())
    }

    fn write_failure(&mut self, what: &str, target: &str, err: io::Error) -> CodecError {
        self.file_log.fail(
            CodecError::Write(format!("cannot write {}", what)),
            format!("Cannot write the {} to {}: {}", what, target, err),
        )
    }
}

/// Bytes from the current position to the end; the position is restored
fn stream_size<S: Seek>(stream: &mut S) -> io::Result<u64> {
    let start = stream.stream_position()?;
    let end = stream.seek(SeekFrom::End(0))?;
    stream.seek(SeekFrom::Start(start))?;
    Ok(end.saturating_sub(start))
}
