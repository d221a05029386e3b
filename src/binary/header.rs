//! Fixed-width ASCII header of the binary event format.
//!
//! ```text
//! version token       40 bytes  "FlowGateBinaryEvents_1.0.0", space padded
//! byte order          20 bytes  "lsbf" | "msbf"
//! number format       20 bytes  "float" | "double"
//! event count         20 bytes  positive decimal
//! parameter count     20 bytes  positive decimal (N)
//! N x (20-byte length + short name bytes)
//! N x (20-byte length + long name bytes, length may be 0)
//! N x 20-byte specified minimum
//! N x 20-byte specified maximum
//! ```

use std::collections::HashSet;
use std::io::{self, Read, Write};

use log::debug;

use super::config::ByteOrder;
use crate::diagnostics::FileLog;
use crate::error::CodecError;
use crate::event_table::{EventTable, NumberFormat};

/// Version token at the start of every file
pub const VERSION_TOKEN: &str = "FlowGateBinaryEvents_1.0.0";

/// Width of the version field
pub const VERSION_FIELD_WIDTH: usize = 40;

/// Width of every other header field
pub const FIELD_WIDTH: usize = 20;

const MAX_PREALLOCATED_PARAMETERS: usize = 1024;

/// One parameter as described by the header
#[derive(Debug, Clone, PartialEq)]
pub(super) struct HeaderParameter {
    pub short_name: String,
    pub long_name: String,
    pub specified_minimum: f64,
    pub specified_maximum: f64,
}

/// Parsed header
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Header {
    pub byte_order: ByteOrder,
    pub number_format: NumberFormat,
    pub number_of_events: usize,
    pub parameters: Vec<HeaderParameter>,
}

impl Header {
    /// Header describing the first `number_of_events` rows of a table
    pub fn from_table(table: &EventTable, number_of_events: usize, byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            number_format: table.number_format(),
            number_of_events,
            parameters: table
                .parameters()
                .iter()
                .map(|p| HeaderParameter {
                    short_name: p.short_name.clone(),
                    long_name: p.long_name.clone(),
                    specified_minimum: p.specified_minimum,
                    specified_maximum: p.specified_maximum,
                })
                .collect(),
        }
    }

    /// Bytes occupied by one full column
    pub fn column_size(&self) -> Option<u64> {
        (self.number_of_events as u64).checked_mul(self.number_format.byte_size() as u64)
    }

    /// Bytes occupied by all columns
    pub fn data_size(&self) -> Option<u64> {
        self.column_size()?
            .checked_mul(self.parameters.len() as u64)
    }
}

/// Streaming header parser that records every failure in the file log
pub(super) struct HeaderReader<'a, R: Read> {
    reader: &'a mut R,
    log: &'a mut FileLog,
    position: u64,
    size: Option<u64>,
}

impl<'a, R: Read> HeaderReader<'a, R> {
    /// `size` is the total stream length when known; it enables length checks
    /// before allocating name buffers
    pub fn new(reader: &'a mut R, log: &'a mut FileLog, size: Option<u64>) -> Self {
        Self {
            reader,
            log,
            position: 0,
            size,
        }
    }

    /// Parse the whole header. Returns it with the offset of the first column.
    pub fn read(mut self) -> Result<(Header, u64), CodecError> {
        self.read_version()?;

        let byte_order_text = self.read_text(FIELD_WIDTH, "byte order")?;
        let byte_order = ByteOrder::from_name(&byte_order_text).ok_or_else(|| {
            self.log.fail(
                CodecError::Malformed("invalid byte order".to_string()),
                format!(
                    "Byte order field is \"{}\"; expected \"lsbf\" or \"msbf\"",
                    byte_order_text
                ),
            )
        })?;

        let format_text = self.read_text(FIELD_WIDTH, "number format")?;
        let number_format = NumberFormat::from_name(&format_text).ok_or_else(|| {
            self.log.fail(
                CodecError::Malformed("invalid number format".to_string()),
                format!(
                    "Number format field is \"{}\"; expected \"float\" or \"double\"",
                    format_text
                ),
            )
        })?;

        let number_of_events = self.read_count("number of events")?;
        let number_of_parameters = self.read_count("number of parameters")?;
        debug!(
            "Header: {} {} events={} parameters={}",
            byte_order, number_format, number_of_events, number_of_parameters
        );

        // Each parameter needs at least five fixed-width fields; reject counts
        // the stream could never hold before allocating for them.
        if let Some(size) = self.size {
            let minimum = (number_of_parameters as u64).saturating_mul(5 * FIELD_WIDTH as u64);
            if self.position.saturating_add(minimum) > size {
                return Err(self.log.fail(
                    CodecError::Truncated("header ends early".to_string()),
                    format!(
                        "Header declares {} parameters but only {} bytes remain in the file",
                        number_of_parameters,
                        size.saturating_sub(self.position)
                    ),
                ));
            }
        }

        let capacity = number_of_parameters.min(MAX_PREALLOCATED_PARAMETERS);
        let mut short_names = Vec::with_capacity(capacity);
        let mut seen = HashSet::with_capacity(capacity);
        for index in 0..number_of_parameters {
            let name = self.read_name(index, "short name")?;
            if name.is_empty() {
                return Err(self.log.fail(
                    CodecError::Malformed("empty parameter short name".to_string()),
                    format!("Parameter {} has a zero-length short name", index + 1),
                ));
            }
            if !seen.insert(name.clone()) {
                return Err(self.log.fail(
                    CodecError::Malformed("duplicate parameter short name".to_string()),
                    format!(
                        "Parameter {} repeats the short name \"{}\"",
                        index + 1,
                        name
                    ),
                ));
            }
            short_names.push(name);
        }

        let mut long_names = Vec::with_capacity(capacity);
        for index in 0..number_of_parameters {
            long_names.push(self.read_name(index, "long name")?);
        }

        let mut minimums = Vec::with_capacity(capacity);
        for index in 0..number_of_parameters {
            minimums.push(self.read_float(index, "specified minimum")?);
        }

        let mut maximums = Vec::with_capacity(capacity);
        for index in 0..number_of_parameters {
            maximums.push(self.read_float(index, "specified maximum")?);
        }

        let parameters = short_names
            .into_iter()
            .zip(long_names)
            .zip(minimums.into_iter().zip(maximums))
            .map(|((short_name, long_name), (min, max))| HeaderParameter {
                short_name,
                long_name,
                specified_minimum: min,
                specified_maximum: max,
            })
            .collect();

        let header = Header {
            byte_order,
            number_format,
            number_of_events,
            parameters,
        };
        Ok((header, self.position))
    }

    fn read_version(&mut self) -> Result<(), CodecError> {
        let mut field = [0u8; VERSION_FIELD_WIDTH];
        let mut filled = 0;
        while filled < field.len() {
            match self.reader.read(&mut field[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.read_failure("version token", e)),
            }
        }
        self.position += filled as u64;

        // The token must match byte for byte; only the padding may differ
        let token = VERSION_TOKEN.as_bytes();
        let available = &field[..filled];
        let compared = available.len().min(token.len());
        let padding_ok = available.get(token.len()..).map_or(true, |padding| {
            padding.iter().all(|&b| b == b' ' || b == 0)
        });
        if available.is_empty() || available[..compared] != token[..compared] || !padding_ok {
            let found = String::from_utf8_lossy(available);
            return Err(self.log.fail(
                CodecError::UnrecognizedFormat("not a FlowGate binary event file".to_string()),
                format!(
                    "File does not start with the version token \"{}\" (found \"{}\")",
                    VERSION_TOKEN,
                    found.trim_end()
                ),
            ));
        }
        if filled < VERSION_FIELD_WIDTH {
            return Err(self.log.fail(
                CodecError::Truncated("header ends early".to_string()),
                format!(
                    "File ends after {} bytes, inside the {}-byte version field",
                    filled, VERSION_FIELD_WIDTH
                ),
            ));
        }
        Ok(())
    }

    fn read_failure(&mut self, what: &str, err: io::Error) -> CodecError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            self.log.fail(
                CodecError::Truncated("header ends early".to_string()),
                format!(
                    "File ends at byte {} while reading the {}",
                    self.position, what
                ),
            )
        } else {
            self.log.fail(
                CodecError::Truncated("read failed".to_string()),
                format!(
                    "Read error at byte {} while reading the {}: {}",
                    self.position, what, err
                ),
            )
        }
    }

    fn read_bytes(&mut self, len: usize, what: &str) -> Result<Vec<u8>, CodecError> {
        if let Some(size) = self.size {
            if self.position.saturating_add(len as u64) > size {
                return Err(self.log.fail(
                    CodecError::Truncated("header ends early".to_string()),
                    format!(
                        "The {} needs {} bytes at offset {} but the file is {} bytes long",
                        what, len, self.position, size
                    ),
                ));
            }
        }
        let buffer = match self.size {
            Some(_) => {
                let mut buffer = vec![0u8; len];
                if let Err(e) = self.reader.read_exact(&mut buffer) {
                    return Err(self.read_failure(what, e));
                }
                buffer
            }
            // Unknown stream length: grow as data arrives instead of trusting `len`
            None => {
                let mut buffer = Vec::new();
                let result = self.reader.by_ref().take(len as u64).read_to_end(&mut buffer);
                match result {
                    Ok(n) if n == len => buffer,
                    Ok(_) => {
                        let eof = io::Error::from(io::ErrorKind::UnexpectedEof);
                        return Err(self.read_failure(what, eof));
                    }
                    Err(e) => return Err(self.read_failure(what, e)),
                }
            }
        };
        self.position += len as u64;
        Ok(buffer)
    }

    fn read_text(&mut self, width: usize, what: &str) -> Result<String, CodecError> {
        let bytes = self.read_bytes(width, what)?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text
                .trim_end_matches(|c: char| c == ' ' || c == '\0')
                .trim_start()
                .to_string()),
            Err(_) => Err(self.log.fail(
                CodecError::Malformed(format!("invalid {} field", what)),
                format!("The {} field is not ASCII text", what),
            )),
        }
    }

    fn read_integer(&mut self, what: &str) -> Result<i64, CodecError> {
        let text = self.read_text(FIELD_WIDTH, what)?;
        text.parse::<i64>().map_err(|_| {
            self.log.fail(
                CodecError::Malformed(format!("invalid {} field", what)),
                format!("The {} field \"{}\" is not a decimal integer", what, text),
            )
        })
    }

    fn read_count(&mut self, what: &str) -> Result<usize, CodecError> {
        let value = self.read_integer(what)?;
        match usize::try_from(value) {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(self.log.fail(
                CodecError::Malformed(format!("invalid {}", what)),
                format!("The {} must be positive, found {}", what, value),
            )),
        }
    }

    fn read_name(&mut self, index: usize, what: &str) -> Result<String, CodecError> {
        let label = format!("parameter {} {} length", index + 1, what);
        let length = self.read_integer(&label)?;
        let length = usize::try_from(length).map_err(|_| {
            self.log.fail(
                CodecError::Malformed(format!("invalid {} length", what)),
                format!(
                    "Parameter {} {} length is negative ({})",
                    index + 1,
                    what,
                    length
                ),
            )
        })?;

        let label = format!("parameter {} {}", index + 1, what);
        let bytes = self.read_bytes(length, &label)?;
        String::from_utf8(bytes).map_err(|_| {
            self.log.fail(
                CodecError::Malformed(format!("invalid {}", what)),
                format!("Parameter {} {} is not valid UTF-8", index + 1, what),
            )
        })
    }

    fn read_float(&mut self, index: usize, what: &str) -> Result<f64, CodecError> {
        let label = format!("parameter {} {}", index + 1, what);
        let text = self.read_text(FIELD_WIDTH, &label)?;
        text.parse::<f64>().map_err(|_| {
            self.log.fail(
                CodecError::Malformed(format!("invalid {}", what)),
                format!("The {} field \"{}\" is not a number", label, text),
            )
        })
    }
}

fn padded(text: &str, width: usize) -> io::Result<Vec<u8>> {
    if text.len() > width {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("\"{}\" does not fit in a {}-byte header field", text, width),
        ));
    }
    let mut field = Vec::with_capacity(width);
    field.extend_from_slice(text.as_bytes());
    field.resize(width, b' ');
    Ok(field)
}

/// Render a value for a 20-byte field with twelve significant digits
pub(super) fn format_float(value: f64) -> String {
    format!("{:.11e}", value)
}

fn put_field<W: Write>(writer: &mut W, text: &str, width: usize) -> io::Result<()> {
    writer.write_all(&padded(text, width)?)
}

fn put_name<W: Write>(writer: &mut W, name: &str) -> io::Result<()> {
    put_field(writer, &name.len().to_string(), FIELD_WIDTH)?;
    writer.write_all(name.as_bytes())
}

/// Write the header
pub(super) fn write_header<W: Write>(writer: &mut W, header: &Header) -> io::Result<()> {
    put_field(writer, VERSION_TOKEN, VERSION_FIELD_WIDTH)?;
    put_field(writer, header.byte_order.as_str(), FIELD_WIDTH)?;
    put_field(writer, header.number_format.as_str(), FIELD_WIDTH)?;
    put_field(writer, &header.number_of_events.to_string(), FIELD_WIDTH)?;
    put_field(writer, &header.parameters.len().to_string(), FIELD_WIDTH)?;

    for parameter in &header.parameters {
        put_name(writer, &parameter.short_name)?;
    }
    for parameter in &header.parameters {
        put_name(writer, &parameter.long_name)?;
    }
    for parameter in &header.parameters {
        put_field(writer, &format_float(parameter.specified_minimum), FIELD_WIDTH)?;
    }
    for parameter in &header.parameters {
        put_field(writer, &format_float(parameter.specified_maximum), FIELD_WIDTH)?;
    }
    Ok(())
}
