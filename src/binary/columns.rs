//! Columnar event data: one contiguous run of fixed-width values per
//! parameter, in header order, in the byte order recorded in the header.

use std::io::{self, Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use super::config::ByteOrder;
use crate::event_table::{EventTable, NumberFormat};

/// Column layout within the stream
#[derive(Debug, Clone, Copy)]
pub(super) struct ColumnLayout {
    /// Offset of the first column
    pub data_offset: u64,
    /// Events per column in the file
    pub events_in_file: usize,
    /// Events to read from each column
    pub events_to_read: usize,
    /// Byte order of the stored values
    pub byte_order: ByteOrder,
}

impl ColumnLayout {
    /// Whether every column can be read back to back without seeking
    fn is_contiguous(&self) -> bool {
        self.events_to_read == self.events_in_file
    }

    fn column_offset(&self, index: usize, format: NumberFormat) -> u64 {
        self.data_offset + (index as u64) * (self.events_in_file as u64) * format.byte_size() as u64
    }
}

/// Fill every column of `table` from the stream.
///
/// The stream must be positioned at `layout.data_offset`. When fewer events
/// are read than the file holds, each column is sought to independently.
/// On error, returns the index of the column being read with the I/O error.
pub(super) fn read_columns<R: Read + Seek>(
    reader: &mut R,
    table: &mut EventTable,
    layout: &ColumnLayout,
) -> Result<(), (usize, io::Error)> {
    if layout.events_to_read == 0 {
        return Ok(());
    }
    match layout.byte_order {
        ByteOrder::Lsbf => read_columns_as::<LittleEndian, R>(reader, table, layout),
        ByteOrder::Msbf => read_columns_as::<BigEndian, R>(reader, table, layout),
    }
}

fn read_columns_as<E: byteorder::ByteOrder, R: Read + Seek>(
    reader: &mut R,
    table: &mut EventTable,
    layout: &ColumnLayout,
) -> Result<(), (usize, io::Error)> {
    let format = table.number_format();
    for index in 0..table.number_of_parameters() {
        if !layout.is_contiguous() {
            reader
                .seek(SeekFrom::Start(layout.column_offset(index, format)))
                .map_err(|e| (index, e))?;
        }
        let result = match format {
            NumberFormat::Float => match table.float_column_mut(index) {
                Some(column) => reader.read_f32_into::<E>(column),
                None => Ok(()),
            },
            NumberFormat::Double => match table.double_column_mut(index) {
                Some(column) => reader.read_f64_into::<E>(column),
                None => Ok(()),
            },
        };
        result.map_err(|e| (index, e))?;
    }
    Ok(())
}

/// Write the first `number_of_events` values of every column.
/// On error, returns the index of the column being written with the I/O error.
pub(super) fn write_columns<W: Write>(
    writer: &mut W,
    table: &EventTable,
    number_of_events: usize,
    byte_order: ByteOrder,
) -> Result<(), (usize, io::Error)> {
    match byte_order {
        ByteOrder::Lsbf => write_columns_as::<LittleEndian, W>(writer, table, number_of_events),
        ByteOrder::Msbf => write_columns_as::<BigEndian, W>(writer, table, number_of_events),
    }
}

fn write_columns_as<E: byteorder::ByteOrder, W: Write>(
    writer: &mut W,
    table: &EventTable,
    number_of_events: usize,
) -> Result<(), (usize, io::Error)> {
    let format = table.number_format();
    // Reused across columns
    let mut buffer = vec![0u8; number_of_events * format.byte_size()];
    for index in 0..table.number_of_parameters() {
        match format {
            NumberFormat::Float => {
                if let Some(column) = table.float_column(index) {
                    E::write_f32_into(&column[..number_of_events], &mut buffer);
                }
            }
            NumberFormat::Double => {
                if let Some(column) = table.double_column(index) {
                    E::write_f64_into(&column[..number_of_events], &mut buffer);
                }
            }
        }
        writer.write_all(&buffer).map_err(|e| (index, e))?;
    }
    Ok(())
}
