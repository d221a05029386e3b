use anyhow::Result;
use log::info;
use std::path::PathBuf;

use flowgate::binary::{BinaryCodecConfig, BinaryEventCodec, ByteOrder};
use flowgate::diagnostics::{ATTR_NUMBER_OF_EVENTS, ATTR_NUMBER_OF_EVENTS_IN_FILE};

use super::check;

/// Rewrite an event file keeping only its first `max_events` events
pub fn run(
    input: PathBuf,
    output: PathBuf,
    max_events: usize,
    byte_order: Option<ByteOrder>,
) -> Result<()> {
    if max_events == 0 {
        anyhow::bail!("--max-events must be at least 1");
    }

    let mut reader = BinaryEventCodec::new();
    let result = reader.load(&input, Some(max_events));
    let table = check(result, reader.file_log(), "load", &input)?;

    let config = BinaryCodecConfig::with_byte_order(byte_order.unwrap_or_default());
    let mut writer = BinaryEventCodec::with_config(config);
    writer.set_event_table(table);
    let result = writer.save(&output, None);
    check(result, writer.file_log(), "save", &output)?;

    let attributes = writer.file_attributes();
    info!(
        "Wrote {} events in {} byte order",
        attributes.get(ATTR_NUMBER_OF_EVENTS).unwrap_or("?"),
        writer.config().byte_order
    );
    println!(
        "Wrote {} ({} of {} events)",
        output.display(),
        attributes.get(ATTR_NUMBER_OF_EVENTS).unwrap_or("?"),
        reader
            .file_attributes()
            .get(ATTR_NUMBER_OF_EVENTS_IN_FILE)
            .unwrap_or("?")
    );
    Ok(())
}
