use anyhow::Result;
use log::info;
use std::path::PathBuf;

use flowgate::binary::BinaryEventCodec;
use flowgate::json::{JsonParameterMapCodec, DEFAULT_JSON_INDENT};

use super::check;

/// Build a parameter map from an event file's parameter names
pub fn run(events: PathBuf, output: PathBuf, merge: bool, indent: Option<usize>) -> Result<()> {
    // Parameter names live in the header; no event data is needed
    let mut event_codec = BinaryEventCodec::new();
    let result = event_codec.load(&events, Some(0));
    let table = check(result, event_codec.file_log(), "load", &events)?;

    let mut map_codec = JsonParameterMapCodec::new();
    if merge && output.exists() {
        let result = map_codec.load(&output);
        check(result, map_codec.file_log(), "load", &output)?;
    }

    let shared = map_codec.parameter_map();
    let added = {
        let mut map = shared.borrow_mut();
        if map.name().is_empty() {
            if let Some(stem) = events.file_stem() {
                map.set_name(stem.to_string_lossy());
            }
        }
        map.set_creator_software_name(format!("flowgate {}", flowgate::VERSION));
        map.copy_from_source(&*table.borrow())
    };

    let result = map_codec.save_with_indent(&output, indent.unwrap_or(DEFAULT_JSON_INDENT));
    check(result, map_codec.file_log(), "save", &output)?;

    let total = shared.borrow().number_of_parameters();
    info!("Added {} of {} parameters", added, total);
    println!(
        "Wrote {} ({} parameters, {} new)",
        output.display(),
        total,
        added
    );
    Ok(())
}
