use anyhow::Result;
use std::path::PathBuf;

use flowgate::binary::BinaryEventCodec;
use flowgate::diagnostics::FileAttributes;
use flowgate::format::FileFormat;
use flowgate::json::JsonParameterMapCodec;

use super::check;

/// Display information about an event file or parameter map
pub fn run(file: PathBuf, max_events: Option<usize>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    match FileFormat::from_path(&file) {
        Some(FileFormat::BinaryEvents) => event_file_info(file, max_events),
        Some(FileFormat::ParameterMap) => parameter_map_info(file),
        None => anyhow::bail!(
            "Unknown file extension: {} (expected one of {})",
            file.display(),
            FileFormat::ALL
                .iter()
                .flat_map(|f| f.extensions())
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn event_file_info(file: PathBuf, max_events: Option<usize>) -> Result<()> {
    let mut codec = BinaryEventCodec::new();
    let result = codec.load(&file, max_events);
    let table = check(result, codec.file_log(), "load", &file)?;
    let table = table.borrow();

    println!("FlowGate Event File Information");
    println!("===============================");
    print_attributes(codec.file_attributes());
    println!();

    println!("Parameters:");
    for (index, parameter) in table.parameters().iter().enumerate() {
        let data_range = match (parameter.data_minimum, parameter.data_maximum) {
            (Some(min), Some(max)) => format!("[{}, {}]", min, max),
            _ => "-".to_string(),
        };
        println!(
            "  {:3}. {:<16} {:<24} specified [{}, {}]  data {}",
            index + 1,
            parameter.short_name,
            parameter.long_name,
            parameter.specified_minimum,
            parameter.specified_maximum,
            data_range
        );
    }

    Ok(())
}

fn parameter_map_info(file: PathBuf) -> Result<()> {
    let mut codec = JsonParameterMapCodec::new();
    let result = codec.load(&file);
    let map = check(result, codec.file_log(), "load", &file)?;
    let map = map.borrow();

    println!("FlowGate Parameter Map Information");
    println!("==================================");
    print_attributes(codec.file_attributes());
    println!();

    println!("Parameters:");
    for name in map.sorted_parameter_names() {
        let transform = match map.find_default_transform(name) {
            Some(transform) => transform.to_string(),
            None => "-".to_string(),
        };
        println!(
            "  {:<16} {:<24} gating: {:<3}  transform: {}",
            name,
            map.find_long_name(name),
            if map.find_visible_for_gating(name) { "yes" } else { "no" },
            transform
        );
    }

    Ok(())
}

fn print_attributes(attributes: &FileAttributes) {
    for (key, value) in attributes.iter() {
        println!("{:<22} {}", format!("{}:", key), value);
    }
}
