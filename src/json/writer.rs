//! Serializable views of a parameter map in the document key order.

use std::io::Write;

use serde::Serialize;

use super::VERSION_TOKEN;
use crate::parameter_map::{ParameterMap, ParameterMapEntry};
use crate::transform::Transform;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MapDocument<'a> {
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    creator_software_name: &'a str,
    parameters: Vec<ParameterDocument<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParameterDocument<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    long_name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
    visible_for_gating: u8,
    default_transform: Option<TransformDocument<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransformDocument<'a> {
    transform_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    t: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    a: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    w: Option<f64>,
}

impl<'a> TransformDocument<'a> {
    fn new(transform: &'a Transform) -> Self {
        let arguments = transform.arguments();
        Self {
            transform_type: transform.type_name(),
            name: transform.name.as_deref(),
            description: transform.description.as_deref(),
            t: arguments.t,
            a: arguments.a,
            m: arguments.m,
            w: arguments.w,
        }
    }
}

impl<'a> ParameterDocument<'a> {
    fn new(entry: &'a ParameterMapEntry) -> Self {
        Self {
            name: &entry.short_name,
            long_name: &entry.long_name,
            description: &entry.description,
            visible_for_gating: u8::from(entry.visible_for_gating),
            default_transform: entry
                .default_transform
                .as_ref()
                .filter(|t| !t.is_custom())
                .map(TransformDocument::new),
        }
    }
}

/// Short names of entries whose custom transform is written as null
pub(super) fn unwritable_transforms(map: &ParameterMap) -> Vec<&str> {
    let mut names: Vec<&str> = map
        .entries()
        .filter(|e| e.default_transform.as_ref().is_some_and(Transform::is_custom))
        .map(|e| e.short_name.as_str())
        .collect();
    names.sort_unstable();
    names
}

/// First default-transform argument JSON cannot hold, in short-name order
pub(super) fn non_finite_argument(map: &ParameterMap) -> Option<(&str, char, f64)> {
    let mut entries: Vec<&ParameterMapEntry> = map.entries().collect();
    entries.sort_unstable_by(|a, b| a.short_name.cmp(&b.short_name));
    entries.into_iter().find_map(|entry| {
        let transform = entry.default_transform.as_ref().filter(|t| !t.is_custom())?;
        let arguments = transform.arguments();
        ['t', 'a', 'm', 'w'].into_iter().find_map(|argument| {
            arguments
                .get(argument)
                .filter(|value| !value.is_finite())
                .map(|value| (entry.short_name.as_str(), argument, value))
        })
    })
}

/// Serialize `map` with parameters sorted by short name.
/// `indent` spaces per level; 0 writes a single line.
pub(super) fn write_document<W: Write>(
    writer: W,
    map: &ParameterMap,
    indent: usize,
) -> serde_json::Result<()> {
    let mut entries: Vec<&ParameterMapEntry> = map.entries().collect();
    entries.sort_by(|a, b| a.short_name.cmp(&b.short_name));

    let document = MapDocument {
        version: VERSION_TOKEN,
        name: map.name(),
        description: map.description(),
        creator_software_name: map.creator_software_name(),
        parameters: entries.into_iter().map(ParameterDocument::new).collect(),
    };

    if indent == 0 {
        serde_json::to_writer(writer, &document)
    } else {
        let indent = vec![b' '; indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        document.serialize(&mut serializer)
    }
}
