//! Tree-walking reader for parameter map documents.
//!
//! The document is parsed into a [`serde_json::Value`] first and then walked
//! by hand, so every structural problem can be reported with the parameter
//! and key it concerns. Unknown keys are ignored at every level.

use log::debug;
use serde_json::{Map, Value};

use super::{VERSION_PREFIX, VERSION_TOKEN};
use crate::diagnostics::{
    FileAttributes, FileLog, ATTR_CREATOR_SOFTWARE_NAME, ATTR_DESCRIPTION, ATTR_NAME,
    ATTR_NUMBER_OF_PARAMETERS, ATTR_VERSION,
};
use crate::error::CodecError;
use crate::parameter_map::ParameterMap;
use crate::transform::{Transform, TransformArguments, TransformKind};

/// Document keys
mod key {
    pub const VERSION: &str = "version";
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const CREATOR_SOFTWARE_NAME: &str = "creatorSoftwareName";
    pub const PARAMETERS: &str = "parameters";
    pub const LONG_NAME: &str = "longName";
    pub const VISIBLE_FOR_GATING: &str = "visibleForGating";
    pub const DEFAULT_TRANSFORM: &str = "defaultTransform";
    pub const TRANSFORM_TYPE: &str = "transformType";
}

/// String spellings of "no transform"
const NULL_STRINGS: &[&str] = &["", "null", "NULL"];

/// Argument names a transform object may carry
const ARGUMENT_NAMES: [char; 4] = ['a', 'm', 't', 'w'];

/// Reads one document into a fresh [`ParameterMap`]
pub(super) struct MapReader<'a> {
    log: &'a mut FileLog,
    attributes: &'a mut FileAttributes,
}

impl<'a> MapReader<'a> {
    pub fn new(log: &'a mut FileLog, attributes: &'a mut FileAttributes) -> Self {
        Self { log, attributes }
    }

    /// Parse and validate `text`
    pub fn read(mut self, text: &str) -> Result<ParameterMap, CodecError> {
        let root = self.parse_document(text)?;
        let root = match root {
            Value::Object(object) => object,
            other => {
                return Err(self.malformed(
                    "root is not an object",
                    format!(
                        "The document root is {}; expected an object",
                        json_type(&other)
                    ),
                ))
            }
        };

        self.read_version(&root)?;

        let mut map = ParameterMap::new();
        if let Some(name) = self.optional_string(&root, key::NAME, "The document")? {
            map.set_name(name);
            self.attributes.insert(ATTR_NAME, name);
        }
        if let Some(description) = self.optional_string(&root, key::DESCRIPTION, "The document")? {
            map.set_description(description);
            self.attributes.insert(ATTR_DESCRIPTION, description);
        }
        if let Some(creator) =
            self.optional_string(&root, key::CREATOR_SOFTWARE_NAME, "The document")?
        {
            map.set_creator_software_name(creator);
            self.attributes.insert(ATTR_CREATOR_SOFTWARE_NAME, creator);
        }

        self.read_parameters(&root, &mut map)?;
        self.attributes.insert(
            ATTR_NUMBER_OF_PARAMETERS,
            map.number_of_parameters().to_string(),
        );
        Ok(map)
    }

    fn parse_document(&mut self, text: &str) -> Result<Value, CodecError> {
        if text.trim().is_empty() {
            return Err(self.log.fail(
                CodecError::UnrecognizedFormat("empty document".to_string()),
                "The parameter map document is empty",
            ));
        }
        serde_json::from_str(text).map_err(|e| {
            let error = if e.is_eof() {
                CodecError::Truncated("document ends early".to_string())
            } else {
                CodecError::Malformed("invalid JSON".to_string())
            };
            self.log.fail(
                error,
                format!(
                    "JSON parse error at line {}, column {}: {}",
                    e.line(),
                    e.column(),
                    e
                ),
            )
        })
    }

    fn read_version(&mut self, root: &Map<String, Value>) -> Result<(), CodecError> {
        let version = match root.get(key::VERSION) {
            Some(Value::String(version)) => version.as_str(),
            Some(other) => {
                return Err(self.malformed(
                    "invalid version",
                    format!(
                        "The \"{}\" key is {}; expected a string",
                        key::VERSION,
                        json_type(other)
                    ),
                ))
            }
            None => {
                return Err(self.malformed(
                    "missing version",
                    format!("The document has no \"{}\" key", key::VERSION),
                ))
            }
        };

        if version != VERSION_TOKEN {
            let detail = format!(
                "Version \"{}\" is not supported; expected \"{}\"",
                version, VERSION_TOKEN
            );
            let error = if version.starts_with(VERSION_PREFIX) {
                CodecError::Unsupported(version.to_string())
            } else {
                CodecError::UnrecognizedFormat("not a FlowGate parameter map".to_string())
            };
            return Err(self.log.fail(error, detail));
        }
        self.attributes.insert(ATTR_VERSION, version);
        Ok(())
    }

    fn read_parameters(
        &mut self,
        root: &Map<String, Value>,
        map: &mut ParameterMap,
    ) -> Result<(), CodecError> {
        let parameters = match root.get(key::PARAMETERS) {
            Some(Value::Array(parameters)) => parameters,
            Some(other) => {
                return Err(self.malformed(
                    "invalid parameter list",
                    format!(
                        "The \"{}\" key is {}; expected an array",
                        key::PARAMETERS,
                        json_type(other)
                    ),
                ))
            }
            None => {
                self.log.warning(format!(
                    "The document has no \"{}\" key; the map is empty",
                    key::PARAMETERS
                ));
                return Ok(());
            }
        };

        if parameters.is_empty() {
            self.log
                .warning("The parameter list is empty; the map is empty");
        }
        for (index, parameter) in parameters.iter().enumerate() {
            self.read_parameter(index, parameter, map)?;
        }
        debug!("Read {} parameter entries", parameters.len());
        Ok(())
    }

    fn read_parameter(
        &mut self,
        index: usize,
        value: &Value,
        map: &mut ParameterMap,
    ) -> Result<(), CodecError> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(self.malformed(
                    "parameter is not an object",
                    format!(
                        "Parameter {} is {}; expected an object",
                        index + 1,
                        json_type(other)
                    ),
                ))
            }
        };

        // The name may appear anywhere in the object and is needed first
        let context = format!("Parameter {}", index + 1);
        let short_name = match self.optional_string(object, key::NAME, &context)? {
            Some(name) if !name.is_empty() => name,
            Some(_) => {
                return Err(self.malformed(
                    "empty parameter name",
                    format!("{} has an empty \"{}\"", context, key::NAME),
                ))
            }
            None => {
                return Err(self.malformed(
                    "missing parameter name",
                    format!("{} has no \"{}\" key", context, key::NAME),
                ))
            }
        };
        if map.is_parameter(short_name) {
            self.log.warning(format!(
                "Parameter \"{}\" appears more than once; later values take precedence",
                short_name
            ));
        }

        let context = format!("Parameter \"{}\"", short_name);
        let long_name = self.optional_string(object, key::LONG_NAME, &context)?;
        let description = self.optional_string(object, key::DESCRIPTION, &context)?;
        let visible = match object.get(key::VISIBLE_FOR_GATING) {
            Some(value) => Some(self.read_visibility(value, &context)?),
            None => None,
        };
        let transform = match object.get(key::DEFAULT_TRANSFORM) {
            Some(value) => Some(self.read_default_transform(value, short_name)?),
            None => None,
        };

        let entry = map.entry_mut(short_name)?;
        if let Some(long_name) = long_name {
            entry.long_name = long_name.to_string();
        }
        if let Some(description) = description {
            entry.description = description.to_string();
        }
        if let Some(visible) = visible {
            entry.visible_for_gating = visible;
        }
        if let Some(transform) = transform {
            entry.default_transform = transform;
        }
        Ok(())
    }

    fn read_visibility(&mut self, value: &Value, context: &str) -> Result<bool, CodecError> {
        match value.as_f64() {
            Some(number) if number >= 0.0 => Ok(number != 0.0),
            Some(number) => Err(self.malformed(
                "invalid visibleForGating",
                format!(
                    "{} has a negative \"{}\" ({})",
                    context,
                    key::VISIBLE_FOR_GATING,
                    number
                ),
            )),
            None => Err(self.malformed(
                "invalid visibleForGating",
                format!(
                    "{} has a \"{}\" that is {}; expected a non-negative number",
                    context,
                    key::VISIBLE_FOR_GATING,
                    json_type(value)
                ),
            )),
        }
    }

    /// `Ok(None)` for any encoding of "no transform"
    fn read_default_transform(
        &mut self,
        value: &Value,
        short_name: &str,
    ) -> Result<Option<Transform>, CodecError> {
        let context = format!("The default transform of \"{}\"", short_name);
        match value {
            Value::Null => Ok(None),
            Value::String(text) if NULL_STRINGS.contains(&text.as_str()) => Ok(None),
            Value::Number(number) if number.as_f64() == Some(0.0) => Ok(None),
            Value::Object(object) => self.read_transform(object, &context),
            Value::Array(items) if items.is_empty() => Ok(None),
            other => Err(self.malformed(
                "invalid defaultTransform",
                format!(
                    "{} is {} ({}); expected null or an object",
                    context,
                    json_type(other),
                    other
                ),
            )),
        }
    }

    fn read_transform(
        &mut self,
        object: &Map<String, Value>,
        context: &str,
    ) -> Result<Option<Transform>, CodecError> {
        if object.is_empty() {
            return Ok(None);
        }

        let type_name = match self.optional_string(object, key::TRANSFORM_TYPE, context)? {
            Some(type_name) => type_name,
            None => {
                return Err(self.malformed(
                    "missing transformType",
                    format!("{} has no \"{}\" key", context, key::TRANSFORM_TYPE),
                ))
            }
        };
        let kind: TransformKind = type_name
            .parse()
            .map_err(|e| self.malformed("unknown transform type", format!("{}: {}", context, e)))?;

        let mut arguments = TransformArguments::default();
        for argument in ARGUMENT_NAMES {
            let name = argument.to_string();
            if let Some(value) = object.get(name.as_str()) {
                match value.as_f64() {
                    Some(number) => {
                        arguments.set(argument, number);
                    }
                    None => {
                        return Err(self.malformed(
                            "invalid transform argument",
                            format!(
                                "{} has an argument \"{}\" that is {}; expected a number",
                                context,
                                name,
                                json_type(value)
                            ),
                        ))
                    }
                }
            }
        }

        let mut transform = Transform::from_arguments(kind, &arguments).map_err(|e| {
            self.malformed("incomplete transform", format!("{}: {}", context, e))
        })?;
        if let Some(name) = self.optional_string(object, key::NAME, context)? {
            transform = transform.with_name(name);
        }
        if let Some(description) = self.optional_string(object, key::DESCRIPTION, context)? {
            transform = transform.with_description(description);
        }
        Ok(Some(transform))
    }

    /// A key that must be a string when present
    fn optional_string<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        key: &str,
        context: &str,
    ) -> Result<Option<&'v str>, CodecError> {
        match object.get(key) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.as_str())),
            Some(other) => Err(self.malformed(
                &format!("invalid {}", key),
                format!(
                    "{} has a \"{}\" that is {}; expected a string",
                    context,
                    key,
                    json_type(other)
                ),
            )),
        }
    }

    fn malformed(&mut self, summary: &str, detail: String) -> CodecError {
        self.log
            .fail(CodecError::Malformed(summary.to_string()), detail)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
