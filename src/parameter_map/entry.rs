use crate::transform::Transform;

/// Annotations for one parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMapEntry {
    /// Unique, non-empty identifier
    pub short_name: String,
    /// Descriptive label, may be empty
    pub long_name: String,
    /// Free-text description, may be empty
    pub description: String,
    /// Whether the parameter is offered for gating
    pub visible_for_gating: bool,
    /// Transform applied by default when displaying or gating
    pub default_transform: Option<Transform>,
}

impl ParameterMapEntry {
    /// Entry with default fields
    pub fn new(short_name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            long_name: String::new(),
            description: String::new(),
            visible_for_gating: true,
            default_transform: None,
        }
    }

    /// Set the long name
    pub fn long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = long_name.into();
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set gating visibility
    pub fn visible_for_gating(mut self, visible: bool) -> Self {
        self.visible_for_gating = visible;
        self
    }

    /// Set the default transform
    pub fn default_transform(mut self, transform: Transform) -> Self {
        self.default_transform = Some(transform);
        self
    }
}
