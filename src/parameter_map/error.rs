/// Errors that can occur when editing a parameter map
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterMapError {
    /// The short name is empty
    #[error("Parameter short name must not be empty")]
    EmptyShortName,

    /// An entry already exists for the short name
    #[error("Parameter already exists: {0}")]
    DuplicateShortName(String),
}
