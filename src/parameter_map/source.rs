use crate::event_table::EventTable;

/// Anything that can list parameters by index, such as an [`EventTable`]
pub trait ParameterSource {
    /// Number of parameters
    fn parameter_count(&self) -> usize;

    /// Short name of the parameter at `index`
    fn short_name(&self, index: usize) -> &str;

    /// Long name of the parameter at `index`, or `""`
    fn long_name(&self, index: usize) -> &str;
}

impl ParameterSource for EventTable {
    fn parameter_count(&self) -> usize {
        self.number_of_parameters()
    }

    fn short_name(&self, index: usize) -> &str {
        self.parameter(index).map(|p| p.short_name.as_str()).unwrap_or("")
    }

    fn long_name(&self, index: usize) -> &str {
        self.parameter(index).map(|p| p.long_name.as_str()).unwrap_or("")
    }
}
