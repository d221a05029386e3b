//! # Parameter Map
//!
//! A lookup table from parameter short name to a [`ParameterMapEntry`]
//! holding the parameter's long name, description, gating visibility and an
//! optional default [`Transform`]. The map is independent of any file format:
//! the JSON codec reads and writes it, and gating or plotting code consults it
//! to resolve display names and default transforms.
//!
//! ## Semantics
//!
//! - Short names are unique and non-empty.
//! - Field setters create a default entry the first time they address an
//!   unknown short name, then apply the field.
//! - `find_*` lookups never fail; an absent short name yields the field's
//!   default (`""` for strings, `true` for visibility, `None` for transforms).
//! - [`ParameterMap::copy_from`] and [`ParameterMap::copy_from_source`] merge
//!   new entries only and never replace an entry that already exists, except
//!   that `copy_from_source` applies non-empty long names.
//!
//! ## Example
//!
//! ```rust
//! use flowgate::parameter_map::ParameterMap;
//! use flowgate::transform::Transform;
//!
//! let mut map = ParameterMap::new();
//! map.set_long_name("FL1-A", "CD3 FITC")?;
//! map.set_default_transform("FL1-A", Some(Transform::logicle(262144.0, 0.0, 4.5, 0.5)))?;
//!
//! assert_eq!(map.find_long_name("FL1-A"), "CD3 FITC");
//! assert!(map.find_visible_for_gating("FL1-A"));
//! assert_eq!(map.find_long_name("FL2-A"), "");
//! # Ok::<(), flowgate::parameter_map::ParameterMapError>(())
//! ```

mod entry;
mod error;
mod source;


pub use entry::ParameterMapEntry;
pub use error::ParameterMapError;
pub use source::ParameterSource;

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::transform::Transform;

/// Short-name-keyed table of parameter annotations plus map-level metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap {
    entries: HashMap<String, ParameterMapEntry>,
    name: String,
    description: String,
    creator_software_name: String,
    file_name: String,
}

fn check_short_name(short_name: &str) -> Result<(), ParameterMapError> {
    if short_name.is_empty() {
        Err(ParameterMapError::EmptyShortName)
    } else {
        Ok(())
    }
}

impl ParameterMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Map name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the map name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Map description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Set the map description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Name of the software that created the map
    pub fn creator_software_name(&self) -> &str {
        &self.creator_software_name
    }

    /// Set the creator software name
    pub fn set_creator_software_name(&mut self, name: impl Into<String>) {
        self.creator_software_name = name.into();
    }

    /// Name of the file the map was loaded from or saved to
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Set the originating file name
    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
    }

    /// Add a new entry. Fails if the short name is empty or already present.
    pub fn add_parameter(&mut self, entry: ParameterMapEntry) -> Result<(), ParameterMapError> {
        check_short_name(&entry.short_name)?;
        match self.entries.entry(entry.short_name.clone()) {
            Entry::Occupied(_) => Err(ParameterMapError::DuplicateShortName(entry.short_name)),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    /// Insert or replace an entry
    pub fn set_parameter(&mut self, entry: ParameterMapEntry) -> Result<(), ParameterMapError> {
        check_short_name(&entry.short_name)?;
        self.entries.insert(entry.short_name.clone(), entry);
        Ok(())
    }

    /// The entry for a short name, created with defaults if absent
    pub fn entry_mut(
        &mut self,
        short_name: &str,
    ) -> Result<&mut ParameterMapEntry, ParameterMapError> {
        check_short_name(short_name)?;
        Ok(self
            .entries
            .entry(short_name.to_string())
            .or_insert_with(|| ParameterMapEntry::new(short_name)))
    }

    /// Set a long name, creating the entry if needed
    pub fn set_long_name(
        &mut self,
        short_name: &str,
        long_name: impl Into<String>,
    ) -> Result<(), ParameterMapError> {
        self.entry_mut(short_name)?.long_name = long_name.into();
        Ok(())
    }

    /// Set a description, creating the entry if needed
    pub fn set_parameter_description(
        &mut self,
        short_name: &str,
        description: impl Into<String>,
    ) -> Result<(), ParameterMapError> {
        self.entry_mut(short_name)?.description = description.into();
        Ok(())
    }

    /// Set gating visibility, creating the entry if needed
    pub fn set_visible_for_gating(
        &mut self,
        short_name: &str,
        visible: bool,
    ) -> Result<(), ParameterMapError> {
        self.entry_mut(short_name)?.visible_for_gating = visible;
        Ok(())
    }

    /// Set or clear the default transform, creating the entry if needed
    pub fn set_default_transform(
        &mut self,
        short_name: &str,
        transform: Option<Transform>,
    ) -> Result<(), ParameterMapError> {
        self.entry_mut(short_name)?.default_transform = transform;
        Ok(())
    }

    /// The entry for a short name
    pub fn get(&self, short_name: &str) -> Option<&ParameterMapEntry> {
        self.entries.get(short_name)
    }

    /// Long name, or `""` if the short name is absent
    pub fn find_long_name(&self, short_name: &str) -> &str {
        self.get(short_name).map(|e| e.long_name.as_str()).unwrap_or("")
    }

    /// Description, or `""` if the short name is absent
    pub fn find_description(&self, short_name: &str) -> &str {
        self.get(short_name).map(|e| e.description.as_str()).unwrap_or("")
    }

    /// Gating visibility, or `true` if the short name is absent
    pub fn find_visible_for_gating(&self, short_name: &str) -> bool {
        self.get(short_name).map(|e| e.visible_for_gating).unwrap_or(true)
    }

    /// Default transform, or `None` if absent or unset
    pub fn find_default_transform(&self, short_name: &str) -> Option<&Transform> {
        self.get(short_name).and_then(|e| e.default_transform.as_ref())
    }

    /// Long name if set, otherwise the short name itself
    pub fn display_name<'a>(&'a self, short_name: &'a str) -> &'a str {
        match self.find_long_name(short_name) {
            "" => short_name,
            long => long,
        }
    }

    /// True if the short name has an entry
    pub fn is_parameter(&self, short_name: &str) -> bool {
        self.entries.contains_key(short_name)
    }

    /// Number of entries
    pub fn number_of_parameters(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Short names in no particular order
    pub fn parameter_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Short names in sorted order
    pub fn sorted_parameter_names(&self) -> Vec<&str> {
        let mut names = self.parameter_names();
        names.sort_unstable();
        names
    }

    /// Iterate over entries in no particular order
    pub fn entries(&self) -> impl Iterator<Item = &ParameterMapEntry> {
        self.entries.values()
    }

    /// Remove an entry. Returns true if it was present.
    pub fn remove_parameter(&mut self, short_name: &str) -> bool {
        self.entries.remove(short_name).is_some()
    }

    /// Remove every entry. Map-level metadata is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merge in entries from another map whose short names are not yet present.
    /// Existing entries are left untouched. Returns the number added.
    pub fn copy_from(&mut self, other: &ParameterMap) -> usize {
        let mut added = 0;
        for (short_name, entry) in &other.entries {
            if let Entry::Vacant(slot) = self.entries.entry(short_name.clone()) {
                slot.insert(entry.clone());
                added += 1;
            }
        }
        added
    }

    /// Merge in the parameters of an event table or other source.
    ///
    /// Unknown short names get a default entry carrying the source's long
    /// name. For known short names only the long name is touched, and only
    /// when the source provides a non-empty one. Returns the number added.
    pub fn copy_from_source<S: ParameterSource + ?Sized>(&mut self, source: &S) -> usize {
        let mut added = 0;
        for index in 0..source.parameter_count() {
            let short_name = source.short_name(index);
            if short_name.is_empty() {
                continue;
            }
            let long_name = source.long_name(index);
            match self.entries.entry(short_name.to_string()) {
                Entry::Vacant(slot) => {
                    let mut entry = ParameterMapEntry::new(short_name);
                    entry.long_name = long_name.to_string();
                    slot.insert(entry);
                    added += 1;
                }
                Entry::Occupied(mut slot) => {
                    if !long_name.is_empty() {
                        slot.get_mut().long_name = long_name.to_string();
                    }
                }
            }
        }
        added
    }
}
