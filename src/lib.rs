//! # FlowGate - Flow Cytometry Event and Parameter-Map Codecs
//!
//! `flowgate` reads and writes the two file formats FlowGate tools exchange:
//!
//! - **Binary event files** (`.fgb`): a fixed-width ASCII header followed by
//!   one binary column of single- or double-precision values per parameter.
//!
//! - **JSON parameter maps** (`.json`, `.map`): per-channel annotations (long
//!   name, description, gating visibility and an optional default transform)
//!   keyed by the channel's short name.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowgate::binary::BinaryEventCodec;
//! use flowgate::json::JsonParameterMapCodec;
//! use flowgate::parameter_map::ParameterMap;
//!
//! // Load the first 10 000 events
//! let mut events = BinaryEventCodec::new();
//! let table = events.load("cells.fgb", Some(10_000))?;
//!
//! // Build a parameter map from the event file's channel names
//! let mut map = ParameterMap::new();
//! map.copy_from_source(&*table.borrow());
//! map.set_visible_for_gating("Time", false)?;
//!
//! let mut codec = JsonParameterMapCodec::with_map(&map);
//! codec.save("cells.json")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Diagnostics
//!
//! Every codec keeps a [`FileLog`](diagnostics::FileLog) and a
//! [`FileAttributes`](diagnostics::FileAttributes) map. Both are reset at the
//! start of each load or save. A failed operation returns a short
//! [`CodecError`](error::CodecError) summary; the full detail is in the log.
//!
//! ```rust
//! use flowgate::json::JsonParameterMapCodec;
//!
//! let mut codec = JsonParameterMapCodec::new();
//! let err = codec.load_from_text(r#"{"version": 2}"#).unwrap_err();
//! println!("{}", err);               // Malformed file: invalid version
//! print!("{}", codec.file_log());    // ERROR: The "version" key is a number; ...
//! ```
//!
//! ## Architecture
//!
//! - [`binary`]: binary event codec (header, columns, byte order)
//! - [`json`]: JSON parameter-map codec
//! - [`parameter_map`]: short-name-keyed parameter annotation store
//! - [`event_table`]: column-major event storage
//! - [`transform`]: parameterized display transforms
//! - [`diagnostics`]: per-operation log and file attributes
//! - [`format`]: file-format selection by extension
//! - [`error`]: the error type shared by both codecs

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod binary;
pub mod diagnostics;
pub mod error;
pub mod event_table;
pub mod format;
pub mod json;
pub mod parameter_map;
pub mod transform;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::binary::{BinaryCodecConfig, BinaryEventCodec, ByteOrder, SharedEventTable};
    pub use crate::diagnostics::{FileAttributes, FileLog, LogCategory, LogEntry};
    pub use crate::error::{CodecError, ErrorCategory};
    pub use crate::event_table::{EventTable, EventTableError, NumberFormat, ParameterInfo};
    pub use crate::format::FileFormat;
    pub use crate::json::{JsonParameterMapCodec, SharedParameterMap};
    pub use crate::parameter_map::{
        ParameterMap, ParameterMapEntry, ParameterMapError, ParameterSource,
    };
    pub use crate::transform::{Transform, TransformError, TransformFunction, TransformKind};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
