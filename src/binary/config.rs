use std::fmt;

/// Byte order of the binary columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first (little-endian)
    Lsbf,
    /// Most significant byte first (big-endian)
    Msbf,
}

impl ByteOrder {
    /// Byte order of the host
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Msbf
        } else {
            ByteOrder::Lsbf
        }
    }

    /// Name used in binary headers
    pub fn as_str(&self) -> &'static str {
        match self {
            ByteOrder::Lsbf => "lsbf",
            ByteOrder::Msbf => "msbf",
        }
    }

    /// Parse a header name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lsbf" => Some(ByteOrder::Lsbf),
            "msbf" => Some(ByteOrder::Msbf),
            _ => None,
        }
    }

    /// True if this is the host's byte order
    pub fn is_native(&self) -> bool {
        *self == Self::native()
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the binary event codec
#[derive(Debug, Clone, Default)]
pub struct BinaryCodecConfig {
    /// Byte order used when saving. Loading always follows the file header.
    /// Default: the host's native order
    pub byte_order: ByteOrder,
}

impl BinaryCodecConfig {
    /// Configuration that saves in the given byte order
    pub fn with_byte_order(byte_order: ByteOrder) -> Self {
        Self { byte_order }
    }
}
