//! Text conversion for archived values.

use reliquary_common::{FourCC, Game};

use crate::SerialFlags;

/// A value that can be stored as a text parameter.
pub trait ArchiveValue: Sized {
    /// Render the value for writing.
    fn to_archive_string(&self, flags: SerialFlags) -> String;

    /// Parse the value while reading. Returns `None` on malformed text.
    fn from_archive_str(text: &str, flags: SerialFlags) -> Option<Self>;
}

/// Parse an unsigned integer that may carry a `0x` prefix.
pub(crate) fn parse_unsigned(text: &str) -> Option<u64> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

macro_rules! impl_integer {
    ($ty:ty, $unsigned:ty, $width:expr) => {
        impl ArchiveValue for $ty {
            fn to_archive_string(&self, flags: SerialFlags) -> String {
                if flags.contains(SerialFlags::HEX_DISPLAY) {
                    format!("0x{:0width$X}", *self as $unsigned, width = $width)
                } else {
                    self.to_string()
                }
            }

            fn from_archive_str(text: &str, _flags: SerialFlags) -> Option<Self> {
                let trimmed = text.trim();
                if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
                    // Hex text is the raw bit pattern, so reinterpret rather than range-check.
                    parse_unsigned(trimmed)
                        .and_then(|v| <$unsigned>::try_from(v).ok())
                        .map(|v| v as $ty)
                } else {
                    trimmed.parse().ok()
                }
            }
        }
    };
}

impl_integer!(i8, u8, 2);
impl_integer!(i16, u16, 4);
impl_integer!(i32, u32, 8);
impl_integer!(u32, u32, 8);
impl_integer!(u64, u64, 16);

impl ArchiveValue for bool {
    fn to_archive_string(&self, _flags: SerialFlags) -> String {
        let text = if *self { "true" } else { "false" };
        text.to_string()
    }

    fn from_archive_str(text: &str, _flags: SerialFlags) -> Option<Self> {
        match text.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ArchiveValue for f32 {
    fn to_archive_string(&self, _flags: SerialFlags) -> String {
        self.to_string()
    }

    fn from_archive_str(text: &str, _flags: SerialFlags) -> Option<Self> {
        text.trim().parse().ok()
    }
}

impl ArchiveValue for String {
    fn to_archive_string(&self, _flags: SerialFlags) -> String {
        self.clone()
    }

    fn from_archive_str(text: &str, _flags: SerialFlags) -> Option<Self> {
        Some(text.to_string())
    }
}

impl ArchiveValue for FourCC {
    fn to_archive_string(&self, flags: SerialFlags) -> String {
        if flags.contains(SerialFlags::HEX_DISPLAY) || !self.is_printable() {
            format!("0x{:08X}", self.to_u32())
        } else {
            self.to_string()
        }
    }

    fn from_archive_str(text: &str, _flags: SerialFlags) -> Option<Self> {
        text.trim().parse().ok()
    }
}

impl ArchiveValue for Game {
    fn to_archive_string(&self, _flags: SerialFlags) -> String {
        self.as_str().to_string()
    }

    fn from_archive_str(text: &str, _flags: SerialFlags) -> Option<Self> {
        text.trim().parse().ok()
    }
}
