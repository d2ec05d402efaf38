//! Four-character codes.
//!
//! Object type IDs, state and message IDs, and a handful of legacy property
//! IDs are four ASCII characters packed big-endian into a `u32`.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A four-character code such as `ACTR` or `XFRM`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FourCC(u32);

impl FourCC {
    /// Create a FourCC from its four bytes (first character first).
    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    /// Create a FourCC from a raw `u32`.
    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        Self(value)
    }

    /// Get the packed value.
    #[inline]
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// Get the four bytes, first character first.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Whether every byte is a printable ASCII character.
    pub fn is_printable(&self) -> bool {
        self.to_bytes().iter().all(|b| b.is_ascii_graphic() || *b == b' ')
    }
}

impl From<u32> for FourCC {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<FourCC> for u32 {
    fn from(value: FourCC) -> Self {
        value.0
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({})", self)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_printable() {
            for b in self.to_bytes() {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "0x{:08X}", self.0)
        }
    }
}

impl FromStr for FourCC {
    type Err = Error;

    /// Parses either four ASCII characters (`ACTR`) or a hex value (`0x41435452`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return u32::from_str_radix(hex, 16)
                .map(Self)
                .map_err(|_| Error::InvalidFourCC(s.to_string()));
        }

        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii()) {
            return Err(Error::InvalidFourCC(s.to_string()));
        }

        Ok(Self::from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FourCC {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FourCC {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packing_is_big_endian() {
        let code = FourCC::from_bytes(*b"XFRM");
        assert_eq!(code.to_u32(), 0x5846_524D);
        assert_eq!(code.to_string(), "XFRM");
    }

    #[test]
    fn test_parse() {
        let code: FourCC = "ACTV".parse().unwrap();
        assert_eq!(code, FourCC::from_bytes(*b"ACTV"));

        let hex: FourCC = "0x41435456".parse().unwrap();
        assert_eq!(hex, code);
    }

    #[test]
    fn test_invalid_length() {
        assert!("ACT".parse::<FourCC>().is_err());
        assert!("ACTOR".parse::<FourCC>().is_err());
    }

    #[test]
    fn test_unprintable_displays_as_hex() {
        assert_eq!(FourCC::from_u32(0x0000_0041).to_string(), "0x00000041");
    }
}
