//! Big-endian cursor over cooked property data.

use byteorder::{BigEndian, ByteOrder};

use crate::{Error, Result};

/// A big-endian reader over a byte slice.
///
/// ```
/// use reliquary_common::BinaryReader;
///
/// let data = [0x00, 0x00, 0x00, 0x2A, 0x00, 0x07];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 42);
/// assert_eq!(reader.read_u16().unwrap(), 7);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

macro_rules! read_be {
    ($($name:ident => $ty:ty, $read:path;)*) => {
        $(
            #[inline]
            pub fn $name(&mut self) -> Result<$ty> {
                self.read_bytes(std::mem::size_of::<$ty>()).map($read)
            }
        )*
    };
}

impl<'a> BinaryReader<'a> {
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the cursor.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take the next `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if available < count {
            return Err(Error::UnexpectedEof { needed: count, available });
        }
        let start = self.position;
        self.position += count;
        Ok(&self.data[start..self.position])
    }

    /// Step over `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_u8().map(|b| b as i8)
    }

    /// Any non-zero byte is true.
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|b| b != 0)
    }

    read_be! {
        read_u16 => u16, BigEndian::read_u16;
        read_i16 => i16, BigEndian::read_i16;
        read_u32 => u32, BigEndian::read_u32;
        read_i32 => i32, BigEndian::read_i32;
        read_u64 => u64, BigEndian::read_u64;
        read_f32 => f32, BigEndian::read_f32;
    }

    /// NUL-terminated UTF-8 text. The terminator is consumed.
    pub fn read_cstring(&mut self) -> Result<&'a str> {
        let rest = &self.data[self.position.min(self.data.len())..];
        let len = rest.iter().position(|&b| b == 0).ok_or(Error::MissingNullTerminator)?;
        self.position += len + 1;
        std::str::from_utf8(&rest[..len]).map_err(Error::Utf8)
    }
}
