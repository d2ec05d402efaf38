//! Property data records.
//!
//! A record is a flat little-endian byte block laid out by the property
//! offsets of a template, plus side tables for values that do not fit in a
//! fixed slot: strings, opaque byte blobs, pointed-to records and array
//! elements. Side table entries are keyed by the offset of the owning slot.

use std::collections::BTreeMap;

use byteorder::{ByteOrder, LittleEndian};

/// A block of property values for one object instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyData {
    bytes: Vec<u8>,
    strings: BTreeMap<u32, String>,
    blobs: BTreeMap<u32, Vec<u8>>,
    objects: BTreeMap<u32, PropertyData>,
    arrays: BTreeMap<u32, Vec<PropertyData>>,
}

impl PropertyData {
    /// Create a zero-filled record of `size` bytes.
    pub fn new(size: u32) -> Self {
        Self {
            bytes: vec![0; size as usize],
            ..Self::default()
        }
    }

    /// Size of the fixed part of the record.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The fixed part of the record.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Borrow `len` bytes at `offset`, if in range.
    pub fn slot(&self, offset: u32, len: usize) -> Option<&[u8]> {
        let start = offset as usize;
        self.bytes.get(start..start.checked_add(len)?)
    }

    /// Mutably borrow `len` bytes at `offset`, if in range.
    pub fn slot_mut(&mut self, offset: u32, len: usize) -> Option<&mut [u8]> {
        let start = offset as usize;
        self.bytes.get_mut(start..start.checked_add(len)?)
    }

    pub fn read_u8(&self, offset: u32) -> Option<u8> {
        self.slot(offset, 1).map(|b| b[0])
    }

    pub fn read_u16(&self, offset: u32) -> Option<u16> {
        self.slot(offset, 2).map(LittleEndian::read_u16)
    }

    pub fn read_u32(&self, offset: u32) -> Option<u32> {
        self.slot(offset, 4).map(LittleEndian::read_u32)
    }

    pub fn read_u64(&self, offset: u32) -> Option<u64> {
        self.slot(offset, 8).map(LittleEndian::read_u64)
    }

    pub fn read_f32(&self, offset: u32) -> Option<f32> {
        self.slot(offset, 4).map(LittleEndian::read_f32)
    }

    /// Write a byte. Returns `false` when out of range.
    pub fn write_u8(&mut self, offset: u32, value: u8) -> bool {
        self.slot_mut(offset, 1).map(|b| b[0] = value).is_some()
    }

    pub fn write_u16(&mut self, offset: u32, value: u16) -> bool {
        self.slot_mut(offset, 2)
            .map(|b| LittleEndian::write_u16(b, value))
            .is_some()
    }

    pub fn write_u32(&mut self, offset: u32, value: u32) -> bool {
        self.slot_mut(offset, 4)
            .map(|b| LittleEndian::write_u32(b, value))
            .is_some()
    }

    pub fn write_u64(&mut self, offset: u32, value: u64) -> bool {
        self.slot_mut(offset, 8)
            .map(|b| LittleEndian::write_u64(b, value))
            .is_some()
    }

    pub fn write_f32(&mut self, offset: u32, value: f32) -> bool {
        self.slot_mut(offset, 4)
            .map(|b| LittleEndian::write_f32(b, value))
            .is_some()
    }

    /// String stored for the slot at `offset`.
    pub fn string(&self, offset: u32) -> Option<&str> {
        self.strings.get(&offset).map(String::as_str)
    }

    pub fn set_string(&mut self, offset: u32, value: String) {
        self.strings.insert(offset, value);
    }

    /// Opaque bytes stored for the slot at `offset`.
    pub fn blob(&self, offset: u32) -> Option<&[u8]> {
        self.blobs.get(&offset).map(Vec::as_slice)
    }

    pub fn set_blob(&mut self, offset: u32, value: Vec<u8>) {
        self.blobs.insert(offset, value);
    }

    /// Record pointed to by the pointer slot at `offset`.
    pub fn object(&self, offset: u32) -> Option<&PropertyData> {
        self.objects.get(&offset)
    }

    /// Record pointed to by the pointer slot at `offset`, allocating a
    /// zeroed record of `size` bytes if the pointer is null.
    pub fn object_or_insert(&mut self, offset: u32, size: u32) -> &mut PropertyData {
        self.objects
            .entry(offset)
            .or_insert_with(|| PropertyData::new(size))
    }

    /// Null the pointer slot at `offset`, returning the record it held.
    pub fn take_object(&mut self, offset: u32) -> Option<PropertyData> {
        self.objects.remove(&offset)
    }

    /// Element records of the array slot at `offset`.
    pub fn array(&self, offset: u32) -> Option<&[PropertyData]> {
        self.arrays.get(&offset).map(Vec::as_slice)
    }

    /// Mutable element records of the array slot at `offset`, creating an
    /// empty array if none exists.
    pub fn array_mut(&mut self, offset: u32) -> &mut Vec<PropertyData> {
        self.arrays.entry(offset).or_default()
    }
}
