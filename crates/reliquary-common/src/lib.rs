//! Common utilities for Reliquary.
//!
//! This crate provides foundational types and utilities used across all Reliquary crates:
//!
//! - [`BinaryReader`] - Big-endian reading from byte slices (cooked game data)
//! - [`FourCC`] - Four-character codes used as object and property IDs
//! - [`Game`] - Supported game versions, ordered by release
//! - [`crc`] - CRC32 property ID hashing

mod error;
mod fourcc;
mod game;
mod reader;

pub mod crc;

pub use error::{Error, Result};
pub use fourcc::FourCC;
pub use game::Game;
pub use reader::BinaryReader;

/// Sentinel ID meaning "no ID" (root properties, array items).
pub const INVALID_ID: u32 = 0xFFFF_FFFF;
