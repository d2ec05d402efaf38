//! Colon-separated property ID paths, e.g. `0x1A2B3C4D:08:FF`.

use std::fmt::Write;

use reliquary_common::INVALID_ID;

use super::{PropertyArena, PropertyId};
use crate::{Error, Result};

/// Parse an ID string into its segments.
///
/// Grammar: `Path := Segment (':' Segment)*` where a segment is an optional
/// `0x` prefix followed by exactly 8 or 2 hex digits.
pub fn parse_id_string(text: &str) -> Result<Vec<u32>> {
    if text.len() < 4 {
        return Err(Error::MalformedIdString(text.to_string()));
    }

    let mut parser = IdStringParser { text, pos: 0 };
    let mut ids = vec![parser.segment()?];

    while parser.eat(':') {
        ids.push(parser.segment()?);
    }

    if parser.pos != text.len() {
        return Err(parser.error());
    }
    Ok(ids)
}

/// Render IDs as an ID string. IDs up to `0xFF` use two digits.
pub fn format_id_string(ids: &[u32]) -> String {
    let mut out = String::new();
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push(':');
        }
        let _ = if *id <= 0xFF {
            write!(out, "{:02X}", id)
        } else {
            write!(out, "0x{:08X}", id)
        };
    }
    out
}

struct IdStringParser<'a> {
    text: &'a str,
    pos: usize,
}

impl IdStringParser<'_> {
    fn error(&self) -> Error {
        Error::MalformedIdString(self.text.to_string())
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn eat(&mut self, c: char) -> bool {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn segment(&mut self) -> Result<u32> {
        if self.rest().starts_with("0x") || self.rest().starts_with("0X") {
            self.pos += 2;
        }

        let digits = self
            .rest()
            .bytes()
            .take_while(u8::is_ascii_hexdigit)
            .count();
        if digits != 8 && digits != 2 {
            return Err(self.error());
        }

        let hex = &self.rest()[..digits];
        let id = u32::from_str_radix(hex, 16).map_err(|_| self.error())?;
        self.pos += digits;
        Ok(id)
    }
}

impl PropertyArena {
    /// Resolve an ID string relative to `id`, descending one child per
    /// segment.
    ///
    /// Returns `Ok(None)` when a segment is the sentinel ID or names a
    /// child that does not exist.
    pub fn child_by_id_string(&self, id: PropertyId, text: &str) -> Result<Option<PropertyId>> {
        let mut current = id;

        for segment in parse_id_string(text)? {
            if segment == INVALID_ID {
                return Ok(None);
            }
            match self.child_by_id(current, segment) {
                Some(child) => current = child,
                None => return Ok(None),
            }
        }

        Ok(Some(current))
    }

    /// ID string of the node relative to its root.
    pub fn id_string(&self, id: PropertyId) -> String {
        let mut ids: Vec<u32> = self
            .ancestors(id)
            .filter(|&a| self.parent(a).is_some())
            .map(|a| self.node(a).id)
            .collect();
        ids.reverse();
        format_id_string(&ids)
    }
}
