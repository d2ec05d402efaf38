//! The archive contract.

use bitflags::bitflags;
use reliquary_common::Game;

use crate::{ArchiveValue, Error, Result};

/// Archive format version written by this crate.
pub const CURRENT_ARCHIVE_VERSION: u32 = 1;

bitflags! {
    /// Per-parameter serialization hints.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SerialFlags: u32 {
        /// Store the parameter as an attribute of the enclosing element.
        const ATTRIBUTE = 0x1;
        /// The parameter may be omitted when it equals its default.
        const OPTIONAL = 0x2;
        /// Render integers as `0x`-prefixed hexadecimal.
        const HEX_DISPLAY = 0x4;
    }
}

/// A bidirectional stream of named parameters.
///
/// Serialization routines are written once against this trait and run in
/// either direction: readers fill values in, writers record them.
pub trait Archive {
    /// Whether this archive reads values into the caller.
    fn is_reader(&self) -> bool;

    /// Whether this archive records values from the caller.
    #[inline]
    fn is_writer(&self) -> bool {
        !self.is_reader()
    }

    /// Game the archived data targets.
    fn game(&self) -> Game;

    /// Format version of the archive.
    fn archive_version(&self) -> u32;

    /// Whether parameters equal to their default may be left out.
    fn can_skip_parameters(&self) -> bool;

    /// Enter a nested parameter.
    ///
    /// Readers enter the next unvisited parameter with this name and return
    /// `false` (without entering) when there is none. Writers always enter.
    fn begin_param(&mut self, name: &str, flags: SerialFlags) -> Result<bool>;

    /// Leave the parameter entered by the matching [`Archive::begin_param`].
    fn end_param(&mut self) -> Result<()>;

    /// Serialize a leaf value as text.
    ///
    /// Readers return `false` and leave `value` untouched when the parameter
    /// is absent.
    fn text(&mut self, name: &str, value: &mut String, flags: SerialFlags) -> Result<bool>;

    /// Number of nested parameters with this name in the current scope.
    ///
    /// Always zero for writers.
    fn child_count(&self, name: &str) -> usize;

    /// Serialize a typed leaf value with an optional default.
    ///
    /// Writers omit the parameter when it is [`SerialFlags::OPTIONAL`], the
    /// archive can skip parameters, and the value equals `default`. Readers
    /// apply `default` when the parameter is absent.
    fn param<T>(&mut self, name: &str, value: &mut T, flags: SerialFlags, default: Option<T>) -> Result<()>
    where
        Self: Sized,
        T: ArchiveValue + PartialEq,
    {
        if self.is_writer() {
            if flags.contains(SerialFlags::OPTIONAL)
                && self.can_skip_parameters()
                && default.as_ref() == Some(&*value)
            {
                return Ok(());
            }

            let mut text = value.to_archive_string(flags);
            self.text(name, &mut text, flags)?;
        } else {
            let mut text = String::new();

            if self.text(name, &mut text, flags)? {
                *value = T::from_archive_str(&text, flags).ok_or_else(|| Error::InvalidValue {
                    param: name.to_string(),
                    value: text,
                })?;
            } else if let Some(default) = default {
                *value = default;
            }
        }

        Ok(())
    }

    /// Serialize a typed leaf value that must be present when reading.
    fn required<T>(&mut self, name: &str, value: &mut T, flags: SerialFlags) -> Result<()>
    where
        Self: Sized,
        T: ArchiveValue + PartialEq,
    {
        if self.is_reader() {
            let mut text = String::new();
            if !self.text(name, &mut text, flags)? {
                return Err(Error::MissingParameter(name.to_string()));
            }
            *value = T::from_archive_str(&text, flags).ok_or_else(|| Error::InvalidValue {
                param: name.to_string(),
                value: text,
            })?;
            Ok(())
        } else {
            self.param(name, value, flags, None)
        }
    }

    /// Serialize a list of values, each in its own `Element` parameter.
    ///
    /// `item` runs once per element; readers receive a default-constructed
    /// item to fill. The item routine may return any error that archive
    /// errors convert into.
    fn list<T, E, F>(&mut self, name: &str, items: &mut Vec<T>, mut item: F) -> std::result::Result<(), E>
    where
        Self: Sized,
        T: Default,
        E: From<Error>,
        F: FnMut(&mut Self, &mut T) -> std::result::Result<(), E>,
    {
        if !self.begin_param(name, SerialFlags::empty())? {
            return Ok(());
        }

        if self.is_reader() {
            let count = self.child_count("Element");
            items.clear();
            items.reserve(count);

            while self.begin_param("Element", SerialFlags::empty())? {
                let mut value = T::default();
                item(self, &mut value)?;
                items.push(value);
                self.end_param()?;
            }
        } else {
            for value in items.iter_mut() {
                self.begin_param("Element", SerialFlags::empty())?;
                item(self, value)?;
                self.end_param()?;
            }
        }

        self.end_param()?;
        Ok(())
    }
}
