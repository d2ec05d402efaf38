//! XML output archive.

use std::path::Path;

use reliquary_common::Game;

use crate::{Archive, ArchiveValue, Error, Result, SerialFlags, XmlElement, CURRENT_ARCHIVE_VERSION};

/// Records named parameters into an XML element tree.
///
/// Leaf parameters flagged [`SerialFlags::ATTRIBUTE`] become attributes of
/// the current element; everything else becomes a child element.
pub struct XmlWriter {
    stack: Vec<XmlElement>,
    game: Game,
    skip_parameters: bool,
}

impl XmlWriter {
    /// Start a document with the given root tag.
    ///
    /// The root carries `Game` and `ArchiveVer` attributes so the file can
    /// be read back for the same target.
    pub fn new(root_name: &str, game: Game) -> Self {
        let root = XmlElement::new(root_name)
            .attr("Game", game.to_archive_string(SerialFlags::empty()))
            .attr("ArchiveVer", CURRENT_ARCHIVE_VERSION.to_string());

        Self {
            stack: vec![root],
            game,
            skip_parameters: true,
        }
    }

    /// Start a document whose root carries no header attributes.
    pub fn bare(root_name: &str, game: Game) -> Self {
        Self {
            stack: vec![XmlElement::new(root_name)],
            game,
            skip_parameters: true,
        }
    }

    /// Control whether parameters equal to their default are omitted.
    pub fn with_skip_parameters(mut self, skip: bool) -> Self {
        self.skip_parameters = skip;
        self
    }

    /// The finished element tree.
    pub fn to_element(&self) -> Result<XmlElement> {
        match self.stack.as_slice() {
            [root] => Ok(root.clone()),
            _ => Err(Error::UnbalancedScope),
        }
    }

    /// Consume the writer and return its element tree.
    pub fn into_element(mut self) -> Result<XmlElement> {
        if self.stack.len() != 1 {
            return Err(Error::UnbalancedScope);
        }
        self.stack.pop().ok_or(Error::UnbalancedScope)
    }

    /// Render the document as indented XML text.
    pub fn to_xml_string(&self) -> Result<String> {
        self.to_element()?.to_xml_string()
    }

    /// Render the document and write it to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let xml = self.to_xml_string()?;
        std::fs::write(path, xml)?;
        Ok(())
    }

    fn top(&mut self) -> Result<&mut XmlElement> {
        self.stack.last_mut().ok_or(Error::UnbalancedScope)
    }
}

impl Archive for XmlWriter {
    #[inline]
    fn is_reader(&self) -> bool {
        false
    }

    fn game(&self) -> Game {
        self.game
    }

    fn archive_version(&self) -> u32 {
        CURRENT_ARCHIVE_VERSION
    }

    fn can_skip_parameters(&self) -> bool {
        self.skip_parameters
    }

    fn begin_param(&mut self, name: &str, _flags: SerialFlags) -> Result<bool> {
        self.stack.push(XmlElement::new(name));
        Ok(true)
    }

    fn end_param(&mut self) -> Result<()> {
        if self.stack.len() <= 1 {
            return Err(Error::UnbalancedScope);
        }
        let element = self.stack.pop().ok_or(Error::UnbalancedScope)?;
        self.top()?.children.push(element);
        Ok(())
    }

    fn text(&mut self, name: &str, value: &mut String, flags: SerialFlags) -> Result<bool> {
        let top = self.top()?;

        if flags.contains(SerialFlags::ATTRIBUTE) {
            top.set_attribute(name, value.as_str());
        } else {
            top.children.push(XmlElement::new(name).with_text(value.as_str()));
        }

        Ok(true)
    }

    fn child_count(&self, _name: &str) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XmlReader;

    #[test]
    fn test_header_attributes() {
        let writer = XmlWriter::new("PropertyArchetype", Game::Corruption);
        let root = writer.to_element().unwrap();

        assert_eq!(root.attribute("Game"), Some("Corruption"));
        assert_eq!(root.attribute("ArchiveVer"), Some("1"));
        assert!(XmlWriter::bare("PropertyMap", Game::Prime)
            .to_element()
            .unwrap()
            .attributes
            .is_empty());
    }

    #[test]
    fn test_optional_defaults_skipped() {
        let mut writer = XmlWriter::new("Property", Game::Echoes);
        writer.param("Cook", &mut false, SerialFlags::OPTIONAL, Some(false)).unwrap();
        writer.param("Name", &mut "Speed".to_string(), SerialFlags::OPTIONAL, Some(String::new())).unwrap();
        let root = writer.to_element().unwrap();

        assert!(root.find_child("Cook").is_none());
        assert_eq!(root.find_child("Name").unwrap().text, "Speed");

        let mut writer = XmlWriter::new("Property", Game::Echoes).with_skip_parameters(false);
        writer.param("Cook", &mut false, SerialFlags::OPTIONAL, Some(false)).unwrap();
        assert!(writer.to_element().unwrap().find_child("Cook").is_some());
    }

    #[test]
    fn test_nested_scopes() {
        let mut writer = XmlWriter::new("ScriptObject", Game::Echoes);
        let mut states = vec![String::from("ACTV"), String::from("DEAD")];

        writer
            .list("States", &mut states, |arc, state| {
                arc.param("ID", state, SerialFlags::ATTRIBUTE, None)
            })
            .unwrap();

        // Scope still open: the document is not finished.
        writer.begin_param("Properties", SerialFlags::empty()).unwrap();
        assert!(matches!(writer.to_element(), Err(Error::UnbalancedScope)));
        writer.end_param().unwrap();

        let xml = writer.to_xml_string().unwrap();
        let mut reader = XmlReader::parse(&xml).unwrap();
        let mut read_back: Vec<String> = Vec::new();
        reader
            .list("States", &mut read_back, |arc, state| {
                arc.required("ID", state, SerialFlags::ATTRIBUTE)
            })
            .unwrap();

        assert_eq!(read_back, states);
    }

    #[test]
    fn test_unbalanced_end() {
        let mut writer = XmlWriter::new("Root", Game::Prime);
        assert!(matches!(writer.end_param(), Err(Error::UnbalancedScope)));
    }
}
