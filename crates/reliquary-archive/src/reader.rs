//! XML input archive.

use std::path::Path;

use reliquary_common::Game;

use crate::{Archive, ArchiveValue, Error, Result, SerialFlags, XmlElement, CURRENT_ARCHIVE_VERSION};

struct Frame {
    /// Index of this element in its parent's child list.
    index: usize,
    /// Which children of this element have already been entered.
    consumed: Vec<bool>,
}

/// Reads named parameters from a parsed XML document.
///
/// Parameters are matched by tag name in document order. A leaf parameter
/// is looked up as an attribute of the current element first and then as a
/// child element, so files written by hand with either layout are accepted.
pub struct XmlReader {
    root: XmlElement,
    game: Game,
    version: u32,
    stack: Vec<Frame>,
}

impl XmlReader {
    /// Parse an XML document and position the reader on its root element.
    ///
    /// The `Game` and `ArchiveVer` attributes of the root are picked up when
    /// present.
    pub fn parse(xml: &str) -> Result<Self> {
        Ok(Self::from_element(XmlElement::parse(xml)?))
    }

    /// Read and parse an XML file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    /// Wrap an already parsed element tree.
    pub fn from_element(root: XmlElement) -> Self {
        let game = root
            .attribute("Game")
            .and_then(|g| Game::from_archive_str(g, SerialFlags::empty()))
            .unwrap_or(Game::Prime);
        let version = root
            .attribute("ArchiveVer")
            .and_then(|v| u32::from_archive_str(v, SerialFlags::empty()))
            .unwrap_or(CURRENT_ARCHIVE_VERSION);
        let consumed = vec![false; root.children.len()];

        Self {
            root,
            game,
            version,
            stack: vec![Frame { index: 0, consumed }],
        }
    }

    /// Override the game the document is interpreted for.
    pub fn with_game(mut self, game: Game) -> Self {
        self.game = game;
        self
    }

    /// Tag name of the root element.
    pub fn root_name(&self) -> &str {
        &self.root.tag
    }

    /// The element the reader is currently positioned in.
    pub fn current(&self) -> &XmlElement {
        self.stack[1..]
            .iter()
            .fold(&self.root, |element, frame| &element.children[frame.index])
    }

    fn next_unvisited(&self, name: &str) -> Option<usize> {
        let frame = self.stack.last()?;
        self.current()
            .children
            .iter()
            .enumerate()
            .position(|(i, child)| child.tag == name && !frame.consumed[i])
    }
}

impl Archive for XmlReader {
    #[inline]
    fn is_reader(&self) -> bool {
        true
    }

    fn game(&self) -> Game {
        self.game
    }

    fn archive_version(&self) -> u32 {
        self.version
    }

    fn can_skip_parameters(&self) -> bool {
        true
    }

    fn begin_param(&mut self, name: &str, _flags: SerialFlags) -> Result<bool> {
        let Some(index) = self.next_unvisited(name) else {
            return Ok(false);
        };

        if let Some(frame) = self.stack.last_mut() {
            frame.consumed[index] = true;
        }

        let child_count = self.current().children[index].children.len();
        self.stack.push(Frame {
            index,
            consumed: vec![false; child_count],
        });

        Ok(true)
    }

    fn end_param(&mut self) -> Result<()> {
        if self.stack.len() <= 1 {
            return Err(Error::UnbalancedScope);
        }
        self.stack.pop();
        Ok(())
    }

    fn text(&mut self, name: &str, value: &mut String, _flags: SerialFlags) -> Result<bool> {
        if let Some(attr) = self.current().attribute(name) {
            *value = attr.to_string();
            return Ok(true);
        }

        let Some(index) = self.next_unvisited(name) else {
            return Ok(false);
        };

        if let Some(frame) = self.stack.last_mut() {
            frame.consumed[index] = true;
        }
        *value = self.current().children[index].text.clone();

        Ok(true)
    }

    fn child_count(&self, name: &str) -> usize {
        self.current()
            .children
            .iter()
            .filter(|child| child.tag == name)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ScriptObject Game="Echoes" ArchiveVer="1">
    <Name>Door</Name>
    <States>
        <Element ID="ACTV"/>
        <Element ID="DEAD"/>
    </States>
    <Modules><Element Name="Flag"/></Modules>
</ScriptObject>"#;

    #[test]
    fn test_root_attributes() {
        let reader = XmlReader::parse(XML).unwrap();
        assert_eq!(reader.root_name(), "ScriptObject");
        assert_eq!(reader.game(), Game::Echoes);
        assert_eq!(reader.archive_version(), 1);

        let reader = XmlReader::parse("<Root/>").unwrap().with_game(Game::Corruption);
        assert_eq!(reader.game(), Game::Corruption);
    }

    #[test]
    fn test_nested_elements_in_order() {
        let mut reader = XmlReader::parse(XML).unwrap();

        let mut name = String::new();
        reader.required("Name", &mut name, SerialFlags::empty()).unwrap();
        assert_eq!(name, "Door");

        assert!(reader.begin_param("States", SerialFlags::empty()).unwrap());
        assert_eq!(reader.child_count("Element"), 2);

        let mut ids = Vec::new();
        while reader.begin_param("Element", SerialFlags::empty()).unwrap() {
            let mut id = String::new();
            reader.text("ID", &mut id, SerialFlags::ATTRIBUTE).unwrap();
            ids.push(id);
            reader.end_param().unwrap();
        }
        reader.end_param().unwrap();

        assert_eq!(ids, ["ACTV", "DEAD"]);
    }

    #[test]
    fn test_list_of_attributes() {
        let mut reader = XmlReader::parse(XML).unwrap();
        let mut modules: Vec<String> = Vec::new();

        reader
            .list("Modules", &mut modules, |arc, module| {
                arc.required("Name", module, SerialFlags::ATTRIBUTE)
            })
            .unwrap();

        assert_eq!(modules, ["Flag"]);
    }

    #[test]
    fn test_missing_parameters() {
        let mut reader = XmlReader::parse(XML).unwrap();

        let mut scale = 2.0f32;
        reader.param("PreviewScale", &mut scale, SerialFlags::OPTIONAL, Some(1.0)).unwrap();
        assert_eq!(scale, 1.0);

        let mut untouched = 5u32;
        reader.param("Missing", &mut untouched, SerialFlags::empty(), None).unwrap();
        assert_eq!(untouched, 5);

        let mut id = 0u32;
        assert!(matches!(
            reader.required("ID", &mut id, SerialFlags::ATTRIBUTE),
            Err(Error::MissingParameter(_))
        ));
    }

    #[test]
    fn test_unbalanced_end() {
        let mut reader = XmlReader::parse(XML).unwrap();
        assert!(matches!(reader.end_param(), Err(Error::UnbalancedScope)));
    }
}
