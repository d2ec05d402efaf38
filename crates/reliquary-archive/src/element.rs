//! In-memory XML element tree backing the XML archives.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::{Error, Result};

/// An XML element with attributes, text content and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    /// Tag name of the element.
    pub tag: String,
    /// Text content.
    pub text: String,
    /// Attributes as key-value pairs, in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create a new element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the text content of this element.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add an attribute to this element.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Add a child element.
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value with the same key.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// First child element with the given tag.
    pub fn find_child(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Parse XML text into an element tree, returning the root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(element_from_start(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    let element = element_from_start(&e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(element),
                            None => root = Some(element),
                        }
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(element) = stack.last_mut() {
                        let text = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                        if !text.trim().is_empty() {
                            element.text = text.into_owned();
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {} // Declarations, comments, processing instructions
                Err(e) => return Err(Error::Xml(format!("XML parse error: {}", e))),
            }
        }

        root.ok_or_else(|| Error::Xml("no root element found in XML".to_string()))
    }

    /// Render this element as an indented XML document.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| Error::Xml(e.to_string()))?;
        write_element(&mut writer, self)?;

        let mut output = writer.into_inner();
        output.push(b'\n');
        String::from_utf8(output).map_err(|e| Error::Xml(e.to_string()))
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(tag);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::Xml(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::Xml(e.to_string()))?;

    if !element.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(|e| Error::Xml(e.to_string()))?;
    }

    for child in &element.children {
        write_element(writer, child)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(|e| Error::Xml(e.to_string()))
}
