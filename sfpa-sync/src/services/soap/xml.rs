//! Minimal element tree for SOAP responses
//!
//! Namespace prefixes are dropped; lookups use local names only.

use crate::error::ServiceError;
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Local name without namespace prefix
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Default::default()
        }
    }

    /// First direct child with this name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with this name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Depth-first search for the first descendant with this name
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }
}

/// Parse a document into its root element
pub fn parse(xml: &str) -> Result<XmlElement, ServiceError> {
    // Element text is kept verbatim; only whitespace-only runs between tags are dropped
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    // Synthetic document node at the bottom of the stack
    let mut stack: Vec<XmlElement> = vec![XmlElement::default()];

    loop {
        let event = reader.read_event().map_err(|e| {
            ServiceError::Parse(format!(
                "XML error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => stack.push(XmlElement::named(e.local_name().as_ref())),
            Event::Empty(e) => {
                let element = XmlElement::named(e.local_name().as_ref());
                current(&mut stack)?.children.push(element);
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| ServiceError::Parse(format!("Invalid text content: {}", e)))?;
                if !text.trim().is_empty() {
                    current(&mut stack)?.text.push_str(&text);
                }
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                current(&mut stack)?.text.push_str(&text);
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(ServiceError::Parse("Unbalanced end tag".to_string()));
                }
                let element = stack.pop().ok_or_else(|| {
                    ServiceError::Parse("Unbalanced end tag".to_string())
                })?;
                current(&mut stack)?.children.push(element);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(ServiceError::Parse("Unclosed element at end of document".to_string()));
    }

    stack
        .pop()
        .and_then(|document| document.children.into_iter().next())
        .ok_or_else(|| ServiceError::Parse("Empty document".to_string()))
}

fn current(stack: &mut [XmlElement]) -> Result<&mut XmlElement, ServiceError> {
    stack
        .last_mut()
        .ok_or_else(|| ServiceError::Parse("Element stack empty".to_string()))
}
