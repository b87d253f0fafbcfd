//! Namespace-aware element tree built from `quick-xml` events.
//!
//! Catalog responses are small and their record shapes vary by server, so the
//! parser walks an owned tree rather than streaming.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use serde_json::{Map, Value};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub namespace: Option<String>,
    pub name: String,
    /// Attributes keyed by local name, namespace declarations excluded
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    fn from_start(ns: ResolveResult, start: &BytesStart) -> Result<Self> {
        let namespace = match ns {
            ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
            _ => None,
        };

        let mut attributes = Vec::new();
        for attr in start.attributes().flatten() {
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((name, value));
        }

        Ok(Self {
            namespace,
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed character content of this element only
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first child called `name`, if present and non-empty
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name)
            .map(XmlElement::text)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }

    /// Generic JSON rendering used for opaque metadata blocks.
    ///
    /// Attributes become `@name`, repeated children become arrays, mixed text
    /// goes under `#text`, and text-only leaves collapse to a string.
    pub fn to_json(&self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return Value::String(self.text().to_string());
        }

        let mut map = Map::new();
        for (key, value) in &self.attributes {
            map.insert(format!("@{key}"), Value::String(value.clone()));
        }
        for child in &self.children {
            let rendered = child.to_json();
            match map.get_mut(&child.name) {
                Some(Value::Array(items)) => items.push(rendered),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, rendered]);
                }
                None => {
                    map.insert(child.name.clone(), rendered);
                }
            }
        }
        if !self.text().is_empty() {
            map.insert("#text".to_string(), Value::String(self.text().to_string()));
        }
        Value::Object(map)
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Decodes a document into its root element; `None` when there is no element at all.
pub fn parse_document(xml: &str) -> Result<Option<XmlElement>> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(e)) => stack.push(XmlElement::from_start(ns, &e)?),
            (ns, Event::Empty(e)) => {
                let element = XmlElement::from_start(ns, &e)?;
                attach(&mut stack, &mut root, element);
            }
            (_, Event::End(_)) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            (_, Event::Text(e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            (_, Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(quick_xml::Error::UnexpectedEof(open.name.clone()).into());
    }

    Ok(root)
}
