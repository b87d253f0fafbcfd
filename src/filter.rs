//! OGC Filter Encoding 1.1 expressions used as GetRecords constraints.

use quick_xml::escape::escape;
use std::fmt;

use crate::constants::DATASET_TYPE;

pub const WILD_CARD: &str = "%";
pub const SINGLE_CHAR: &str = "_";
pub const ESCAPE_CHAR: &str = "\\";

pub const ANY_TEXT: &str = "csw:AnyText";
pub const DC_TYPE: &str = "dc:type";
pub const IDENTIFIER: &str = "identifier";

#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    PropertyIsLike {
        property: String,
        pattern: String,
        wild_card: String,
        single_char: String,
        escape_char: String,
    },
    PropertyIsEqualTo {
        property: String,
        literal: String,
    },
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
}

impl FilterNode {
    fn write_xml(&self, out: &mut String) {
        match self {
            FilterNode::PropertyIsLike {
                property,
                pattern,
                wild_card,
                single_char,
                escape_char,
            } => {
                out.push_str(&format!(
                    "<ogc:PropertyIsLike wildCard=\"{}\" singleChar=\"{}\" escapeChar=\"{}\">",
                    escape(wild_card),
                    escape(single_char),
                    escape(escape_char)
                ));
                write_property(out, property, pattern);
                out.push_str("</ogc:PropertyIsLike>");
            }
            FilterNode::PropertyIsEqualTo { property, literal } => {
                out.push_str("<ogc:PropertyIsEqualTo>");
                write_property(out, property, literal);
                out.push_str("</ogc:PropertyIsEqualTo>");
            }
            FilterNode::And(nodes) => write_group(out, "ogc:And", nodes),
            FilterNode::Or(nodes) => write_group(out, "ogc:Or", nodes),
            FilterNode::Not(node) => {
                out.push_str("<ogc:Not>");
                node.write_xml(out);
                out.push_str("</ogc:Not>");
            }
        }
    }
}

fn write_property(out: &mut String, property: &str, literal: &str) {
    out.push_str(&format!(
        "<ogc:PropertyName>{}</ogc:PropertyName><ogc:Literal>{}</ogc:Literal>",
        escape(property),
        escape(literal)
    ));
}

fn write_group(out: &mut String, tag: &str, nodes: &[FilterNode]) {
    out.push_str(&format!("<{tag}>"));
    for node in nodes {
        node.write_xml(out);
    }
    out.push_str(&format!("</{tag}>"));
}

/// Root of a filter expression, serialized as `<ogc:Filter>`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub root: FilterNode,
}

impl Filter {
    pub fn new(root: FilterNode) -> Self {
        Self { root }
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from("<ogc:Filter>");
        self.root.write_xml(&mut out);
        out.push_str("</ogc:Filter>");
        out
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

pub fn property_is_like(property: &str, pattern: &str) -> FilterNode {
    FilterNode::PropertyIsLike {
        property: property.to_string(),
        pattern: pattern.to_string(),
        wild_card: WILD_CARD.to_string(),
        single_char: SINGLE_CHAR.to_string(),
        escape_char: ESCAPE_CHAR.to_string(),
    }
}

pub fn property_is_equal_to(property: &str, literal: &str) -> FilterNode {
    FilterNode::PropertyIsEqualTo {
        property: property.to_string(),
        literal: literal.to_string(),
    }
}

pub fn and(nodes: Vec<FilterNode>) -> FilterNode {
    FilterNode::And(nodes)
}

pub fn or(nodes: Vec<FilterNode>) -> FilterNode {
    FilterNode::Or(nodes)
}

pub fn not(node: FilterNode) -> FilterNode {
    FilterNode::Not(Box::new(node))
}

/// Only records typed as datasets
pub fn dataset_filter() -> Filter {
    Filter::new(property_is_equal_to(DC_TYPE, DATASET_TYPE))
}

/// Datasets whose `csw:AnyText` contains `text`; case is left to the server.
pub fn text_filter(text: &str) -> Filter {
    Filter::new(and(vec![
        property_is_like(ANY_TEXT, &format!("{WILD_CARD}{text}{WILD_CARD}")),
        property_is_equal_to(DC_TYPE, DATASET_TYPE),
    ]))
}

/// Matches `workspace:layer` identifiers; both parts default to the wildcard.
pub fn workspace_filter(text: Option<&str>, workspace: Option<&str>) -> Filter {
    let workspace_term = match workspace {
        Some(ws) if !ws.is_empty() => ws.to_string(),
        _ => WILD_CARD.to_string(),
    };
    let layer_term = match text {
        Some(t) if !t.is_empty() => format!("{WILD_CARD}{t}{WILD_CARD}"),
        _ => WILD_CARD.to_string(),
    };
    Filter::new(property_is_like(
        IDENTIFIER,
        &format!("{workspace_term}:{layer_term}"),
    ))
}
