use std::collections::btree_map::Entry;

use crate::constants::{DC_REFERENCES, NS_DC, NS_DCT};
use crate::request::clean_duplicated_question_marks;
use crate::types::{DcValue, DublinCoreBag, Reference};
use crate::xml::XmlElement;

pub fn is_dublin_core(element: &XmlElement) -> bool {
    element.in_namespace(NS_DC) || element.in_namespace(NS_DCT)
}

/// Character content, looking through a single wrapping child when the
/// element itself carries no text.
fn content(element: &XmlElement) -> String {
    match (element.text(), element.children.as_slice()) {
        ("", [only]) => only.text().to_string(),
        (text, _) => text.to_string(),
    }
}

/// Adds a value under `name`: the first occurrence is stored as a scalar, the
/// second turns it into a two-element sequence, later ones append.
pub fn accumulate(bag: &mut DublinCoreBag, name: &str, value: String) {
    match bag.elements.entry(name.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(DcValue::Single(value));
        }
        Entry::Occupied(mut slot) => {
            let promoted = match slot.get_mut() {
                DcValue::Many(values) => {
                    values.push(value);
                    None
                }
                DcValue::Single(first) => Some(DcValue::Many(vec![std::mem::take(first), value])),
            };
            if let Some(promoted) = promoted {
                slot.insert(promoted);
            }
        }
    }
}

/// Flattens Dublin Core elements in document order. Elements are keyed by
/// local name, so `dc:title` and `dct:title` share a slot.
pub fn flatten<'a, I>(elements: I) -> DublinCoreBag
where
    I: IntoIterator<Item = &'a XmlElement>,
{
    let mut bag = DublinCoreBag::default();
    for element in elements {
        if element.name == DC_REFERENCES {
            bag.references.push(Reference {
                value: clean_duplicated_question_marks(&content(element)),
                scheme: element.attr("scheme").map(str::to_string),
            });
        } else {
            accumulate(&mut bag, &element.name, content(element));
        }
    }
    bag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    fn record(body: &str) -> XmlElement {
        let xml = format!(
            r#"<csw:Record xmlns:csw="http://www.opengis.net/cat/csw/2.0.2"
                xmlns:dc="http://purl.org/dc/elements/1.1/"
                xmlns:dct="http://purl.org/dc/terms/"
                xmlns:ows="http://www.opengis.net/ows">{body}</csw:Record>"#
        );
        parse_document(&xml).unwrap().unwrap()
    }

    fn flatten_record(root: &XmlElement) -> DublinCoreBag {
        flatten(root.children.iter().filter(|c| is_dublin_core(c)))
    }

    #[test]
    fn test_second_occurrence_promotes_to_sequence() {
        let root = record(
            "<dc:subject>roads</dc:subject><dc:title>Road network</dc:title><dc:subject>transport</dc:subject>",
        );
        let bag = flatten_record(&root);
        assert_eq!(
            bag.get("subject"),
            Some(&DcValue::Many(vec!["roads".into(), "transport".into()]))
        );
        assert_eq!(bag.get("title"), Some(&DcValue::Single("Road network".into())));
        assert!(bag.references.is_empty());
    }

    #[test]
    fn test_third_occurrence_appends_in_order() {
        let mut bag = DublinCoreBag::default();
        for value in ["a", "b", "c"] {
            accumulate(&mut bag, "subject", value.to_string());
        }
        assert_eq!(
            bag.get("subject"),
            Some(&DcValue::Many(vec!["a".into(), "b".into(), "c".into()]))
        );
    }

    #[test]
    fn test_references_keep_scheme_and_clean_url() {
        let root = record(
            r#"<dct:references scheme="OGC:WMS">http://example.org/geoserver/wms??service=WMS</dct:references>
               <dct:references>http://example.org/download.zip</dct:references>"#,
        );
        let bag = flatten_record(&root);
        assert_eq!(bag.references.len(), 2);
        assert_eq!(bag.references[0].value, "http://example.org/geoserver/wms?service=WMS");
        assert_eq!(bag.references[0].value.matches('?').count(), 1);
        assert_eq!(bag.references[0].scheme.as_deref(), Some("OGC:WMS"));
        assert_eq!(bag.references[1].scheme, None);
        assert!(bag.get("references").is_none());
    }

    #[test]
    fn test_non_dublin_core_children_are_skipped() {
        let root = record(
            r#"<dc:identifier>abc</dc:identifier>
               <ows:BoundingBox crs="EPSG:4326"><ows:LowerCorner>0 0</ows:LowerCorner></ows:BoundingBox>"#,
        );
        let bag = flatten_record(&root);
        assert_eq!(bag.elements.len(), 1);
        assert_eq!(bag.get("identifier").and_then(DcValue::as_single), Some("abc"));
    }

    #[test]
    fn test_content_unwraps_single_child() {
        let root = record("<dc:description><p>Wrapped text</p></dc:description>");
        let bag = flatten_record(&root);
        assert_eq!(bag.get("description").and_then(DcValue::as_single), Some("Wrapped text"));
    }
}
