//! Page attributes and output page assembly

use super::xobject::create_cropped_xobject;
use crate::constants::{DEFAULT_PAGE_HEIGHT_PT, DEFAULT_PAGE_WIDTH_PT};
use crate::geometry::ExportPlacement;
use crate::types::{Rect, ResizeError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Guard against malformed page trees with a `/Parent` cycle
const MAX_TREE_DEPTH: usize = 64;

/// Object id of the page at a zero-based index
pub fn page_id_at(doc: &Document, index: usize) -> Result<ObjectId> {
    let pages = doc.get_pages();
    let count = pages.len();
    if count == 0 {
        return Err(ResizeError::NoPages);
    }
    pages
        .values()
        .nth(index)
        .copied()
        .ok_or(ResizeError::PageOutOfRange { index, count })
}

/// Look up a page attribute, walking up `/Parent` for inheritable keys.
/// References are resolved.
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(resolve(doc, value).clone());
        }
        let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// MediaBox of a page in points, normalized so width and height are positive.
/// Pages without one get US Letter.
pub fn media_box(doc: &Document, page_id: ObjectId) -> Rect {
    let numbers: Option<Vec<f64>> = inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok().cloned())
        .map(|arr| arr.iter().filter_map(|o| extract_number(resolve(doc, o))).collect());

    match numbers.as_deref() {
        Some([x0, y0, x1, y1]) => Rect::new(
            x0.min(*x1),
            y0.min(*y1),
            (x1 - x0).abs(),
            (y1 - y0).abs(),
        ),
        _ => Rect::new(0.0, 0.0, DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT),
    }
}

/// `/Rotate` of a page in degrees, 0 when absent
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|obj| obj.as_i64().ok())
        .unwrap_or(0)
}

fn extract_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Append one output page showing a source page according to `placement`.
///
/// The page is parented to `parent_pages_id`; the caller builds the page tree.
pub fn add_resized_page(
    output: &mut Document,
    source: &Document,
    source_page_id: ObjectId,
    placement: &ExportPlacement,
    parent_pages_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let xobject_id =
        create_cropped_xobject(output, source, source_page_id, placement.crop, cache)?;

    let t = &placement.transform;
    let content = format!(
        "q {} 0 0 {} {} {} cm /P0 Do Q\n",
        t.scale_x as f32, t.scale_y as f32, t.offset_x as f32, t.offset_y as f32
    );
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set("P0", Object::Reference(xobject_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(placement.target.width as f32),
            Object::Real(placement.target.height as f32),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}
