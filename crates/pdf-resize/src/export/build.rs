//! Building one resized output document

use crate::geometry::export_placement;
use crate::render::{add_resized_page, media_box, page_id_at};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// Build a document with one page per entry of `pages` (zero-based source
/// indices, in the order given), each trimmed and sized to `spec`.
pub fn build_resized_document(
    source: &Document,
    pages: &[usize],
    trim_mm: f64,
    spec: &OutputSpec,
) -> Result<Document> {
    if pages.is_empty() {
        return Err(ResizeError::NoPages);
    }

    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();
    let mut cache: HashMap<ObjectId, ObjectId> = HashMap::new();
    let mut page_refs = Vec::with_capacity(pages.len());

    for &index in pages {
        let source_page_id = page_id_at(source, index)?;
        let placement = export_placement(
            media_box(source, source_page_id),
            trim_mm,
            spec.size(),
            spec.mode,
        );
        let page_id = add_resized_page(
            &mut output,
            source,
            source_page_id,
            &placement,
            pages_tree_id,
            &mut cache,
        )?;
        page_refs.push(Object::Reference(page_id));
    }

    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    output.trailer.set("Root", catalog_id);

    Ok(output)
}
