#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, Stream};

/// In-memory document with one page per entry of `sizes` (points)
pub fn create_test_pdf(sizes: &[(i64, i64)]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for &(width, height) in sizes {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            b"q 0 0 m 10 10 l S Q".to_vec(),
        ));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    finish_page_tree(&mut doc, pages_id, kids, Dictionary::new());
    doc
}

/// Letter-sized pages
pub fn create_letter_pdf(num_pages: usize) -> Document {
    create_test_pdf(&vec![(612, 792); num_pages])
}

/// Pages that inherit MediaBox, Rotate and Resources from the page tree root
pub fn create_inherited_pdf(num_pages: usize, media_box: [i64; 4], rotate: i64) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    let font_id = doc.add_object(font);
    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let inherited = Dictionary::from_iter(vec![
        (
            "MediaBox",
            Object::Array(media_box.iter().map(|&v| Object::Integer(v)).collect()),
        ),
        ("Rotate", Object::Integer(rotate)),
        ("Resources", Object::Dictionary(resources)),
    ]);
    finish_page_tree(&mut doc, pages_id, kids, inherited);
    doc
}

fn finish_page_tree(
    doc: &mut Document,
    pages_id: lopdf::ObjectId,
    kids: Vec<Object>,
    extra: Dictionary,
) {
    let count = kids.len() as i64;
    let mut pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    for (key, value) in extra.iter() {
        pages_dict.set(key.clone(), value.clone());
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);
}

pub fn to_bytes(doc: &mut Document) -> Vec<u8> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

pub fn number(obj: &Object) -> f64 {
    match obj {
        Object::Integer(i) => *i as f64,
        Object::Real(r) => *r as f64,
        other => panic!("Expected a number, got {:?}", other),
    }
}

/// MediaBox of a page as written (no inheritance)
pub fn page_media_box(doc: &Document, index: usize) -> [f64; 4] {
    let page_id = *doc.get_pages().values().nth(index).unwrap();
    let dict = doc.get_dictionary(page_id).unwrap();
    let arr = dict.get(b"MediaBox").unwrap().as_array().unwrap();
    [
        number(&arr[0]),
        number(&arr[1]),
        number(&arr[2]),
        number(&arr[3]),
    ]
}

pub fn approx(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}
