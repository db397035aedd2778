//! PDF object plumbing for resized output
//!
//! - Reading page attributes through the page tree
//! - Embedding a cropped source page as a Form XObject
//! - Assembling output pages

mod page;
mod xobject;

pub use page::{add_resized_page, inherited_attribute, media_box, page_id_at, page_rotation};
pub use xobject::{copy_object_deep, create_cropped_xobject};
