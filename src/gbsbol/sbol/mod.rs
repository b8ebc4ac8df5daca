pub mod objects;
pub mod document;

pub use self::document::Document;

use crate::types::{DisplayId, Identity};

// "https://example.org/" + "comp" or "https://example.org" + "comp" both give
// "https://example.org/comp"
pub fn make_identity(namespace: &str, display_id: &str) -> Identity {
    if namespace.ends_with('/') || namespace.ends_with('#') {
        format!("{}{}", namespace, display_id)
    } else {
        format!("{}/{}", namespace, display_id)
    }
}

pub fn child_identity(parent: &Identity, display_id: &str) -> Identity {
    format!("{}/{}", parent, display_id)
}

pub fn display_id_of(identity: &str) -> &str {
    identity.rsplit(['/', '#']).next().unwrap_or(identity)
}

// the first of "Range1", "Range2", ... not already in `used`
pub fn next_child_display_id(type_name: &str, used: &[DisplayId]) -> DisplayId {
    let mut counter = 1;
    loop {
        let candidate = format!("{}{}", type_name, counter);
        if !used.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
