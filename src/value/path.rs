use super::{Document, Value};

/// Resolves a dot-separated path inside a document.
///
/// `""`, `"/"` and `"$"` address the root itself. Each segment steps one level
/// into an object by key, or into an array by numeric index. `None` means the
/// path is missing; `Some(Null)` means it is present with an explicit null.
pub fn resolve<'a>(root: &'a Document, path: &str) -> Option<&'a Document> {
    if is_root_path(path) {
        return Some(root);
    }

    path.split('.').try_fold(root, |node, segment| match node {
        Document::Object(map) => map.get(segment),
        Document::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Returns `true` for any node reached, including an explicit `null`.
pub fn path_exists(root: &Document, path: &str) -> bool {
    resolve(root, path).is_some()
}

/// Returns the converted value at `path`, or `None` if it is missing or null.
pub fn extract_value(root: &Document, path: &str) -> Option<Value> {
    resolve(root, path).and_then(Value::from_json)
}

fn is_root_path(path: &str) -> bool {
    matches!(path, "" | "/" | "$")
}
