//! Tag namespace normalization.

use super::Element;

/// Extract the local part of a qualified tag name.
///
/// Handles both the Clark form (`{http://cnx.rice.edu/cnxml}para`) and the
/// prefixed form (`m:math`), keeping only what follows the last delimiter.
pub fn local_name(name: &str) -> &str {
    name.rfind(['}', ':'])
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Rewrite every tag in the tree to its local name.
///
/// Attributes, text and structure are left untouched. Applying this twice
/// is the same as applying it once.
pub fn strip_namespaces(root: &mut Element) {
    root.walk_mut(&mut |el| {
        let local = local_name(&el.tag);
        if local.len() != el.tag.len() {
            el.tag = local.to_string();
        }
    });
}
