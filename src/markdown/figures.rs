//! Figure numbering and deferred cross-reference resolution.

use std::collections::HashMap;

/// Separates the alt text from the figure id encoded after it.
pub const ALT_ID_DELIMITER: &str = "__ALT__";

/// Prefix of every image target, standing in for the media base URL.
pub const MEDIA_URL_TOKEN: &str = "__MEDIA_URL__";

/// Alt text used when a figure's media element has none.
pub const MISSING_ALT_TEXT: &str = "Missing alt text";

const PLACEHOLDER_PREFIX: &str = "__REPLACE_";
const PLACEHOLDER_SUFFIX: &str = "__";

/// Sequential figure numbers for one module, in document order.
#[derive(Debug, Clone)]
pub struct FigureRegistry {
    next: usize,
    numbers: HashMap<String, usize>,
}

impl Default for FigureRegistry {
    fn default() -> Self {
        Self {
            next: 1,
            numbers: HashMap::new(),
        }
    }
}

impl FigureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next figure number.
    ///
    /// Figures without an id still consume a number but cannot be
    /// referenced. A repeated id is re-pointed at the newer figure.
    pub fn register(&mut self, id: Option<&str>) -> usize {
        let number = self.next;
        if let Some(id) = id {
            self.numbers.insert(id.to_string(), number);
        }
        self.next += 1;
        number
    }

    /// Number assigned to the figure with the given element id.
    pub fn number(&self, id: &str) -> Option<usize> {
        self.numbers.get(id).copied()
    }

    /// How many figures have been numbered so far.
    pub fn count(&self) -> usize {
        self.next - 1
    }

    pub fn is_empty(&self) -> bool {
        self.next == 1
    }

    /// Registered (id, number) pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.numbers.iter().map(|(id, n)| (id.as_str(), *n))
    }
}

/// The token standing in for a figure number until resolution.
pub fn placeholder(id: &str) -> String {
    format!("{PLACEHOLDER_PREFIX}{id}{PLACEHOLDER_SUFFIX}")
}

/// Replace every placeholder whose id is registered with its figure number.
///
/// The content is scanned once, left to right. Where several registered ids
/// fit one placeholder (`a` and `a_` both fit `__REPLACE_a___`), the longest
/// id followed by the closing delimiter wins. Placeholders naming ids that
/// never appeared as figures stay verbatim.
pub fn resolve_references(content: &str, figures: &FigureRegistry) -> String {
    let mut ids: Vec<(&str, usize)> = figures.iter().collect();
    ids.sort_unstable_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

    let mut resolved = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(start) = rest.find(PLACEHOLDER_PREFIX) {
        resolved.push_str(&rest[..start]);
        let after = &rest[start + PLACEHOLDER_PREFIX.len()..];
        let matched = ids.iter().find(|(id, _)| {
            after
                .strip_prefix(id)
                .is_some_and(|tail| tail.starts_with(PLACEHOLDER_SUFFIX))
        });
        match matched {
            Some((id, number)) => {
                resolved.push_str(&number.to_string());
                rest = &after[id.len() + PLACEHOLDER_SUFFIX.len()..];
            }
            None => {
                // Not ours; keep the underscore and rescan from the next byte.
                resolved.push('_');
                rest = &rest[start + 1..];
            }
        }
    }
    resolved.push_str(rest);
    resolved
}

/// Ids among `references` that have no registered figure.
pub fn dangling_references<'a, I>(references: I, figures: &FigureRegistry) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    references
        .into_iter()
        .filter(|id| figures.number(id).is_none())
        .collect()
}

/// Point image targets at `base_url` instead of the media token.
pub fn resolve_media_urls(content: &str, base_url: &str) -> String {
    if base_url.is_empty() || base_url.ends_with('/') {
        content.replace(MEDIA_URL_TOKEN, base_url)
    } else {
        content.replace(MEDIA_URL_TOKEN, &format!("{base_url}/"))
    }
}
