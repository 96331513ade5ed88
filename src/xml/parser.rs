//! quick-xml based tree builder.

use quick_xml::Reader;
use quick_xml::escape::unescape_with;
use quick_xml::events::{BytesStart, Event};

use super::Element;
use crate::error::{Error, Result};
use crate::util::strip_bom;

/// Parse a complete XML document into its root [`Element`].
///
/// Text is kept exactly as written (no trimming) so that inline markup and
/// tails survive. Comments, processing instructions and the doctype are
/// dropped. Fails on anything that is not a single well-formed element tree.
pub fn parse_document(content: &str) -> Result<Element> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                ensure_single_root(&root)?;
                stack.push(open_element(&e)?);
            }
            Ok(Event::Empty(e)) => {
                ensure_single_root(&root)?;
                let element = open_element(&e)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::Malformed("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Text(e)) => {
                push_text(&mut stack, &String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::CData(e)) => {
                push_text(&mut stack, &String::from_utf8_lossy(&e));
            }
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                let resolved = resolve_entity(&entity).ok_or_else(|| {
                    Error::Malformed(format!("undefined entity reference &{entity};"))
                })?;
                push_text(&mut stack, &resolved);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::Malformed(format!("unclosed element <{}>", open.tag)));
    }

    root.ok_or_else(|| Error::Malformed("document has no root element".to_string()))
}

/// Parse raw bytes, stripping a BOM and decoding non-UTF-8 input first.
pub fn parse_bytes(bytes: &[u8]) -> Result<Element> {
    parse_document(&crate::util::decode_xml(strip_bom(bytes)))
}

fn ensure_single_root(root: &Option<Element>) -> Result<()> {
    if root.is_some() {
        return Err(Error::Malformed("multiple root elements".to_string()));
    }
    Ok(())
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape_with(&raw, named_entity).map_err(quick_xml::Error::from)?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

/// Hand a finished element to its parent, or make it the document root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// Text goes to the open element's leading text until it has children,
/// after which it belongs to the tail of the last child.
fn push_text(stack: &mut [Element], text: &str) {
    let Some(current) = stack.last_mut() else {
        return;
    };
    match current.children.last_mut() {
        Some(last) => last.tail.push_str(text),
        None => current.text.push_str(text),
    }
}

/// Predefined XML entities, plus `nbsp` which CNXML sources use without
/// declaring it.
fn named_entity(name: &str) -> Option<&'static str> {
    match name {
        "apos" => Some("'"),
        "quot" => Some("\""),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "nbsp" => Some("\u{a0}"),
        _ => None,
    }
}

/// Resolve XML entity references.
pub fn resolve_entity(entity: &str) -> Option<String> {
    if let Some(resolved) = named_entity(entity) {
        return Some(resolved.to_string());
    }

    if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_tails() {
        let root = parse_document("<para>Hello <emphasis>big</emphasis> world<newline/>!</para>")
            .unwrap();
        assert_eq!(root.tag, "para");
        assert_eq!(root.text, "Hello ");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].text, "big");
        assert_eq!(root.children[0].tail, " world");
        assert_eq!(root.children[1].tag, "newline");
        assert_eq!(root.children[1].tail, "!");
    }

    #[test]
    fn test_qualified_names_kept() {
        let root = parse_document(
            r#"<document xmlns="http://cnx.rice.edu/cnxml" xmlns:md="http://cnx.rice.edu/mdml"><md:title>T</md:title></document>"#,
        )
        .unwrap();
        assert_eq!(root.children[0].tag, "md:title");
        assert_eq!(root.attr("xmlns:md"), Some("http://cnx.rice.edu/mdml"));
    }

    #[test]
    fn test_attributes_in_order_and_unescaped() {
        let root = parse_document(r#"<media id="m1" alt="Tom &amp; Jerry &#x2019;s"/>"#).unwrap();
        assert_eq!(
            root.attributes,
            vec![
                ("id".to_string(), "m1".to_string()),
                ("alt".to_string(), "Tom & Jerry \u{2019}s".to_string()),
            ]
        );
    }

    #[test]
    fn test_entities_in_text() {
        let root = parse_document("<p>a &lt; b &amp;&amp; c&#65;</p>").unwrap();
        assert_eq!(root.text, "a < b && cA");
    }

    #[test]
    fn test_undefined_entity_is_error() {
        assert!(matches!(
            parse_document("<p>a &foo; b</p>"),
            Err(Error::Malformed(_))
        ));
        assert_eq!(parse_document("<p>a&nbsp;b</p>").unwrap().text, "a\u{a0}b");
    }

    #[test]
    fn test_duplicate_attribute_is_error() {
        assert!(matches!(
            parse_document(r#"<figure id="a" id="b"/>"#),
            Err(Error::Xml(_))
        ));
    }

    #[test]
    fn test_unquoted_attribute_is_error() {
        assert!(parse_document("<figure id=a/>").is_err());
    }

    #[test]
    fn test_undefined_entity_in_attribute_is_error() {
        assert!(parse_document(r#"<media alt="&foo;"/>"#).is_err());
    }

    #[test]
    fn test_cdata_and_comments() {
        let root = parse_document("<p>x<!-- hidden --><![CDATA[<raw>]]></p>").unwrap();
        assert_eq!(root.text, "x<raw>");
    }

    #[test]
    fn test_declaration_and_bom() {
        let root = parse_document("\u{feff}<?xml version=\"1.0\"?>\n<document/>\n").unwrap();
        assert_eq!(root.tag, "document");
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        assert!(parse_document("<a><b></a>").is_err());
    }

    #[test]
    fn test_unclosed_is_error() {
        assert!(parse_document("<a><b></b>").is_err());
    }

    #[test]
    fn test_empty_document_is_error() {
        assert!(matches!(parse_document("   "), Err(Error::Malformed(_))));
    }

    #[test]
    fn test_multiple_roots_is_error() {
        assert!(matches!(
            parse_document("<a/><b/>"),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_bytes_latin1() {
        let root =
            parse_bytes(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><t>caf\xe9</t>").unwrap();
        assert_eq!(root.text, "caf\u{e9}");
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("apos"), Some("'".to_string()));
        assert_eq!(resolve_entity("#65"), Some("A".to_string()));
        assert_eq!(resolve_entity("#x2019"), Some("\u{2019}".to_string()));
        assert_eq!(resolve_entity("unknown"), None);
        assert_eq!(resolve_entity("#xZZZ"), None);
    }
}
