//! Attribute extraction from the single-element XML fragments returned by the
//! hosting interface, e.g. `<IDP ID="..." AMOUNT="1095" ACCOUNTID="..."/>`.

use crate::payments::error::{SaferpayError, SaferpayResult};
use crate::payments::params::ParameterCollection;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parses `xml` and returns the root element's attributes in document order.
///
/// The input must hold exactly one well-formed root element. Nested elements
/// are parsed for well-formedness but their attributes are ignored.
pub fn extract_attributes(xml: &str) -> SaferpayResult<Vec<(String, String)>> {
    let mut reader = Reader::from_str(xml.trim());
    reader.trim_text(true);

    let mut root: Option<Vec<(String, String)>> = None;
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            SaferpayError::invalid_response_format(format!(
                "parse error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(ref e) => {
                if depth == 0 {
                    root = Some(take_root(root, e)?);
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                if depth == 0 {
                    root = Some(take_root(root, e)?);
                }
            }
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    SaferpayError::invalid_response_format("unexpected closing tag")
                })?;
            }
            Event::Text(_) | Event::CData(_) if depth == 0 => {
                return Err(SaferpayError::invalid_response_format(
                    "text outside of the root element",
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(SaferpayError::invalid_response_format(
            "root element is not closed",
        ));
    }

    root.ok_or_else(|| SaferpayError::invalid_response_format("no root element"))
}

/// Copies the fragment's root attributes into `target`.
///
/// `target` is left untouched when the fragment does not parse.
pub fn fill_from_xml(target: &mut ParameterCollection, xml: &str) -> SaferpayResult<()> {
    for (name, value) in extract_attributes(xml)? {
        target.set(name, value);
    }
    Ok(())
}

fn take_root(
    current: Option<Vec<(String, String)>>,
    element: &BytesStart<'_>,
) -> SaferpayResult<Vec<(String, String)>> {
    if current.is_some() {
        return Err(SaferpayError::invalid_response_format(
            "more than one root element",
        ));
    }
    read_attributes(element)
}

fn read_attributes(element: &BytesStart<'_>) -> SaferpayResult<Vec<(String, String)>> {
    element
        .attributes()
        .map(|attr| {
            let attr = attr.map_err(|e| {
                SaferpayError::invalid_response_format(format!("malformed attribute: {}", e))
            })?;
            let name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| {
                    SaferpayError::invalid_response_format(format!(
                        "attribute name is not utf-8: {}",
                        e
                    ))
                })?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| {
                    SaferpayError::invalid_response_format(format!(
                        "invalid value for attribute {}: {}",
                        name, e
                    ))
                })?
                .into_owned();
            Ok((name, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(xml: &str) {
        assert!(
            matches!(
                extract_attributes(xml),
                Err(SaferpayError::InvalidResponseFormat { .. })
            ),
            "expected {:?} to be rejected",
            xml
        );
    }

    #[test]
    fn reads_root_attributes() {
        let attrs = extract_attributes(r#"<Status ID="123" AMOUNT="500" ACCOUNTID="acc1"/>"#)
            .expect("fragment should parse");
        assert_eq!(
            attrs,
            vec![
                ("ID".to_string(), "123".to_string()),
                ("AMOUNT".to_string(), "500".to_string()),
                ("ACCOUNTID".to_string(), "acc1".to_string()),
            ]
        );
    }

    #[test]
    fn unescapes_entities() {
        let attrs = extract_attributes(r#"<IDP DESCRIPTION="Tom &amp; Jerry &lt;3&gt;"/>"#)
            .expect("fragment should parse");
        assert_eq!(attrs[0].1, "Tom & Jerry <3>");
    }

    #[test]
    fn ignores_nested_elements() {
        let attrs =
            extract_attributes(r#"<IDP ID="1"><Detail ID="2" EXTRA="x"/></IDP>"#).expect("parse");
        assert_eq!(attrs, vec![("ID".to_string(), "1".to_string())]);
    }

    #[test]
    fn tolerates_declaration_and_surrounding_whitespace() {
        let attrs = extract_attributes("\n <?xml version=\"1.0\"?>\n<IDP RESULT=\"0\"/>\n")
            .expect("parse");
        assert_eq!(attrs, vec![("RESULT".to_string(), "0".to_string())]);
    }

    #[test]
    fn element_without_attributes_yields_nothing() {
        assert!(extract_attributes("<IDP></IDP>").expect("parse").is_empty());
    }

    #[test]
    fn rejects_malformed_fragments() {
        assert_invalid("");
        assert_invalid("OK:");
        assert_invalid("<IDP ID=\"1\">");
        assert_invalid("<IDP ID=\"1\"></Other>");
        assert_invalid("<IDP ID=1/>");
        assert_invalid("<IDP ID=\"1\" ID=\"2\"/>");
        assert_invalid("<IDP ID=\"1\"/><IDP ID=\"2\"/>");
        assert_invalid("<IDP ID=\"1\"/>trailing");
    }

    #[test]
    fn extraction_is_repeatable() {
        let xml = r#"<IDP MSGTYPE="PayConfirm" ID="abc" TOKEN="(unused)"/>"#;
        let mut first = ParameterCollection::pay_confirm();
        let mut second = ParameterCollection::pay_confirm();
        fill_from_xml(&mut first, xml).expect("parse");
        fill_from_xml(&mut second, xml).expect("parse");
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn failed_parse_leaves_collection_untouched() {
        let mut params = ParameterCollection::pay_confirm().with("KEEP", "1");
        assert!(fill_from_xml(&mut params, "<IDP ID=\"1\" BROKEN/>").is_err());
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("KEEP"), Some("1"));
    }
}
