use crate::domain::notification::{NotificationError, NotificationRecord};
use crate::error::{PaymentError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::BTreeMap;

/// Name of the gateway's response block inside a notification.
pub const RESPONSE_BLOCK: &str = "mobilpay";

/// Minimal element tree built from the notification.
///
/// Only the text ahead of an element's first child is kept, which is all the
/// notification format uses. Entities other than the predefined XML ones are
/// rejected, and DTDs are never expanded.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

fn parse_error(err: impl std::fmt::Display) -> PaymentError {
    PaymentError::ParseError(err.to_string())
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(parse_error)?
        .to_string();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(parse_error)?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(parse_error)?;
        let value = attr.unescape_value().map_err(parse_error)?;
        attributes.push((key.to_string(), value.into_owned()));
    }
    Ok(Element {
        name,
        attributes,
        ..Default::default()
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(parse_error("multiple root elements"));
    }
    Ok(())
}

fn append_text(stack: &mut [Element], content: &str) {
    if let Some(current) = stack.last_mut()
        && current.children.is_empty()
    {
        current
            .text
            .get_or_insert_with(String::new)
            .push_str(content);
    }
}

fn parse_tree(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| parse_error("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(content) => {
                let content = content.unescape().map_err(parse_error)?;
                append_text(&mut stack, &content);
            }
            Event::CData(content) => {
                let content = std::str::from_utf8(&content).map_err(parse_error)?;
                append_text(&mut stack, content);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(parse_error("unclosed element"));
    }
    root.ok_or_else(|| parse_error("empty document"))
}

/// Parses a decrypted notification document.
///
/// Navigation takes the first matching child for `invoice`, `params` and the
/// response block; no schema validation is performed. `invoice` and the
/// response block are required. A `<param>` without a name is skipped.
pub fn parse_notification(xml: &[u8]) -> Result<NotificationRecord> {
    let xml = std::str::from_utf8(xml).map_err(parse_error)?;
    let root = parse_tree(xml.trim_start_matches('\u{feff}'))?;

    let invoice = root
        .child("invoice")
        .ok_or_else(|| parse_error("missing <invoice> element"))?;
    let response = root
        .child(RESPONSE_BLOCK)
        .ok_or_else(|| parse_error(format!("missing <{RESPONSE_BLOCK}> element")))?;

    let mut params = BTreeMap::new();
    if let Some(block) = root.child("params") {
        for param in block.children_named("param") {
            let Some(name) = param.child("name").map(Element::text) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let value = param.child("value").map(Element::text).unwrap_or_default();
            params.insert(name.to_string(), value.to_string());
        }
    }

    let mut fields = BTreeMap::new();
    let mut error = None;
    for child in &response.children {
        match child.name.as_str() {
            "customer" => {}
            "error" => {
                error = Some(NotificationError {
                    code: child.attr("code").map(str::to_string),
                    message: child.text().to_string(),
                });
            }
            name => {
                fields.insert(name.to_string(), child.text().to_string());
            }
        }
    }

    Ok(NotificationRecord {
        order_id: root.attr("id").unwrap_or_default().to_string(),
        timestamp: root.attr("timestamp").unwrap_or_default().to_string(),
        order_type: root.attr("type").unwrap_or_default().to_string(),
        customer_id: invoice.attr("customer_id").map(str::to_string),
        params,
        crc: response.attr("crc").map(str::to_string),
        fields,
        error,
    })
}
