pub mod acknowledgement_writer;
pub mod notification_reader;
pub mod order_writer;

use quick_xml::escape::partial_escape;
use quick_xml::events::BytesText;
use quick_xml::events::attributes::Attribute;
use quick_xml::name::QName;
use std::borrow::Cow;

/// Declaration written ahead of every outbound document.
pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>\n";

/// Element text with `<`, `>` and `&` escaped. Quotes stay literal in text
/// nodes.
pub(crate) fn text(content: &str) -> BytesText<'_> {
    BytesText::from_escaped(partial_escape(content))
}

/// A double-quoted attribute. Apostrophes stay literal; `"` and the line
/// control characters are escaped on top of `<`, `>` and `&`.
pub(crate) fn attribute<'a>(name: &'a str, value: &'a str) -> Attribute<'a> {
    let escaped = partial_escape(value);
    let value = if escaped.contains(['"', '\n', '\r', '\t']) {
        let mut quoted = String::with_capacity(escaped.len() + 8);
        for c in escaped.chars() {
            match c {
                '"' => quoted.push_str("&quot;"),
                '\n' => quoted.push_str("&#10;"),
                '\r' => quoted.push_str("&#13;"),
                '\t' => quoted.push_str("&#09;"),
                other => quoted.push(other),
            }
        }
        Cow::Owned(quoted.into_bytes())
    } else {
        match escaped {
            Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
            Cow::Owned(s) => Cow::Owned(s.into_bytes()),
        }
    };
    Attribute {
        key: QName(name.as_bytes()),
        value,
    }
}
