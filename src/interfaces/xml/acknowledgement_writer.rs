use super::{XML_DECLARATION, attribute, text};
use crate::domain::acknowledgement::AcknowledgementRequest;
use crate::error::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::io::Write;

/// Renders the `<crc>` reply body for a processed notification.
///
/// The `error_type` and `error_code` attributes are written only when set.
pub fn build_acknowledgement(ack: &AcknowledgementRequest) -> Result<Vec<u8>> {
    let mut buffer = XML_DECLARATION.as_bytes().to_vec();
    let mut writer = Writer::new(&mut buffer);

    let mut crc = BytesStart::new("crc");
    if let Some(error_type) = ack.error_type() {
        crc.push_attribute(attribute("error_type", error_type));
    }
    if let Some(error_code) = ack.error_code() {
        crc.push_attribute(attribute("error_code", error_code));
    }

    writer.write_event(Event::Start(crc))?;
    writer.write_event(Event::Text(text(&ack.message)))?;
    writer.write_event(Event::End(BytesEnd::new("crc")))?;
    writer.get_mut().flush()?;

    Ok(buffer)
}
