use super::{XML_DECLARATION, attribute, text};
use crate::domain::order::{Amount, Billing, PaymentRequest};
use crate::error::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::io::Write;

/// Writes the payment-order document for a validated request.
///
/// Element order is fixed by the gateway: signature, invoice (details, then
/// contact info), params, then the callback urls.
pub struct OrderWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> OrderWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: Writer::new(sink),
        }
    }

    /// Writes the whole document, declaration included.
    ///
    /// `timestamp` is rendered as-is; callers stamp it before calling.
    pub fn write_order(
        &mut self,
        request: &PaymentRequest,
        amount: Amount,
        signature: &str,
        timestamp: &str,
    ) -> Result<()> {
        self.writer.get_mut().write_all(XML_DECLARATION.as_bytes())?;

        let mut order = BytesStart::new("order");
        order.push_attribute(attribute("type", &request.order_type));
        order.push_attribute(attribute("id", &request.order_id));
        order.push_attribute(attribute("timestamp", timestamp));
        self.writer.write_event(Event::Start(order))?;

        self.text_element("signature", signature)?;
        self.write_invoice(request, amount)?;
        self.write_params(request)?;

        self.writer.write_event(Event::Start(BytesStart::new("url")))?;
        self.text_element("confirm", &request.confirm_url)?;
        self.text_element("return", &request.return_url)?;
        self.writer.write_event(Event::End(BytesEnd::new("url")))?;

        self.writer.write_event(Event::End(BytesEnd::new("order")))?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_invoice(&mut self, request: &PaymentRequest, amount: Amount) -> Result<()> {
        let amount = amount.to_string();
        let mut invoice = BytesStart::new("invoice");
        invoice.push_attribute(attribute("currency", &request.currency));
        invoice.push_attribute(attribute("amount", &amount));
        invoice.push_attribute(attribute("customer_type", "2"));
        invoice.push_attribute(attribute("customer_id", &request.customer_id));
        self.writer.write_event(Event::Start(invoice))?;

        self.text_element("details", &request.details)?;
        if let Some(billing) = &request.billing
            && !billing.is_empty()
        {
            self.write_contact_info(billing)?;
        }

        self.writer.write_event(Event::End(BytesEnd::new("invoice")))?;
        Ok(())
    }

    fn write_contact_info(&mut self, billing: &Billing) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new("contact_info")))?;
        let mut person = BytesStart::new("billing");
        person.push_attribute(attribute("type", "person"));
        self.writer.write_event(Event::Start(person))?;

        self.text_element("first_name", &billing.first_name)?;
        self.text_element("last_name", &billing.last_name)?;
        self.text_element("address", &billing.address)?;
        self.text_element("email", &billing.email)?;
        self.text_element("mobile_phone", &billing.phone)?;

        self.writer.write_event(Event::End(BytesEnd::new("billing")))?;
        self.writer
            .write_event(Event::End(BytesEnd::new("contact_info")))?;
        Ok(())
    }

    fn write_params(&mut self, request: &PaymentRequest) -> Result<()> {
        let mut params = request.params().peekable();
        if params.peek().is_none() {
            return Ok(());
        }

        self.writer.write_event(Event::Start(BytesStart::new("params")))?;
        for (name, value) in params {
            self.writer.write_event(Event::Start(BytesStart::new("param")))?;
            self.text_element("name", name)?;
            self.text_element("value", value)?;
            self.writer.write_event(Event::End(BytesEnd::new("param")))?;
        }
        self.writer.write_event(Event::End(BytesEnd::new("params")))?;
        Ok(())
    }

    fn text_element(&mut self, name: &str, content: &str) -> Result<()> {
        self.writer
            .create_element(name)
            .write_text_content(text(content))?;
        Ok(())
    }
}

/// Renders the order document into a fresh buffer.
pub fn build_order(
    request: &PaymentRequest,
    amount: Amount,
    signature: &str,
    timestamp: &str,
) -> Result<Vec<u8>> {
    let mut writer = OrderWriter::new(Vec::new());
    writer.write_order(request, amount, signature, timestamp)?;
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> PaymentRequest {
        PaymentRequest::new(
            "ord-1",
            dec!(25.00),
            "42",
            "Two tickets",
            "https://shop.example/confirm",
            "https://shop.example/return",
        )
    }

    fn render(request: &PaymentRequest) -> String {
        let amount = request.validate().unwrap();
        let bytes = build_order(request, amount, "SIGN-1234", "20240102030405").unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_minimal_order_shape() {
        let xml = render(&request());
        assert_eq!(
            xml,
            "<?xml version='1.0' encoding='utf-8'?>\n\
             <order type=\"card\" id=\"ord-1\" timestamp=\"20240102030405\">\
             <signature>SIGN-1234</signature>\
             <invoice currency=\"RON\" amount=\"25.00\" customer_type=\"2\" customer_id=\"42\">\
             <details>Two tickets</details>\
             </invoice>\
             <url><confirm>https://shop.example/confirm</confirm><return>https://shop.example/return</return></url>\
             </order>"
        );
    }

    #[test]
    fn test_billing_block_with_defaults() {
        let request = request().with_billing(Billing {
            first_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            ..Default::default()
        });
        let xml = render(&request);
        assert!(xml.contains(
            "<details>Two tickets</details>\
             <contact_info><billing type=\"person\">\
             <first_name>Ana</first_name><last_name></last_name><address></address>\
             <email>ana@example.com</email><mobile_phone></mobile_phone>\
             </billing></contact_info></invoice>"
        ));
    }

    struct FullSink;

    impl Write for FullSink {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::WriteZero.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_io_error() {
        let request = request();
        let amount = request.validate().unwrap();
        let mut writer = OrderWriter::new(FullSink);
        assert!(matches!(
            writer.write_order(&request, amount, "SIGN-1234", "20240102030405"),
            Err(crate::error::PaymentError::IoError(_))
        ));
    }

    #[test]
    fn test_empty_billing_is_skipped() {
        let xml = render(&request().with_billing(Billing::default()));
        assert!(xml.contains("<details>Two tickets</details></invoice>"));
        assert!(!xml.contains("<contact_info>"));
    }

    #[test]
    fn test_params_follow_invoice_and_skip_empty_entries() {
        let request = request()
            .with_param("foo", "bar")
            .with_param("baz", "1")
            .with_param("blank", "");
        let xml = render(&request);
        assert!(xml.contains(
            "</invoice><params>\
             <param><name>baz</name><value>1</value></param>\
             <param><name>foo</name><value>bar</value></param>\
             </params><url>"
        ));
        assert!(!xml.contains("blank"));
    }

    #[test]
    fn test_no_params_block_when_all_dropped() {
        let xml = render(&request().with_param("", "x"));
        assert!(!xml.contains("<params>"));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let mut request = request().with_param("q", "a<b&c>d");
        request.details = "Fish & <Chips>".to_string();
        request.order_id = "id\"1".to_string();
        let xml = render(&request);
        assert!(xml.contains("<details>Fish &amp; &lt;Chips&gt;</details>"));
        assert!(xml.contains("<value>a&lt;b&amp;c&gt;d</value>"));
        assert!(xml.contains("id=\"id&quot;1\""));
    }

    #[test]
    fn test_apostrophes_stay_literal_in_attributes() {
        let mut request = request();
        request.order_id = "o'brien-1".to_string();
        request.customer_id = "line\nbreak".to_string();
        let xml = render(&request);
        assert!(xml.contains("id=\"o'brien-1\""));
        assert!(xml.contains("customer_id=\"line&#10;break\""));
    }
}
