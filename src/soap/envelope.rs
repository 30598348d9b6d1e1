//! SOAP 1.1 envelope reading and writing
//!
//! Requests are parsed with roxmltree and dispatched on the local name and
//! namespace of the first element inside `Body`. Responses are written with
//! quick-xml, payload elements prefixed `ns2`.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::{Document, Node};

use super::fault::SoapFault;
use super::model::{SoapCategory, SoapElement, SoapOrganization, SoapProduct, SoapValue};
use super::{PRODUCTS_NS, SOAP_ENV_NS};

const PREFIX: &str = "ns2";
const ENV_PREFIX: &str = "SOAP-ENV";

/// A recognized SOAP operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapRequest {
    GetProducts,
    CreateProduct(SoapProduct),
}

impl SoapRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            SoapRequest::GetProducts => "GetProducts",
            SoapRequest::CreateProduct(_) => "CreateProduct",
        }
    }
}

pub fn parse_request(xml: &str) -> Result<SoapRequest, SoapFault> {
    let doc = Document::parse(xml)
        .map_err(|e| SoapFault::client(format!("Malformed XML: {e}")))?;

    let envelope = doc.root_element();
    if envelope.tag_name().name() != "Envelope"
        || envelope.tag_name().namespace() != Some(SOAP_ENV_NS)
    {
        return Err(SoapFault::client("Expected a SOAP 1.1 Envelope"));
    }

    let body = envelope
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "Body")
        .ok_or_else(|| SoapFault::client("SOAP Envelope has no Body"))?;

    let payload = body
        .children()
        .find(|n| n.is_element())
        .ok_or_else(|| SoapFault::client("SOAP Body is empty"))?;

    let name = payload.tag_name().name();
    if payload.tag_name().namespace() != Some(PRODUCTS_NS) {
        return Err(SoapFault::client(format!(
            "No endpoint for {{{}}}{}",
            payload.tag_name().namespace().unwrap_or(""),
            name
        )));
    }

    match name {
        "GetProductsRequest" => Ok(SoapRequest::GetProducts),
        "CreateProductRequest" => {
            let product = child(payload, "product")
                .ok_or_else(|| SoapFault::client("CreateProductRequest has no product"))?;
            Ok(SoapRequest::CreateProduct(read_product(product)?))
        }
        other => Err(SoapFault::client(format!(
            "No endpoint for {{{PRODUCTS_NS}}}{other}"
        ))),
    }
}

/// Payload children may be qualified or unqualified
fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| {
        n.is_element()
            && n.tag_name().name() == name
            && matches!(n.tag_name().namespace(), None | Some(PRODUCTS_NS))
    })
}

/// Element text as sent; blank values are left for validation to reject
fn text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name)
        .and_then(|n| n.text())
        .map(str::to_string)
}

fn id(node: Node<'_, '_>, owner: &str) -> Result<Option<i64>, SoapFault> {
    match text(node, "id") {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| SoapFault::client(format!("Invalid {owner} id '{raw}'"))),
    }
}

fn read_product(node: Node<'_, '_>) -> Result<SoapProduct, SoapFault> {
    let organization = match child(node, "organization") {
        Some(n) => Some(SoapOrganization {
            id: id(n, "organization")?,
            name: text(n, "name"),
        }),
        None => None,
    };

    let category = match child(node, "category") {
        Some(n) => Some(SoapCategory {
            id: id(n, "category")?,
            name: text(n, "name"),
            description: text(n, "description"),
        }),
        None => None,
    };

    Ok(SoapProduct {
        id: id(node, "product")?,
        name: text(node, "name"),
        organization,
        category,
    })
}

struct XmlWriter {
    inner: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    fn new() -> Result<Self, SoapFault> {
        let mut writer = Self {
            inner: Writer::new(Cursor::new(Vec::new())),
        };
        writer.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(writer)
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), SoapFault> {
        self.inner
            .write_event(event)
            .map(|_| ())
            .map_err(|e| SoapFault::server(format!("Failed to write XML: {e}")))
    }

    fn start(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<(), SoapFault> {
        let mut element = BytesStart::new(tag);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }
        self.emit(Event::Start(element))
    }

    fn end(&mut self, tag: &str) -> Result<(), SoapFault> {
        self.emit(Event::End(BytesEnd::new(tag)))
    }

    fn empty(&mut self, tag: &str) -> Result<(), SoapFault> {
        self.emit(Event::Empty(BytesStart::new(tag)))
    }

    fn text_element(&mut self, tag: &str, value: &str) -> Result<(), SoapFault> {
        self.start(tag, &[])?;
        self.emit(Event::Text(BytesText::new(value)))?;
        self.end(tag)
    }

    /// Write `element` under `<ns2:{local}>` following its field schema
    fn element(&mut self, local: &str, element: Option<&dyn SoapElement>) -> Result<(), SoapFault> {
        let tag = format!("{PREFIX}:{local}");
        let Some(element) = element else {
            return self.empty(&tag);
        };

        self.start(&tag, &[])?;
        for spec in element.fields() {
            let field = format!("{PREFIX}:{}", spec.name);
            match element.value(spec.name) {
                SoapValue::Text(Some(value)) => self.text_element(&field, &value)?,
                SoapValue::Text(None) => {}
                SoapValue::Element(nested) => self.element(spec.name, nested)?,
            }
        }
        self.end(&tag)
    }

    fn open_envelope(&mut self) -> Result<(), SoapFault> {
        let envelope = format!("{ENV_PREFIX}:Envelope");
        let xmlns = format!("xmlns:{ENV_PREFIX}");
        self.start(&envelope, &[(xmlns.as_str(), SOAP_ENV_NS)])?;
        self.empty(&format!("{ENV_PREFIX}:Header"))?;
        self.start(&format!("{ENV_PREFIX}:Body"), &[])
    }

    fn close_envelope(&mut self) -> Result<(), SoapFault> {
        self.end(&format!("{ENV_PREFIX}:Body"))?;
        self.end(&format!("{ENV_PREFIX}:Envelope"))
    }

    fn open_payload(&mut self, local: &str) -> Result<String, SoapFault> {
        let tag = format!("{PREFIX}:{local}");
        let xmlns = format!("xmlns:{PREFIX}");
        self.start(&tag, &[(xmlns.as_str(), PRODUCTS_NS)])?;
        Ok(tag)
    }

    fn finish(self) -> Result<String, SoapFault> {
        String::from_utf8(self.inner.into_inner().into_inner())
            .map_err(|e| SoapFault::server(format!("Response is not UTF-8: {e}")))
    }
}

pub fn write_get_products_response(products: &[SoapProduct]) -> Result<String, SoapFault> {
    let mut w = XmlWriter::new()?;
    w.open_envelope()?;
    let payload = w.open_payload("GetProductsResponse")?;
    let list = format!("{PREFIX}:products");
    w.start(&list, &[])?;
    for product in products {
        w.element("product", Some(product as &dyn SoapElement))?;
    }
    w.end(&list)?;
    w.end(&payload)?;
    w.close_envelope()?;
    w.finish()
}

pub fn write_create_product_response(product: &SoapProduct) -> Result<String, SoapFault> {
    let mut w = XmlWriter::new()?;
    w.open_envelope()?;
    let payload = w.open_payload("CreateProductResponse")?;
    w.element("product", Some(product as &dyn SoapElement))?;
    w.end(&payload)?;
    w.close_envelope()?;
    w.finish()
}

pub fn write_fault(fault: &SoapFault) -> Result<String, SoapFault> {
    let mut w = XmlWriter::new()?;
    w.open_envelope()?;
    let tag = format!("{ENV_PREFIX}:Fault");
    w.start(&tag, &[])?;
    w.text_element("faultcode", &format!("{ENV_PREFIX}:{}", fault.code.as_str()))?;
    w.start("faultstring", &[("xml:lang", "en")])?;
    w.emit(Event::Text(BytesText::new(&fault.message)))?;
    w.end("faultstring")?;
    w.end(&tag)?;
    w.close_envelope()?;
    w.finish()
}
