//! Test fixtures for common test data

use serde_json::{json, Value};

use product_catalog::soap::{PRODUCTS_NS, SOAP_ENV_NS};

pub fn acme() -> Value {
    json!({"name": "Acme"})
}

pub fn tools() -> Value {
    json!({"name": "Tools", "description": "Hand tools"})
}

/// A product referencing existing rows by id
pub fn product_ref(name: &str, organization_id: i64, category_id: i64) -> Value {
    json!({
        "name": name,
        "organization": {"id": organization_id},
        "category": {"id": category_id}
    })
}

/// Wrap a payload in a SOAP 1.1 envelope
pub fn soap_envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="{SOAP_ENV_NS}" xmlns:prod="{PRODUCTS_NS}">
  <soapenv:Header/>
  <soapenv:Body>{body}</soapenv:Body>
</soapenv:Envelope>"#
    )
}

pub fn get_products_request() -> String {
    soap_envelope("<prod:GetProductsRequest/>")
}

/// CreateProduct referencing an organization and category by id
pub fn create_product_request(name: &str, organization_id: i64, category_id: i64) -> String {
    soap_envelope(&format!(
        r#"<prod:CreateProductRequest>
  <prod:product>
    <prod:name>{name}</prod:name>
    <prod:organization><prod:id>{organization_id}</prod:id></prod:organization>
    <prod:category><prod:id>{category_id}</prod:id></prod:category>
  </prod:product>
</prod:CreateProductRequest>"#
    ))
}
