//! SOAP endpoint for products
//!
//! A single document/literal endpoint serves `GetProducts` and
//! `CreateProduct` in the `http://example.com/products` namespace. Every
//! request gets a SOAP envelope back; failures are sent as faults with
//! HTTP 500.

pub mod envelope;
pub mod fault;
pub mod model;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::{debug, warn};

use crate::db::ProductRepository;
use crate::AppState;
use envelope::SoapRequest;
pub use fault::{FaultCode, SoapFault};
use model::SoapProduct;

pub const PRODUCTS_NS: &str = "http://example.com/products";
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

const CONTENT_TYPE: &str = "text/xml; charset=utf-8";
const WSDL_TEMPLATE: &str = include_str!("products.wsdl");

/// Routes relative to the configured SOAP path
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(dispatch))
        .route("/products.wsdl", get(wsdl))
}

async fn dispatch(State(state): State<AppState>, body: Bytes) -> Response {
    let result = match std::str::from_utf8(&body) {
        Ok(xml) => match envelope::parse_request(xml) {
            Ok(request) => handle(&state, request).await,
            Err(fault) => Err(fault),
        },
        Err(_) => Err(SoapFault::client("Request body is not UTF-8")),
    };

    match result {
        Ok(xml) => (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], xml).into_response(),
        Err(fault) => fault_response(fault),
    }
}

async fn handle(state: &AppState, request: SoapRequest) -> Result<String, SoapFault> {
    debug!(operation = request.operation(), "SOAP request");
    let repo = ProductRepository::new(&state.db);

    match request {
        SoapRequest::GetProducts => {
            let products: Vec<SoapProduct> = repo
                .list_with_associations()
                .await?
                .iter()
                .map(SoapProduct::from)
                .collect();
            envelope::write_get_products_response(&products)
        }
        SoapRequest::CreateProduct(product) => {
            let created = repo.create(product.into()).await?;
            envelope::write_create_product_response(&SoapProduct::from(&created))
        }
    }
}

fn fault_response(fault: SoapFault) -> Response {
    if fault.code == FaultCode::Client {
        warn!(fault = %fault, "SOAP request rejected");
    }

    match envelope::write_fault(&fault) {
        Ok(xml) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, CONTENT_TYPE)],
            xml,
        )
            .into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, fault.message).into_response(),
    }
}

/// The service description, with the address pointing back at this server
async fn wsdl(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let location = format!("http://{}{}", host, state.config.soap.path);
    let body = WSDL_TEMPLATE.replace(
        "{{LOCATION}}",
        &quick_xml::escape::escape(location.as_str()),
    );

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}
