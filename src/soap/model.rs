//! SOAP shapes of the product aggregate
//!
//! These mirror the XSD types in `products.wsdl`. Every scalar is optional
//! because the XML may omit it; the nested organization and category are
//! optional so a product can be written even when one is missing, in which
//! case the writer still emits an empty element.

use std::borrow::Cow;

use crate::models::{Category, CategoryRef, CreateProductRequest, Organization, OrganizationRef, Product};
use crate::utils::validation::FieldSpec;

/// Value of one schema field, as seen by the XML writer
pub enum SoapValue<'a> {
    Text(Option<Cow<'a, str>>),
    Element(Option<&'a dyn SoapElement>),
}

/// A type the XML writer can serialize field by field in schema order
pub trait SoapElement {
    fn fields(&self) -> &'static [FieldSpec];
    fn value(&self, field: &str) -> SoapValue<'_>;
}

fn id_text(id: Option<i64>) -> SoapValue<'static> {
    SoapValue::Text(id.map(|id| Cow::Owned(id.to_string())))
}

fn str_text(value: &Option<String>) -> SoapValue<'_> {
    SoapValue::Text(value.as_deref().map(Cow::Borrowed))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoapOrganization {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoapCategory {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoapProduct {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub organization: Option<SoapOrganization>,
    pub category: Option<SoapCategory>,
}

impl SoapElement for SoapOrganization {
    fn fields(&self) -> &'static [FieldSpec] {
        Organization::FIELDS
    }

    fn value(&self, field: &str) -> SoapValue<'_> {
        match field {
            "id" => id_text(self.id),
            "name" => str_text(&self.name),
            _ => SoapValue::Text(None),
        }
    }
}

impl SoapElement for SoapCategory {
    fn fields(&self) -> &'static [FieldSpec] {
        Category::FIELDS
    }

    fn value(&self, field: &str) -> SoapValue<'_> {
        match field {
            "id" => id_text(self.id),
            "name" => str_text(&self.name),
            "description" => str_text(&self.description),
            _ => SoapValue::Text(None),
        }
    }
}

impl SoapElement for SoapProduct {
    fn fields(&self) -> &'static [FieldSpec] {
        Product::FIELDS
    }

    fn value(&self, field: &str) -> SoapValue<'_> {
        match field {
            "id" => id_text(self.id),
            "name" => str_text(&self.name),
            "organization" => SoapValue::Element(
                self.organization
                    .as_ref()
                    .map(|o| o as &dyn SoapElement),
            ),
            "category" => {
                SoapValue::Element(self.category.as_ref().map(|c| c as &dyn SoapElement))
            }
            _ => SoapValue::Text(None),
        }
    }
}

impl From<&Product> for SoapProduct {
    fn from(p: &Product) -> Self {
        SoapProduct {
            id: Some(p.id),
            name: Some(p.name.clone()),
            organization: Some(SoapOrganization {
                id: Some(p.organization.id),
                name: Some(p.organization.name.clone()),
            }),
            category: Some(SoapCategory {
                id: Some(p.category.id),
                name: Some(p.category.name.clone()),
                description: p.category.description.clone(),
            }),
        }
    }
}

/// Embedded ids are passed through; the store treats them as references.
impl From<SoapProduct> for CreateProductRequest {
    fn from(sp: SoapProduct) -> Self {
        CreateProductRequest {
            name: sp.name,
            organization: sp.organization.map(|o| OrganizationRef {
                id: o.id,
                name: o.name,
            }),
            category: sp.category.map(|c| CategoryRef {
                id: c.id,
                name: c.name,
                description: c.description,
            }),
        }
    }
}
