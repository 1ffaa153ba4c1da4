//! Wire DTOs for the Lardi-Trans API.
//!
//! # Design
//! Optional fields of `CargoRequest` are plain values rather than `Option`s:
//! a zero, empty, or `false` value is treated as "not set" and left out of
//! the JSON payload. Callers fill what they need and take the rest from
//! `Default`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

fn is_zero_f64(value: &f64) -> bool {
    *value == 0.0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Request body for `POST /v2/proposals/my/add/cargo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CargoRequest {
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub contact_id: i64,
    /// Loading window start, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date_from: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date_to: String,
    #[serde(rename = "paymentPrice", skip_serializing_if = "is_zero_i64")]
    pub payment_value: i64,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub payment_currency_id: i64,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub payment_unit_id: i64,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub payment_moment_id: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cargo_body_type_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cargo_packaging: Vec<CargoPackaging>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub payment_forms: Vec<PaymentForm>,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub lorry_amount: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub load_types: Vec<i64>,
    #[serde(skip_serializing_if = "is_false")]
    pub groupage: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content_name: String,
    /// Tonnes.
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub size_mass: f64,
    /// Cubic metres.
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub size_volume: f64,
    pub waypoint_list_source: Vec<LoadParams>,
    pub waypoint_list_target: Vec<LoadParams>,
}

impl CargoRequest {
    /// Both waypoint lists must be non-empty before the request is sent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.waypoint_list_source.is_empty() {
            return Err(ValidationError::MissingWaypointSource);
        }
        if self.waypoint_list_target.is_empty() {
            return Err(ValidationError::MissingWaypointTarget);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentForm {
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub id: i64,
    #[serde(skip_serializing_if = "is_false")]
    pub vat: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CargoPackaging {
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub id: i64,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub count: i64,
}

/// A loading or unloading point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadParams {
    pub town_name: String,
    pub area_id: i64,
    /// ISO country code, e.g. `UA`.
    pub country_sign: String,
    pub region_id: i64,
    #[serde(rename = "postCode")]
    pub post_codes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One row of any reference list (currencies, units, body types, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub contact_id: i64,
    #[serde(rename = "face", alias = "contactName")]
    pub contact_name: String,
}

/// Identifier assigned to a newly created cargo proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CargoResponse {
    pub id: i64,
}

/// First reference whose name equals `name` exactly, in server order.
pub fn find_by_name<I>(items: I, name: &str) -> Option<Reference>
where
    I: IntoIterator<Item = Reference>,
{
    items.into_iter().find(|item| item.name == name)
}
