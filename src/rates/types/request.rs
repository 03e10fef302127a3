#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use bon::Builder;
use serde::Serialize;

use crate::types::NaiveDate;

/// Query for the rate service's `convert` endpoint.
///
/// Always asks for the value of one unit, so the `result` of the response is the rate itself.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize)]
#[non_exhaustive]
pub struct ConvertRequest {
    #[builder(into)]
    pub from: String,
    #[builder(into)]
    pub to: String,
    #[builder(default = 1)]
    pub amount: u32,
    pub date: NaiveDate,
}
