use serde::{Deserialize, Serialize};

/// Caller-constructed description of the property being appraised.
///
/// Every field is optional; an absent field means "do not score on this
/// dimension". Non-positive numeric values are treated as absent by the
/// scorer, validation belongs to the transport layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryProfile {
    /// Address text, matched by keyword overlap
    pub address: Option<String>,

    /// Administrative district
    pub district: Option<String>,

    /// Property usage
    pub usage: Option<String>,

    /// Restricts candidates to one report type before scoring
    pub report_type: Option<String>,

    /// Floor area in square meters
    pub area: Option<f64>,

    /// Unit price
    pub price: Option<f64>,

    /// Floor the unit sits on
    pub floor: Option<i32>,

    /// Year of construction
    pub build_year: Option<i32>,

    /// Free-text query for vector recall in hybrid search
    pub query: Option<String>,
}

impl QueryProfile {
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn report_type(mut self, report_type: impl Into<String>) -> Self {
        self.report_type = Some(report_type.into());
        self
    }

    pub fn area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn floor(mut self, floor: i32) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn build_year(mut self, build_year: i32) -> Self {
        self.build_year = Some(build_year);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}
