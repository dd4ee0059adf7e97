use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::core::GeoPoint;
use crate::models::domain::{default_map_type, default_preferred_radius, default_zoom};

/// Client input that cannot be turned into a valid request
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    #[error("Invalid {0}")]
    InvalidNumber(&'static str),

    #[error("lat, lng, and radius must be supplied together")]
    IncompleteLocation,

    #[error("radius must not exceed {max} miles")]
    RadiusTooLarge { max: f64 },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Validated center point and search radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProximityParams {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = 0.0))]
    pub radius_miles: f64,
}

impl ProximityParams {
    /// Parse and range-check raw `lat`, `lng` and `radius` values
    pub fn parse(lat: &str, lng: &str, radius: &str, max_radius_miles: f64) -> Result<Self, RequestError> {
        let params = Self {
            latitude: parse_number(lat, "latitude")?,
            longitude: parse_number(lng, "longitude")?,
            radius_miles: parse_number(radius, "radius")?,
        };
        params.validate()?;

        if params.radius_miles > max_radius_miles {
            return Err(RequestError::RadiusTooLarge { max: max_radius_miles });
        }

        Ok(params)
    }

    /// Proximity is optional on list endpoints, but all-or-nothing
    pub fn parse_optional(
        lat: Option<&str>,
        lng: Option<&str>,
        radius: Option<&str>,
        max_radius_miles: f64,
    ) -> Result<Option<Self>, RequestError> {
        match (non_blank(lat), non_blank(lng), non_blank(radius)) {
            (None, None, None) => Ok(None),
            (Some(lat), Some(lng), Some(radius)) => {
                Self::parse(lat, lng, radius, max_radius_miles).map(Some)
            }
            _ => Err(RequestError::IncompleteLocation),
        }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(raw: &str, field: &'static str) -> Result<f64, RequestError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(RequestError::InvalidNumber(field))
}

/// Parsed `GET /search/nearby` query
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchRequest {
    pub proximity: ProximityParams,
    pub types: Vec<String>,
}

impl NearbySearchRequest {
    /// Build from raw query pairs
    ///
    /// `types` may repeat and each value may hold a comma-separated list.
    pub fn from_pairs(pairs: &[(String, String)], max_radius_miles: f64) -> Result<Self, RequestError> {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .and_then(|v| non_blank(Some(v)))
        };

        let lat = first("lat").ok_or(RequestError::MissingParameter("lat"))?;
        let lng = first("lng").ok_or(RequestError::MissingParameter("lng"))?;
        let radius = first("radius").ok_or(RequestError::MissingParameter("radius"))?;

        let proximity = ProximityParams::parse(lat, lng, radius, max_radius_miles)?;

        let types = pairs
            .iter()
            .filter(|(k, _)| k == "types" || k == "types[]")
            .flat_map(|(_, v)| v.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self { proximity, types })
    }
}

/// `GET /aba-centers` filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbaCenterQuery {
    pub city: Option<String>,
    pub service_type: Option<String>,
    pub insurance: Option<String>,
    /// Only the literal `true` turns the filter on
    pub waitlist: Option<String>,
    pub search: Option<String>,
}

impl AbaCenterQuery {
    pub fn waitlist_only(&self) -> bool {
        self.waitlist.as_deref() == Some("true")
    }
}

/// `GET /resource-centers` filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceCenterQuery {
    pub search: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

/// `GET /resources` filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceQuery {
    pub search: Option<String>,
    pub diagnosis: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

/// `GET /regional-centers` filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionalCenterQuery {
    pub county: Option<String>,
    pub search: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

/// `GET /providers` filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderQuery {
    pub search: Option<String>,
    pub area: Option<String>,
}

/// Admin request to create an ABA center
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAbaCenterRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub street: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub zip: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub service_type: String,
    pub waitlist_availability: Option<String>,
    pub waitlist_notes: Option<String>,
    pub dx_verification: Option<String>,
    pub insurance_accepted: Option<String>,
    pub medi_cal_plans: Option<String>,
    pub notes: Option<String>,
}

/// Public submission of a new ABA center for review
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AbaCenterSubmission {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub service_type: String,
    #[serde(default)]
    pub waitlist_availability: Option<String>,
    #[validate(length(min = 1))]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 1))]
    pub zip_code: String,
    #[serde(default)]
    pub insurance_accepted: Option<String>,
    #[serde(default)]
    pub description: Option<String>,

    #[validate(length(min = 1))]
    pub submitter_name: String,
    #[validate(email)]
    pub submitter_email: String,
    #[validate(length(min = 1))]
    pub relationship: String,
}

impl AbaCenterSubmission {
    /// Message stored on the tracking form submission
    pub fn review_message(&self) -> String {
        format!(
            "ABA Center Submission: {}\n\nDetails:\n{}",
            self.name,
            self.description.as_deref().unwrap_or_default()
        )
    }
}

/// Public correction or extra information for a regional center
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegionalCenterUpdateSubmission {
    #[serde(default)]
    pub regional_center_id: Option<String>,
    #[serde(default)]
    pub regional_center_name: Option<String>,

    /// One of contact_info, services, hours, other
    #[validate(length(min = 1))]
    pub update_type: String,
    #[validate(length(min = 1))]
    pub update_description: String,

    #[serde(default)]
    pub new_phone: Option<String>,
    #[serde(default)]
    pub new_email: Option<String>,
    #[serde(default)]
    pub new_website: Option<String>,
    #[serde(default)]
    pub new_address: Option<String>,

    #[serde(default)]
    pub services_offered: Option<String>,
    #[serde(default)]
    pub eligibility_criteria: Option<String>,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub special_programs: Option<String>,

    #[validate(length(min = 1))]
    pub submitter_name: String,
    #[validate(email)]
    pub submitter_email: String,
    #[validate(length(min = 1))]
    pub relationship: String,
}

impl RegionalCenterUpdateSubmission {
    /// Message stored on the tracking form submission
    ///
    /// Optional fields are appended only when non-empty.
    pub fn review_message(&self) -> String {
        let mut message = format!(
            "Regional Center Update: {}\n\nUpdate Type: {}\n\nDescription: {}",
            self.regional_center_name.as_deref().unwrap_or_default(),
            self.update_type,
            self.update_description
        );

        let extras = [
            ("New Phone", &self.new_phone),
            ("New Email", &self.new_email),
            ("New Website", &self.new_website),
            ("New Address", &self.new_address),
            ("Services Offered", &self.services_offered),
            ("Eligibility Criteria", &self.eligibility_criteria),
            ("Operating Hours", &self.operating_hours),
            ("Special Programs", &self.special_programs),
        ];

        for (label, value) in extras {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                message.push_str(&format!("\n{}: {}", label, value));
            }
        }

        message
    }
}

/// Contact form body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFormSubmissionRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default)]
    pub facility_id: Option<String>,
    #[serde(default)]
    pub facility_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `PUT /preferences/{user_id}` body; omitted fields take their defaults
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePreferencesRequest {
    #[serde(default = "default_map_type")]
    #[validate(length(min = 1, max = 50))]
    pub map_type: String,
    #[serde(default = "default_zoom")]
    #[validate(range(min = 0, max = 22))]
    pub default_zoom: i32,
    #[serde(default = "default_true")]
    pub show_facilities: bool,
    #[serde(default = "default_true")]
    pub show_aba_centers: bool,
    #[serde(default = "default_true")]
    pub show_resource_centers: bool,
    #[serde(default = "default_true")]
    pub show_regional_centers: bool,
    #[serde(default = "default_true")]
    pub show_providers: bool,
    #[serde(default = "default_preferred_radius")]
    #[validate(range(min = 0.0))]
    pub preferred_radius: f64,
    #[serde(default)]
    pub require_waitlist: bool,
    #[serde(default)]
    pub require_insurance: bool,
    #[serde(default)]
    pub preferred_diagnoses: Option<String>,
}

fn default_true() -> bool {
    true
}
