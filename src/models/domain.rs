use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::distance::GeoPoint;
use crate::core::proximity::HasLocation;

/// ABA therapy center
///
/// ABA centers carry a street address but no coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AbaCenter {
    pub id: Uuid,
    pub name: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub phone: String,
    pub service_type: String,
    pub waitlist_availability: Option<String>,
    pub waitlist_notes: Option<String>,
    pub dx_verification: Option<String>,
    pub insurance_accepted: Option<String>,
    pub medi_cal_plans: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Medical diagnosis that resource centers can be linked to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Diagnosis {
    pub id: Uuid,
    pub name: String,
}

/// Contact form or facility submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FormSubmission {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub facility_id: Option<String>,
    pub facility_type: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Service provider listed by coverage area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Provider {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub coverage_areas: Option<String>,
    pub center_based_services: Option<String>,
    pub areas: Vec<String>,
}

/// Regional center office; coordinates are optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RegionalCenter {
    pub id: i32,
    pub regional_center: Option<String>,
    pub office_type: Option<String>,
    pub address: Option<String>,
    pub suite: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub telephone: Option<String>,
    pub website: Option<String>,
    pub county_served: Option<String>,
    pub los_angeles_health_district: Option<String>,
    pub location_coordinates: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Resource center with its linked diagnoses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ResourceCenter {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[sqlx(json)]
    #[serde(default)]
    pub diagnoses: Vec<Diagnosis>,
}

/// Community resource tagged with diagnosis names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Resource {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub diagnoses: Vec<String>,
    pub address: Option<String>,
    pub contact_info: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HasLocation for ResourceCenter {
    fn location(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.latitude, self.longitude))
    }
}

impl HasLocation for Resource {
    fn location(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.latitude, self.longitude))
    }
}

impl HasLocation for RegionalCenter {
    fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude, self.longitude)
    }
}

/// Per-user map and search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserPreferences {
    pub id: Option<i32>,
    pub user_id: String,

    pub map_type: String,
    pub default_zoom: i32,
    pub show_facilities: bool,

    pub show_aba_centers: bool,
    pub show_resource_centers: bool,
    pub show_regional_centers: bool,
    pub show_providers: bool,

    /// Miles
    pub preferred_radius: f64,
    pub require_waitlist: bool,
    pub require_insurance: bool,
    /// JSON array of diagnosis ids, stored as text
    pub preferred_diagnoses: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserPreferences {
    /// Preferences served to a user who has never saved any
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            map_type: default_map_type(),
            default_zoom: default_zoom(),
            show_facilities: true,
            show_aba_centers: true,
            show_resource_centers: true,
            show_regional_centers: true,
            show_providers: true,
            preferred_radius: default_preferred_radius(),
            require_waitlist: false,
            require_insurance: false,
            preferred_diagnoses: None,
            created_at: None,
            updated_at: None,
        }
    }
}

pub(crate) fn default_map_type() -> String {
    "roadmap".to_string()
}

pub(crate) fn default_zoom() -> i32 {
    10
}

pub(crate) fn default_preferred_radius() -> f64 {
    25.0
}
