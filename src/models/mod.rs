// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AbaCenter, Diagnosis, FormSubmission, Provider, RegionalCenter, Resource, ResourceCenter, UserPreferences};
pub use requests::{
    AbaCenterQuery, AbaCenterSubmission, CreateAbaCenterRequest, CreateFormSubmissionRequest, NearbySearchRequest,
    ProviderQuery, ProximityParams, RegionalCenterQuery, RegionalCenterUpdateSubmission, RequestError,
    ResourceCenterQuery, ResourceQuery, UpdatePreferencesRequest,
};
pub use responses::{ErrorResponse, HealthResponse, SubmissionResponse};
