use actix_web::{web, HttpResponse};
use validator::Validate;

use super::error::ApiError;
use super::AppState;
use crate::models::{AbaCenterSubmission, CreateFormSubmissionRequest, RegionalCenterUpdateSubmission, SubmissionResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/aba-centers/submit", web::post().to(submit_aba_center))
        .route("/regional-centers/submit-update", web::post().to(submit_regional_center_update))
        .route("/form-submissions", web::post().to(create_form_submission));
}

/// POST /api/v1/aba-centers/submit
///
/// Stores the center for review along with a tracking form submission.
async fn submit_aba_center(
    state: web::Data<AppState>,
    body: web::Json<AbaCenterSubmission>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    tracing::info!("ABA center submission for {} from {}", body.name, body.submitter_name);

    let center = state.postgres.submit_aba_center(&body).await?;

    Ok(HttpResponse::Created().json(SubmissionResponse::pending(
        "ABA center submission received successfully",
        center.id,
    )))
}

/// POST /api/v1/regional-centers/submit-update
async fn submit_regional_center_update(
    state: web::Data<AppState>,
    body: web::Json<RegionalCenterUpdateSubmission>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    tracing::info!(
        "Regional center update for {:?}: type={}, submitter={}",
        body.regional_center_name,
        body.update_type,
        body.submitter_name
    );

    let submission = state.postgres.submit_regional_center_update(&body).await?;

    Ok(HttpResponse::Created().json(SubmissionResponse::pending(
        "Regional center update submission received successfully",
        submission.id,
    )))
}

/// POST /api/v1/form-submissions
async fn create_form_submission(
    state: web::Data<AppState>,
    body: web::Json<CreateFormSubmissionRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let submission = state.postgres.create_form_submission(&body).await?;

    tracing::info!("Created form submission {}", submission.id);
    Ok(HttpResponse::Created().json(submission))
}
