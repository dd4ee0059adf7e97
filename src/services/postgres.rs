use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DatabaseSettings;
use crate::core::{EntityCollection, EntityType, FacilityStore};
use crate::models::{
    AbaCenter, AbaCenterQuery, AbaCenterSubmission, CreateAbaCenterRequest, CreateFormSubmissionRequest, Diagnosis,
    FormSubmission, Provider, ProviderQuery, RegionalCenter, RegionalCenterQuery, RegionalCenterUpdateSubmission,
    Resource, ResourceCenter, ResourceCenterQuery, ResourceQuery, SubmissionResponse, UpdatePreferencesRequest,
    UserPreferences,
};
use crate::services::queries::{
    self, ABA_CENTER_COLUMNS, FORM_SUBMISSION_COLUMNS, RESOURCE_CENTER_SELECT, RESOURCE_COLUMNS,
    USER_PREFERENCES_COLUMNS,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Form submission types recorded for public submissions
pub const ABA_CENTER_SUBMISSION: &str = "aba_center_submission";
pub const REGIONAL_CENTER_UPDATE: &str = "regional_center_update";

/// PostgreSQL client backing every facility endpoint
///
/// Reads are plain `SELECT`s; filter predicates are assembled in
/// [`queries`]. Proximity filtering happens in memory on the results.
#[derive(Clone)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a client around an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new PostgreSQL client from settings
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, PostgresError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {}, min: {} connections)",
            settings.max_connections,
            settings.min_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
            .test_before_acquire(true)
            .connect(&settings.url)
            .await?;

        if settings.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(Self { pool })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    pub async fn list_aba_centers(&self, filter: &AbaCenterQuery) -> Result<Vec<AbaCenter>, PostgresError> {
        let mut query = queries::aba_centers(filter);
        let centers = query.build_query_as::<AbaCenter>().fetch_all(&self.pool).await?;

        tracing::debug!("Fetched {} ABA centers", centers.len());
        Ok(centers)
    }

    pub async fn get_aba_center(&self, id: Uuid) -> Result<AbaCenter, PostgresError> {
        let sql = format!("SELECT {} FROM aba_centers WHERE id = $1", ABA_CENTER_COLUMNS);

        sqlx::query_as::<_, AbaCenter>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("ABA center {}", id)))
    }

    pub async fn create_aba_center(&self, center: &CreateAbaCenterRequest) -> Result<AbaCenter, PostgresError> {
        let sql = format!(
            r#"
            INSERT INTO aba_centers (
                name, street, city, zip, phone, service_type,
                waitlist_availability, waitlist_notes, dx_verification,
                insurance_accepted, medi_cal_plans, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            ABA_CENTER_COLUMNS
        );

        let created = sqlx::query_as::<_, AbaCenter>(&sql)
            .bind(&center.name)
            .bind(&center.street)
            .bind(&center.city)
            .bind(&center.zip)
            .bind(&center.phone)
            .bind(&center.service_type)
            .bind(&center.waitlist_availability)
            .bind(&center.waitlist_notes)
            .bind(&center.dx_verification)
            .bind(&center.insurance_accepted)
            .bind(&center.medi_cal_plans)
            .bind(&center.notes)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created ABA center {} ({})", created.name, created.id);
        Ok(created)
    }

    /// Record a public ABA center submission
    ///
    /// The tracking form submission and the pending center are written in
    /// one transaction; the submission is then pointed at the new center.
    pub async fn submit_aba_center(&self, submission: &AbaCenterSubmission) -> Result<AbaCenter, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let submission_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO form_submissions (name, email, phone, message, facility_type, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&submission.submitter_name)
        .bind(&submission.submitter_email)
        .bind(&submission.phone)
        .bind(submission.review_message())
        .bind(ABA_CENTER_SUBMISSION)
        .bind(SubmissionResponse::PENDING_REVIEW)
        .fetch_one(&mut *tx)
        .await?;

        let sql = format!(
            r#"
            INSERT INTO aba_centers (
                name, street, city, zip, phone, service_type,
                insurance_accepted, waitlist_availability
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            ABA_CENTER_COLUMNS
        );

        let center = sqlx::query_as::<_, AbaCenter>(&sql)
            .bind(&submission.name)
            .bind(&submission.address)
            .bind(&submission.city)
            .bind(&submission.zip_code)
            .bind(&submission.phone)
            .bind(&submission.service_type)
            .bind(&submission.insurance_accepted)
            .bind(&submission.waitlist_availability)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE form_submissions SET facility_id = $1 WHERE id = $2")
            .bind(center.id.to_string())
            .bind(submission_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Recorded ABA center submission {} for center {} ({})",
            submission_id,
            center.name,
            center.id
        );
        Ok(center)
    }

    pub async fn list_resource_centers(
        &self,
        filter: &ResourceCenterQuery,
    ) -> Result<Vec<ResourceCenter>, PostgresError> {
        let mut query = queries::resource_centers(filter);
        let centers = query.build_query_as::<ResourceCenter>().fetch_all(&self.pool).await?;

        tracing::debug!("Fetched {} resource centers", centers.len());
        Ok(centers)
    }

    pub async fn get_resource_center(&self, id: Uuid) -> Result<ResourceCenter, PostgresError> {
        let sql = format!("{} WHERE rc.id = $1", RESOURCE_CENTER_SELECT);

        sqlx::query_as::<_, ResourceCenter>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Resource center {}", id)))
    }

    pub async fn list_resources(&self, filter: &ResourceQuery) -> Result<Vec<Resource>, PostgresError> {
        let mut query = queries::resources(filter);
        let resources = query.build_query_as::<Resource>().fetch_all(&self.pool).await?;

        tracing::debug!("Fetched {} resources", resources.len());
        Ok(resources)
    }

    pub async fn get_resource(&self, id: Uuid) -> Result<Resource, PostgresError> {
        let sql = format!("SELECT {} FROM resources WHERE id = $1", RESOURCE_COLUMNS);

        sqlx::query_as::<_, Resource>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Resource {}", id)))
    }

    pub async fn list_regional_centers(
        &self,
        filter: &RegionalCenterQuery,
    ) -> Result<Vec<RegionalCenter>, PostgresError> {
        let mut query = queries::regional_centers(filter);
        let centers = query.build_query_as::<RegionalCenter>().fetch_all(&self.pool).await?;

        tracing::debug!("Fetched {} regional centers", centers.len());
        Ok(centers)
    }

    /// Record a public correction for a regional center
    pub async fn submit_regional_center_update(
        &self,
        submission: &RegionalCenterUpdateSubmission,
    ) -> Result<FormSubmission, PostgresError> {
        let sql = format!(
            r#"
            INSERT INTO form_submissions (name, email, phone, message, facility_id, facility_type, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            FORM_SUBMISSION_COLUMNS
        );

        let created = sqlx::query_as::<_, FormSubmission>(&sql)
            .bind(&submission.submitter_name)
            .bind(&submission.submitter_email)
            .bind(&submission.new_phone)
            .bind(submission.review_message())
            .bind(&submission.regional_center_id)
            .bind(REGIONAL_CENTER_UPDATE)
            .bind(SubmissionResponse::PENDING_REVIEW)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(
            "Recorded regional center update {} ({})",
            created.id,
            submission.update_type
        );
        Ok(created)
    }

    pub async fn list_providers(&self, filter: &ProviderQuery) -> Result<Vec<Provider>, PostgresError> {
        let mut query = queries::providers(filter);
        let providers = query.build_query_as::<Provider>().fetch_all(&self.pool).await?;

        tracing::debug!("Fetched {} providers", providers.len());
        Ok(providers)
    }

    pub async fn list_diagnoses(&self) -> Result<Vec<Diagnosis>, PostgresError> {
        let diagnoses = sqlx::query_as::<_, Diagnosis>("SELECT id, name FROM diagnoses ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(diagnoses)
    }

    pub async fn create_form_submission(
        &self,
        submission: &CreateFormSubmissionRequest,
    ) -> Result<FormSubmission, PostgresError> {
        let sql = format!(
            r#"
            INSERT INTO form_submissions (name, email, phone, message, facility_id, facility_type, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            FORM_SUBMISSION_COLUMNS
        );

        let created = sqlx::query_as::<_, FormSubmission>(&sql)
            .bind(&submission.name)
            .bind(&submission.email)
            .bind(&submission.phone)
            .bind(&submission.message)
            .bind(&submission.facility_id)
            .bind(&submission.facility_type)
            .bind(&submission.status)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Stored preferences, or the defaults when the user has none
    pub async fn get_preferences(&self, user_id: &str) -> Result<UserPreferences, PostgresError> {
        let sql = format!(
            "SELECT {} FROM user_preferences WHERE user_id = $1",
            USER_PREFERENCES_COLUMNS
        );

        let stored = sqlx::query_as::<_, UserPreferences>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(stored.unwrap_or_else(|| {
            tracing::debug!("No stored preferences for {}, serving defaults", user_id);
            UserPreferences::defaults_for(user_id)
        }))
    }

    /// Insert or replace a user's preferences
    pub async fn upsert_preferences(
        &self,
        user_id: &str,
        prefs: &UpdatePreferencesRequest,
    ) -> Result<UserPreferences, PostgresError> {
        let sql = format!(
            r#"
            INSERT INTO user_preferences (
                user_id, map_type, default_zoom, show_facilities,
                show_aba_centers, show_resource_centers, show_regional_centers, show_providers,
                preferred_radius, require_waitlist, require_insurance, preferred_diagnoses,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW(), NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                map_type = EXCLUDED.map_type,
                default_zoom = EXCLUDED.default_zoom,
                show_facilities = EXCLUDED.show_facilities,
                show_aba_centers = EXCLUDED.show_aba_centers,
                show_resource_centers = EXCLUDED.show_resource_centers,
                show_regional_centers = EXCLUDED.show_regional_centers,
                show_providers = EXCLUDED.show_providers,
                preferred_radius = EXCLUDED.preferred_radius,
                require_waitlist = EXCLUDED.require_waitlist,
                require_insurance = EXCLUDED.require_insurance,
                preferred_diagnoses = EXCLUDED.preferred_diagnoses,
                updated_at = NOW()
            RETURNING {}
            "#,
            USER_PREFERENCES_COLUMNS
        );

        let saved = sqlx::query_as::<_, UserPreferences>(&sql)
            .bind(user_id)
            .bind(&prefs.map_type)
            .bind(prefs.default_zoom)
            .bind(prefs.show_facilities)
            .bind(prefs.show_aba_centers)
            .bind(prefs.show_resource_centers)
            .bind(prefs.show_regional_centers)
            .bind(prefs.show_providers)
            .bind(prefs.preferred_radius)
            .bind(prefs.require_waitlist)
            .bind(prefs.require_insurance)
            .bind(&prefs.preferred_diagnoses)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Saved preferences for {}", user_id);
        Ok(saved)
    }
}

impl FacilityStore for PostgresClient {
    type Error = PostgresError;

    async fn load_all(&self, entity: EntityType) -> Result<EntityCollection, PostgresError> {
        let collection = match entity {
            EntityType::ResourceCenters => {
                EntityCollection::ResourceCenters(self.list_resource_centers(&ResourceCenterQuery::default()).await?)
            }
            EntityType::RegionalCenters => {
                EntityCollection::RegionalCenters(self.list_regional_centers(&RegionalCenterQuery::default()).await?)
            }
            EntityType::Resources => EntityCollection::Resources(self.list_resources(&ResourceQuery::default()).await?),
            EntityType::AbaCenters => {
                EntityCollection::AbaCenters(self.list_aba_centers(&AbaCenterQuery::default()).await?)
            }
            EntityType::Providers => EntityCollection::Providers(self.list_providers(&ProviderQuery::default()).await?),
        };

        Ok(collection)
    }
}
