use sqlx::{Postgres, QueryBuilder};

use crate::models::{AbaCenterQuery, ProviderQuery, RegionalCenterQuery, ResourceCenterQuery, ResourceQuery};

pub const ABA_CENTER_COLUMNS: &str = "id, name, street, city, zip, phone, service_type, \
     waitlist_availability, waitlist_notes, dx_verification, insurance_accepted, \
     medi_cal_plans, notes, created_at, updated_at";

/// Resource coordinates are NUMERIC in the stored schema
pub const RESOURCE_COLUMNS: &str = "id, name, description, latitude::float8 AS latitude, \
     longitude::float8 AS longitude, diagnoses, address, contact_info, created_at, updated_at";

pub const REGIONAL_CENTER_COLUMNS: &str = "id, regional_center, office_type, address, suite, \
     city, state, zip_code, telephone, website, county_served, los_angeles_health_district, \
     location_coordinates, latitude, longitude";

pub const PROVIDER_COLUMNS: &str = "id, name, phone, coverage_areas, center_based_services, areas";

pub const FORM_SUBMISSION_COLUMNS: &str = "id, name, email, phone, message, facility_id, \
     facility_type, status, created_at";

pub const USER_PREFERENCES_COLUMNS: &str = "id, user_id, map_type, default_zoom, show_facilities, \
     show_aba_centers, show_resource_centers, show_regional_centers, show_providers, \
     preferred_radius, require_waitlist, require_insurance, preferred_diagnoses, \
     created_at, updated_at";

/// Resource centers with their diagnoses folded into a JSON array
pub const RESOURCE_CENTER_SELECT: &str = r#"
    SELECT rc.id, rc.name, rc.description, rc.address, rc.latitude, rc.longitude,
           rc.created_at, rc.updated_at,
           COALESCE(
               (SELECT json_agg(json_build_object('id', d.id, 'name', d.name) ORDER BY d.name)
                FROM center_diagnoses cd
                JOIN diagnoses d ON d.id = cd.diagnosis_id
                WHERE cd.center_id = rc.id),
               '[]'::json
           ) AS diagnoses
    FROM resource_centers rc
"#;

/// Case-insensitive substring pattern for `LOWER(col) LIKE`
pub fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim().to_lowercase())
}

/// Blank filter values count as absent
fn term(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn push_text_search(qb: &mut QueryBuilder<'static, Postgres>, columns: &[&str], term: &str) {
    let pattern = like_pattern(term);
    qb.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(format!("LOWER({}) LIKE ", column));
        qb.push_bind(pattern.clone());
    }
    qb.push(")");
}

pub fn aba_centers(filter: &AbaCenterQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM aba_centers WHERE TRUE", ABA_CENTER_COLUMNS));

    if let Some(city) = term(&filter.city) {
        qb.push(" AND LOWER(city) LIKE ").push_bind(like_pattern(city));
    }
    if let Some(service_type) = term(&filter.service_type) {
        qb.push(" AND service_type = ").push_bind(service_type.to_string());
    }
    if let Some(insurance) = term(&filter.insurance) {
        qb.push(" AND LOWER(insurance_accepted) LIKE ").push_bind(like_pattern(insurance));
    }
    if filter.waitlist_only() {
        qb.push(" AND waitlist_availability IS NOT NULL AND waitlist_availability <> ''");
    }
    if let Some(search) = term(&filter.search) {
        push_text_search(&mut qb, &["name", "street", "notes"], search);
    }

    qb.push(" ORDER BY name");
    qb
}

pub fn resource_centers(filter: &ResourceCenterQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(RESOURCE_CENTER_SELECT);
    qb.push(" WHERE TRUE");

    if let Some(search) = term(&filter.search) {
        push_text_search(&mut qb, &["rc.name", "rc.description", "rc.address"], search);
    }

    qb.push(" ORDER BY rc.name");
    qb
}

pub fn resources(filter: &ResourceQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM resources WHERE TRUE", RESOURCE_COLUMNS));

    if let Some(search) = term(&filter.search) {
        push_text_search(&mut qb, &["name", "description", "address"], search);
    }
    if let Some(diagnosis) = term(&filter.diagnosis) {
        qb.push(" AND ").push_bind(diagnosis.to_string()).push(" = ANY(diagnoses)");
    }

    qb.push(" ORDER BY name");
    qb
}

pub fn regional_centers(filter: &RegionalCenterQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM regional_centers WHERE TRUE",
        REGIONAL_CENTER_COLUMNS
    ));

    if let Some(county) = term(&filter.county) {
        qb.push(" AND LOWER(county_served) LIKE ").push_bind(like_pattern(county));
    }
    if let Some(search) = term(&filter.search) {
        push_text_search(&mut qb, &["regional_center", "address", "city"], search);
    }

    qb.push(" ORDER BY id");
    qb
}

pub fn providers(filter: &ProviderQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM providers WHERE TRUE", PROVIDER_COLUMNS));

    if let Some(search) = term(&filter.search) {
        push_text_search(&mut qb, &["name", "coverage_areas", "center_based_services"], search);
    }
    if let Some(area) = term(&filter.area) {
        qb.push(" AND ").push_bind(area.to_string()).push(" = ANY(areas)");
    }

    qb.push(" ORDER BY name");
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("  Los Angeles "), "%los angeles%");
    }

    #[test]
    fn test_unfiltered_query_has_no_binds() {
        let qb = aba_centers(&AbaCenterQuery::default());
        assert!(!qb.sql().contains('$'));
        assert!(qb.sql().ends_with(" ORDER BY name"));
    }

    #[test]
    fn test_aba_center_filters() {
        let filter = AbaCenterQuery {
            city: Some("Pasadena".to_string()),
            service_type: Some("in-home".to_string()),
            insurance: Some("  ".to_string()),
            waitlist: Some("true".to_string()),
            search: Some("autism".to_string()),
        };

        let qb = aba_centers(&filter);
        let sql = qb.sql();

        assert!(sql.contains("LOWER(city) LIKE $1"));
        assert!(sql.contains("service_type = $2"));
        assert!(!sql.contains("insurance_accepted) LIKE"));
        assert!(sql.contains("waitlist_availability <> ''"));
        assert!(sql.contains("(LOWER(name) LIKE $3 OR LOWER(street) LIKE $4 OR LOWER(notes) LIKE $5)"));
    }

    #[test]
    fn test_array_membership_filters() {
        let resources = resources(&ResourceQuery {
            diagnosis: Some("Autism".to_string()),
            ..Default::default()
        });
        assert!(resources.sql().contains("$1 = ANY(diagnoses)"));
        assert!(resources.sql().contains("latitude::float8 AS latitude"));

        let providers = providers(&ProviderQuery {
            search: None,
            area: Some("Glendale".to_string()),
        });
        assert!(providers.sql().contains("$1 = ANY(areas)"));
    }

    #[test]
    fn test_resource_centers_join_diagnoses() {
        let qb = resource_centers(&ResourceCenterQuery {
            search: Some("clinic".to_string()),
            ..Default::default()
        });
        let sql = qb.sql();
        assert!(sql.contains("json_agg"));
        assert!(sql.contains("LOWER(rc.name) LIKE $1"));
    }

    #[test]
    fn test_regional_center_county() {
        let qb = regional_centers(&RegionalCenterQuery {
            county: Some("Orange".to_string()),
            ..Default::default()
        });
        assert!(qb.sql().contains("LOWER(county_served) LIKE $1"));
    }
}
