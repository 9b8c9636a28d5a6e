//! Lookup catalog served by `/api/metadata`.
//!
//! The catalog combines every SMALLINT lookup enum with the rows of the
//! `roles` table. It is assembled on first use and cached for the configured
//! TTL; `POST /api/metadata/refresh` drops it early.

use std::sync::Arc;
use std::time::{Duration, Instant};

use careoffice_core::cache::TtlCache;
use careoffice_core::document_status::DocumentStatus;
use careoffice_core::lookups::{
    CareLevel, DocumentType, Gender, IncidentSeverity, IncidentStatus, IncidentType, JobType,
    Lookup, LookupCategory, LookupItem,
};
use careoffice_db::models::role::Role;
use careoffice_db::repositories::RoleRepo;
use sqlx::PgPool;

/// Category name for the role list.
pub const ROLE_CATEGORY: &str = "role";

pub type Catalog = Arc<Vec<LookupCategory>>;

/// Cache-aside provider of the metadata catalog.
pub struct MetadataService {
    cache: TtlCache<Catalog>,
}

impl MetadataService {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: TtlCache::new(ttl),
        }
    }

    /// Every category, loading and caching the catalog on a miss.
    pub async fn catalog(&self, pool: &PgPool) -> Result<Catalog, sqlx::Error> {
        if let Some(cached) = self.cache.get(Instant::now()) {
            return Ok(cached);
        }

        // Loaded outside the lock; a refresh that lands mid-load discards it.
        let generation = self.cache.generation();
        let roles = RoleRepo::list(pool).await?;
        let catalog: Catalog = Arc::new(build_catalog(&roles));
        let cached = self.cache.store(Arc::clone(&catalog), generation, Instant::now());
        tracing::debug!(categories = catalog.len(), cached, "Metadata catalog loaded");
        Ok(catalog)
    }

    /// One category by name, or `None` if no such category exists.
    pub async fn category(
        &self,
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<LookupCategory>, sqlx::Error> {
        let catalog = self.catalog(pool).await?;
        Ok(catalog.iter().find(|c| c.category == name).cloned())
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
        tracing::info!("Metadata catalog invalidated");
    }
}

/// Assemble the catalog from the lookup enums plus the given roles.
pub fn build_catalog(roles: &[Role]) -> Vec<LookupCategory> {
    vec![
        Gender::category(),
        CareLevel::category(),
        JobType::category(),
        IncidentType::category(),
        IncidentSeverity::category(),
        IncidentStatus::category(),
        DocumentType::category(),
        DocumentStatus::category(),
        role_category(roles),
    ]
}

fn role_category(roles: &[Role]) -> LookupCategory {
    LookupCategory {
        category: ROLE_CATEGORY.to_string(),
        items: roles
            .iter()
            .map(|r| LookupItem {
                id: r.id,
                key: r.name.clone(),
                display_name: capitalize(&r.name),
            })
            .collect(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
