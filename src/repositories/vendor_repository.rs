use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use super::BaseRepository;
use crate::errors::ServiceError;
use crate::models::vendor::{self, Column, Entity as Vendor};
use crate::performance::PerformanceMetrics;

/// Repository for vendor records
#[derive(Debug, Clone)]
pub struct VendorRepository {
    base: BaseRepository,
}

impl VendorRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a vendor by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<vendor::Model>, ServiceError> {
        Ok(Vendor::find_by_id(id).one(self.base.get_db()).await?)
    }

    /// Vendors ordered by name
    pub async fn find_all(&self, limit: u64, offset: u64) -> Result<Vec<vendor::Model>, ServiceError> {
        Ok(Vendor::find()
            .order_by_asc(Column::Name)
            .limit(Some(limit))
            .offset(Some(offset))
            .all(self.base.get_db())
            .await?)
    }

    pub async fn create(&self, vendor: vendor::ActiveModel) -> Result<vendor::Model, ServiceError> {
        Ok(vendor.insert(self.base.get_db()).await?)
    }

    pub async fn update(&self, vendor: vendor::ActiveModel) -> Result<vendor::Model, ServiceError> {
        Ok(vendor.update(self.base.get_db()).await?)
    }

    /// Overwrites the cached metric fields. Concurrent writers are not
    /// coordinated; the last write wins.
    pub async fn update_cached_metrics(
        &self,
        existing: vendor::Model,
        metrics: &PerformanceMetrics,
    ) -> Result<vendor::Model, ServiceError> {
        let mut active: vendor::ActiveModel = existing.into();
        active.on_time_delivery_rate = Set(metrics.on_time_delivery_rate);
        active.quality_rating_avg = Set(metrics.quality_rating_avg);
        active.average_response_time = Set(metrics.average_response_time);
        active.fulfillment_rate = Set(metrics.fulfillment_rate);
        self.update(active).await
    }

    /// Deletes the vendor; snapshots and orders go with it through the
    /// foreign key cascade. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let result = Vendor::delete_by_id(id).exec(self.base.get_db()).await?;
        Ok(result.rows_affected > 0)
    }
}
