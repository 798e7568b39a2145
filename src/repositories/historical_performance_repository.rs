use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::sync::Arc;
use uuid::Uuid;

use super::BaseRepository;
use crate::errors::ServiceError;
use crate::models::historical_performance::{
    self, ActiveModel as SnapshotActiveModel, Column, Entity as HistoricalPerformance,
};
use crate::performance::PerformanceMetrics;

/// Append-only access to `historical_performances`.
#[derive(Debug, Clone)]
pub struct HistoricalPerformanceRepository {
    base: BaseRepository,
}

impl HistoricalPerformanceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Appends a snapshot dated now.
    pub async fn append(
        &self,
        vendor_id: Uuid,
        metrics: &PerformanceMetrics,
    ) -> Result<historical_performance::Model, ServiceError> {
        let snapshot = SnapshotActiveModel::from_metrics(vendor_id, metrics);
        Ok(snapshot.insert(self.base.get_db()).await?)
    }

    /// Most recent snapshots first.
    pub async fn find_by_vendor(
        &self,
        vendor_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<historical_performance::Model>, ServiceError> {
        Ok(HistoricalPerformance::find()
            .filter(Column::VendorId.eq(vendor_id))
            .order_by_desc(Column::HistoryDate)
            .limit(limit)
            .all(self.base.get_db())
            .await?)
    }
}
