use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::{purchase_order, OrderStatus};

pub mod historical_performance_repository;
pub mod purchase_order_repository;
pub mod vendor_repository;

pub use historical_performance_repository::HistoricalPerformanceRepository;
pub use purchase_order_repository::PurchaseOrderRepository;
pub use vendor_repository::VendorRepository;

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Read access to the purchase orders owned by the order subsystem.
#[async_trait]
pub trait PurchaseOrderStore: Send + Sync {
    /// Orders placed with `vendor_id`, restricted to `status` when given.
    /// No ordering is guaranteed.
    async fn orders_by_vendor(
        &self,
        vendor_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<purchase_order::Model>, ServiceError>;
}
