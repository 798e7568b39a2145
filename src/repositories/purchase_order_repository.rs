use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::{BaseRepository, PurchaseOrderStore};
use crate::errors::ServiceError;
use crate::models::purchase_order::{self, Column, Entity as PurchaseOrder};
use crate::models::OrderStatus;

/// SeaORM-backed view of the `purchase_orders` table
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    base: BaseRepository,
}

impl PurchaseOrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Inserts an order row. Orders are owned by the order subsystem; this
    /// exists for seeding and fixtures.
    pub async fn create(
        &self,
        order: purchase_order::ActiveModel,
    ) -> Result<purchase_order::Model, ServiceError> {
        Ok(order.insert(self.base.get_db()).await?)
    }
}

#[async_trait]
impl PurchaseOrderStore for PurchaseOrderRepository {
    async fn orders_by_vendor(
        &self,
        vendor_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<purchase_order::Model>, ServiceError> {
        let mut query = PurchaseOrder::find().filter(Column::VendorId.eq(vendor_id));
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status));
        }

        let orders = query.all(self.base.get_db()).await?;
        debug!(
            vendor_id = %vendor_id,
            status = ?status,
            count = orders.len(),
            "loaded purchase orders"
        );
        Ok(orders)
    }
}
