use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::purchase_order::{self, OrderStatus};
use crate::errors::ServiceError;
use crate::performance::{self, PerformanceMetrics};
use crate::repositories::PurchaseOrderStore;

/// Path under which a single vendor resource is addressed.
pub const VENDOR_RESOURCE_PATH: &str = "/api/v1/vendors";

/// Vendor entity model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub contact_details: String,

    #[sea_orm(column_type = "Text")]
    pub address: String,

    #[sea_orm(unique)]
    pub vendor_code: String,

    pub on_time_delivery_rate: f64,

    pub quality_rating_avg: f64,

    pub average_response_time: f64,

    pub fulfillment_rate: f64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase_order::Entity")]
    PurchaseOrders,

    #[sea_orm(has_many = "super::historical_performance::Entity")]
    HistoricalPerformances,
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrders.def()
    }
}

impl Related<super::historical_performance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HistoricalPerformances.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(
        self,
        _db: &C,
        insert: bool,
    ) -> Result<Self, DbErr> {
        let mut active_model = self;
        let now = Utc::now();
        if insert {
            if active_model.id.is_not_set() {
                active_model.id = Set(Uuid::new_v4());
            }
            if active_model.created_at.is_not_set() {
                active_model.created_at = Set(now);
            }
        } else if active_model.vendor_code.is_set() {
            return Err(DbErr::Custom(
                "vendor_code is assigned at creation and cannot be changed".to_string(),
            ));
        }
        active_model.updated_at = Set(now);
        Ok(active_model)
    }
}

/// Outcome of a status-filtered purchase order lookup.
///
/// An unknown status is not an error at lookup time, but it is not "no
/// orders" either: callers have to decide what an undefined filter means.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderLookup {
    Found(Vec<purchase_order::Model>),
    InvalidFilter(String),
}

impl OrderLookup {
    pub fn is_invalid(&self) -> bool {
        matches!(self, OrderLookup::InvalidFilter(_))
    }

    /// The matched orders, or `InvalidStatus` when the filter was not a known status.
    pub fn into_orders(self) -> Result<Vec<purchase_order::Model>, ServiceError> {
        match self {
            OrderLookup::Found(orders) => Ok(orders),
            OrderLookup::InvalidFilter(status) => Err(ServiceError::InvalidStatus(format!(
                "Cannot compute over purchase orders filtered by unknown status '{}'",
                status
            ))),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Model {
    /// Canonical reference for this vendor record.
    pub fn absolute_url(&self) -> String {
        format!("{}/{}", VENDOR_RESOURCE_PATH, self.id)
    }

    /// The cached metric fields as last written by a refresh.
    pub fn cached_metrics(&self) -> PerformanceMetrics {
        PerformanceMetrics {
            on_time_delivery_rate: self.on_time_delivery_rate,
            quality_rating_avg: self.quality_rating_avg,
            average_response_time: self.average_response_time,
            fulfillment_rate: self.fulfillment_rate,
        }
    }

    /// Purchase orders of this vendor, optionally restricted to one status.
    ///
    /// `None` returns every order. A status string that is not a known
    /// [`OrderStatus`] yields [`OrderLookup::InvalidFilter`] without touching
    /// the store.
    pub async fn get_purchase_orders_by_status<S>(
        &self,
        store: &S,
        status: Option<&str>,
    ) -> Result<OrderLookup, ServiceError>
    where
        S: PurchaseOrderStore + ?Sized,
    {
        let filter = match status {
            None => None,
            Some(raw) => match raw.parse::<OrderStatus>() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    debug!(vendor_id = %self.id, status = raw, "ignoring unknown status filter");
                    return Ok(OrderLookup::InvalidFilter(raw.to_string()));
                }
            },
        };

        let orders = store.orders_by_vendor(self.id, filter).await?;
        Ok(OrderLookup::Found(orders))
    }

    async fn completed_orders<S>(&self, store: &S) -> Result<Vec<purchase_order::Model>, ServiceError>
    where
        S: PurchaseOrderStore + ?Sized,
    {
        let status = OrderStatus::Completed.to_string();
        self.get_purchase_orders_by_status(store, Some(&status))
            .await?
            .into_orders()
    }

    async fn all_orders<S>(&self, store: &S) -> Result<Vec<purchase_order::Model>, ServiceError>
    where
        S: PurchaseOrderStore + ?Sized,
    {
        self.get_purchase_orders_by_status(store, None)
            .await?
            .into_orders()
    }

    /// Share of completed orders acknowledged on or before their delivery date.
    pub async fn calc_on_time_delivery_rate<S>(&self, store: &S) -> Result<f64, ServiceError>
    where
        S: PurchaseOrderStore + ?Sized,
    {
        let completed = self.completed_orders(store).await?;
        Ok(performance::on_time_delivery_rate(&completed))
    }

    /// Mean quality rating over completed orders, rounded to a whole number.
    pub async fn calc_avg_quality_ratings<S>(&self, store: &S) -> Result<f64, ServiceError>
    where
        S: PurchaseOrderStore + ?Sized,
    {
        let completed = self.completed_orders(store).await?;
        Ok(performance::avg_quality_rating(&completed))
    }

    /// Share of all orders that reached completed status.
    pub async fn calc_fulfillment_rate<S>(&self, store: &S) -> Result<f64, ServiceError>
    where
        S: PurchaseOrderStore + ?Sized,
    {
        let orders = self.all_orders(store).await?;
        Ok(performance::fulfillment_rate(&orders))
    }

    /// Mean issue-to-acknowledgment time in seconds.
    pub async fn calc_avg_response_time<S>(&self, store: &S) -> Result<f64, ServiceError>
    where
        S: PurchaseOrderStore + ?Sized,
    {
        let orders = self.all_orders(store).await?;
        Ok(performance::avg_response_time_secs(&orders))
    }

    /// All four metrics from a single read of the vendor's orders.
    pub async fn calc_all_metrics<S>(&self, store: &S) -> Result<PerformanceMetrics, ServiceError>
    where
        S: PurchaseOrderStore + ?Sized,
    {
        let orders = self.all_orders(store).await?;
        Ok(PerformanceMetrics::from_orders(&orders))
    }
}
