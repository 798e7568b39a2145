use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ServiceError;

/// Lifecycle status of a purchase order, as stored by the order subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Whether `status` names one of the known order states.
    pub fn is_valid_status(status: &str) -> bool {
        status.parse::<OrderStatus>().is_ok()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(ServiceError::InvalidStatus(format!(
                "Unknown purchase order status: {}",
                s
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub po_number: String,
    #[sea_orm(indexed)]
    pub vendor_id: Uuid,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
    pub issue_date: Option<DateTime<Utc>>,
    pub quality_rating: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id",
        on_delete = "Cascade"
    )]
    Vendor,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    /// Acknowledged no later than the promised delivery date.
    /// An order that was never acknowledged does not count as on time.
    pub fn acknowledged_on_time(&self) -> bool {
        matches!(self.acknowledgment_date, Some(ack) if ack <= self.delivery_date)
    }

    /// Elapsed time between issue and acknowledgment, when both are known.
    pub fn response_time(&self) -> Option<chrono::Duration> {
        match (self.issue_date, self.acknowledgment_date) {
            (Some(issued), Some(acked)) => Some(acked - issued),
            _ => None,
        }
    }
}
