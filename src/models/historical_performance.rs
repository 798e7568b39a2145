use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::performance::PerformanceMetrics;

/// Point-in-time copy of a vendor's four metrics. Rows are append-only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "historical_performances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub vendor_id: Uuid,
    pub history_date: DateTime<Utc>,
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
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

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(
        self,
        _db: &C,
        insert: bool,
    ) -> Result<Self, DbErr> {
        if !insert {
            return Err(DbErr::Custom(
                "historical performance records are append-only".to_string(),
            ));
        }
        let mut active_model = self;
        if active_model.id.is_not_set() {
            active_model.id = Set(Uuid::new_v4());
        }
        if active_model.history_date.is_not_set() {
            active_model.history_date = Set(Utc::now());
        }
        Ok(active_model)
    }
}

impl ActiveModel {
    /// New snapshot row for `vendor_id`; id and history date are filled in on insert.
    pub fn from_metrics(vendor_id: Uuid, metrics: &PerformanceMetrics) -> Self {
        Self {
            vendor_id: Set(vendor_id),
            on_time_delivery_rate: Set(metrics.on_time_delivery_rate),
            quality_rating_avg: Set(metrics.quality_rating_avg),
            average_response_time: Set(metrics.average_response_time),
            fulfillment_rate: Set(metrics.fulfillment_rate),
            ..Default::default()
        }
    }
}

impl Model {
    pub fn metrics(&self) -> PerformanceMetrics {
        PerformanceMetrics {
            on_time_delivery_rate: self.on_time_delivery_rate,
            quality_rating_avg: self.quality_rating_avg,
            average_response_time: self.average_response_time,
            fulfillment_rate: self.fulfillment_rate,
        }
    }

    /// `"{vendor name} - {history date}"`
    pub fn describe(&self, vendor: &super::vendor::Model) -> String {
        format!("{} - {}", vendor.name, self.history_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn describe_uses_vendor_name_and_date() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let vendor_id = Uuid::new_v4();
        let vendor = super::super::vendor::Model {
            id: vendor_id,
            name: "Acme Supplies".into(),
            contact_details: "ops@acme.test".into(),
            address: "1 Dock Rd".into(),
            vendor_code: "ACME000001".into(),
            on_time_delivery_rate: 0.0,
            quality_rating_avg: 0.0,
            average_response_time: 0.0,
            fulfillment_rate: 0.0,
            created_at: at,
            updated_at: at,
        };
        let snapshot = Model {
            id: Uuid::new_v4(),
            vendor_id,
            history_date: at,
            on_time_delivery_rate: 0.75,
            quality_rating_avg: 4.0,
            average_response_time: 3600.0,
            fulfillment_rate: 0.6,
        };

        assert_eq!(snapshot.describe(&vendor), "Acme Supplies - 2024-05-01 09:30:00 UTC");
        assert_eq!(snapshot.metrics().fulfillment_rate, 0.6);
    }
}
