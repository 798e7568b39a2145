#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;
use vendor_performance::{
    config::AppConfig,
    db::{self, DbConfig, DbPool},
    models::{historical_performance, purchase_order, vendor, OrderStatus},
    performance::PerformanceMetrics,
    repositories::{PurchaseOrderRepository, PurchaseOrderStore},
    services::{NewVendor, VendorService},
    ServiceError,
};

/// Helper harness backed by a fresh in-memory SQLite database per test.
pub struct TestApp {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub service: VendorService,
    pub orders: PurchaseOrderRepository,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = db::establish_connection_with_config(&DbConfig::in_memory_sqlite())
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let db = Arc::new(pool);
        let config = AppConfig::new("sqlite::memory:".to_string(), "test".to_string());
        let service = VendorService::new(db.clone(), &config);
        let orders = PurchaseOrderRepository::new(db.clone());

        Self {
            db,
            config,
            service,
            orders,
        }
    }

    pub async fn create_vendor(&self, name: &str) -> vendor::Model {
        self.service
            .create_vendor(NewVendor {
                name: name.to_string(),
                contact_details: format!("purchasing@{}.test", name.to_lowercase().replace(' ', "-")),
                address: "1 Harbor Way, Portsmouth".to_string(),
            })
            .await
            .expect("create vendor")
    }

    pub async fn insert_order(&self, order: OrderFixture) -> purchase_order::Model {
        self.orders
            .create(order.into_active_model())
            .await
            .expect("insert purchase order")
    }

    /// Seeds a snapshot row with a fixed history date.
    pub async fn insert_snapshot_at(
        &self,
        vendor_id: Uuid,
        metrics: &PerformanceMetrics,
        history_date: DateTime<Utc>,
    ) -> historical_performance::Model {
        let mut snapshot = historical_performance::ActiveModel::from_metrics(vendor_id, metrics);
        snapshot.history_date = Set(history_date);
        snapshot
            .insert(self.db.as_ref())
            .await
            .expect("insert snapshot")
    }

    pub async fn snapshot_count(&self, vendor_id: Uuid) -> u64 {
        historical_performance::Entity::find()
            .filter(historical_performance::Column::VendorId.eq(vendor_id))
            .count(self.db.as_ref())
            .await
            .expect("count snapshots")
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap()
}

/// Builder for purchase order rows.
#[derive(Debug, Clone)]
pub struct OrderFixture {
    pub vendor_id: Uuid,
    pub status: OrderStatus,
    pub delivery_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
    pub issue_date: Option<DateTime<Utc>>,
    pub quality_rating: Option<f64>,
}

impl OrderFixture {
    pub fn new(vendor_id: Uuid, status: OrderStatus) -> Self {
        Self {
            vendor_id,
            status,
            delivery_date: base_time() + Duration::days(7),
            acknowledgment_date: None,
            issue_date: None,
            quality_rating: None,
        }
    }

    pub fn completed(vendor_id: Uuid) -> Self {
        Self::new(vendor_id, OrderStatus::Completed)
    }

    /// Acknowledged `offset` relative to the delivery date.
    pub fn acknowledged(mut self, offset: Duration) -> Self {
        self.acknowledgment_date = Some(self.delivery_date + offset);
        self
    }

    pub fn issued_and_acked(mut self, issued: DateTime<Utc>, acked: DateTime<Utc>) -> Self {
        self.issue_date = Some(issued);
        self.acknowledgment_date = Some(acked);
        self
    }

    pub fn rated(mut self, rating: f64) -> Self {
        self.quality_rating = Some(rating);
        self
    }

    pub fn into_model(self) -> purchase_order::Model {
        purchase_order::Model {
            id: Uuid::new_v4(),
            po_number: format!("PO-{}", Uuid::new_v4().simple()),
            vendor_id: self.vendor_id,
            status: self.status,
            order_date: base_time(),
            delivery_date: self.delivery_date,
            acknowledgment_date: self.acknowledgment_date,
            issue_date: self.issue_date,
            quality_rating: self.quality_rating,
        }
    }

    pub fn into_active_model(self) -> purchase_order::ActiveModel {
        let model = self.into_model();
        purchase_order::ActiveModel {
            id: Set(model.id),
            po_number: Set(model.po_number),
            vendor_id: Set(model.vendor_id),
            status: Set(model.status),
            order_date: Set(model.order_date),
            delivery_date: Set(model.delivery_date),
            acknowledgment_date: Set(model.acknowledgment_date),
            issue_date: Set(model.issue_date),
            quality_rating: Set(model.quality_rating),
        }
    }
}

/// Vendor row that never touched a database.
pub fn detached_vendor() -> vendor::Model {
    vendor::Model {
        id: Uuid::new_v4(),
        name: "Detached Vendor".to_string(),
        contact_details: "n/a".to_string(),
        address: "n/a".to_string(),
        vendor_code: "DETACHED01".to_string(),
        on_time_delivery_rate: 0.0,
        quality_rating_avg: 0.0,
        average_response_time: 0.0,
        fulfillment_rate: 0.0,
        created_at: base_time(),
        updated_at: base_time(),
    }
}

/// In-memory order source that counts how often it is queried.
#[derive(Default)]
pub struct CountingStore {
    pub orders: Vec<purchase_order::Model>,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn with_orders(orders: Vec<purchase_order::Model>) -> Self {
        Self {
            orders,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PurchaseOrderStore for CountingStore {
    async fn orders_by_vendor(
        &self,
        vendor_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<Vec<purchase_order::Model>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .orders
            .iter()
            .filter(|o| o.vendor_id == vendor_id)
            .filter(|o| status.map_or(true, |s| o.status == s))
            .cloned()
            .collect())
    }
}
