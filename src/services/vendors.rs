use crate::{
    codegen::generate_vendor_code,
    config::AppConfig,
    db::DbPool,
    errors::ServiceError,
    models::{historical_performance, vendor},
    performance::PerformanceMetrics,
    repositories::{
        HistoricalPerformanceRepository, PurchaseOrderRepository, PurchaseOrderStore,
        VendorRepository,
    },
};
use metrics::counter;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Input for registering a vendor. The vendor code is always generated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewVendor {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Contact details are required"))]
    pub contact_details: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
}

/// Partial update of a vendor's descriptive fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateVendor {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Contact details cannot be empty"))]
    pub contact_details: Option<String>,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
}

/// Service for vendor records and their performance metrics
#[derive(Clone)]
pub struct VendorService {
    vendors: VendorRepository,
    history: HistoricalPerformanceRepository,
    orders: Arc<dyn PurchaseOrderStore>,
    code_length: usize,
    code_max_attempts: u32,
}

impl VendorService {
    /// Creates a service that reads purchase orders from the same database
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        let orders = Arc::new(PurchaseOrderRepository::new(db_pool.clone()));
        Self::with_order_store(db_pool, orders, config)
    }

    /// Creates a service with a caller-supplied purchase order source
    pub fn with_order_store(
        db_pool: Arc<DbPool>,
        orders: Arc<dyn PurchaseOrderStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            vendors: VendorRepository::new(db_pool.clone()),
            history: HistoricalPerformanceRepository::new(db_pool),
            orders,
            code_length: config.vendor_code_length,
            code_max_attempts: config.vendor_code_max_attempts,
        }
    }

    pub fn order_store(&self) -> &dyn PurchaseOrderStore {
        self.orders.as_ref()
    }

    async fn require_vendor(&self, vendor_id: Uuid) -> Result<vendor::Model, ServiceError> {
        self.vendors
            .find_by_id(vendor_id)
            .await?
            .ok_or_else(|| ServiceError::vendor_not_found(vendor_id))
    }

    /// Registers a vendor under a freshly generated, unique vendor code
    #[instrument(skip(self))]
    pub async fn create_vendor(&self, input: NewVendor) -> Result<vendor::Model, ServiceError> {
        input.validate()?;

        for attempt in 1..=self.code_max_attempts {
            let candidate = vendor::ActiveModel {
                name: Set(input.name.clone()),
                contact_details: Set(input.contact_details.clone()),
                address: Set(input.address.clone()),
                vendor_code: Set(generate_vendor_code(self.code_length)),
                on_time_delivery_rate: Set(0.0),
                quality_rating_avg: Set(0.0),
                average_response_time: Set(0.0),
                fulfillment_rate: Set(0.0),
                ..Default::default()
            };

            match self.vendors.create(candidate).await {
                Ok(created) => {
                    info!(vendor_id = %created.id, vendor_code = %created.vendor_code, "vendor created");
                    counter!("vendor_performance.vendors.created", 1);
                    return Ok(created);
                }
                Err(err) if err.is_unique_violation() => {
                    warn!(attempt, "vendor code collision, regenerating");
                }
                Err(err) => return Err(err),
            }
        }

        Err(ServiceError::Conflict(format!(
            "Could not allocate a unique vendor code after {} attempts",
            self.code_max_attempts
        )))
    }

    /// Gets a vendor by ID
    #[instrument(skip(self))]
    pub async fn get_vendor(&self, vendor_id: Uuid) -> Result<Option<vendor::Model>, ServiceError> {
        self.vendors.find_by_id(vendor_id).await
    }

    /// Lists vendors ordered by name
    #[instrument(skip(self))]
    pub async fn list_vendors(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<vendor::Model>, ServiceError> {
        self.vendors.find_all(limit, offset).await
    }

    /// Updates name, contact details or address. The vendor code never changes.
    #[instrument(skip(self))]
    pub async fn update_vendor(
        &self,
        vendor_id: Uuid,
        changes: UpdateVendor,
    ) -> Result<vendor::Model, ServiceError> {
        changes.validate()?;
        let existing = self.require_vendor(vendor_id).await?;

        let mut active: vendor::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(contact_details) = changes.contact_details {
            active.contact_details = Set(contact_details);
        }
        if let Some(address) = changes.address {
            active.address = Set(address);
        }

        let updated = self.vendors.update(active).await?;
        info!(vendor_id = %vendor_id, "vendor updated");
        Ok(updated)
    }

    /// Deletes a vendor together with its performance history
    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, vendor_id: Uuid) -> Result<(), ServiceError> {
        if !self.vendors.delete(vendor_id).await? {
            return Err(ServiceError::vendor_not_found(vendor_id));
        }
        info!(vendor_id = %vendor_id, "vendor deleted");
        counter!("vendor_performance.vendors.deleted", 1);
        Ok(())
    }

    /// Computes the four metrics without persisting anything
    #[instrument(skip(self))]
    pub async fn compute_metrics(&self, vendor_id: Uuid) -> Result<PerformanceMetrics, ServiceError> {
        let vendor = self.require_vendor(vendor_id).await?;
        vendor.calc_all_metrics(self.order_store()).await
    }

    /// Recomputes the metrics and stores them in the vendor's cached fields
    #[instrument(skip(self))]
    pub async fn refresh_metrics(&self, vendor_id: Uuid) -> Result<vendor::Model, ServiceError> {
        let vendor = self.require_vendor(vendor_id).await?;
        let metrics = vendor.calc_all_metrics(self.order_store()).await?;

        let updated = self.vendors.update_cached_metrics(vendor, &metrics).await?;
        info!(
            vendor_id = %vendor_id,
            on_time_delivery_rate = metrics.on_time_delivery_rate,
            quality_rating_avg = metrics.quality_rating_avg,
            average_response_time = metrics.average_response_time,
            fulfillment_rate = metrics.fulfillment_rate,
            "vendor metrics refreshed"
        );
        counter!("vendor_performance.metrics.refreshed", 1);
        Ok(updated)
    }

    /// Recomputes the metrics and appends them to the vendor's history
    #[instrument(skip(self))]
    pub async fn record_snapshot(
        &self,
        vendor_id: Uuid,
    ) -> Result<historical_performance::Model, ServiceError> {
        let vendor = self.require_vendor(vendor_id).await?;
        let metrics = vendor.calc_all_metrics(self.order_store()).await?;

        let snapshot = self.history.append(vendor.id, &metrics).await?;
        info!(
            vendor_id = %vendor_id,
            snapshot_id = %snapshot.id,
            "performance snapshot recorded"
        );
        counter!("vendor_performance.snapshots.recorded", 1);
        Ok(snapshot)
    }

    /// Snapshots for a vendor, most recent first
    #[instrument(skip(self))]
    pub async fn performance_history(
        &self,
        vendor_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<historical_performance::Model>, ServiceError> {
        self.require_vendor(vendor_id).await?;
        self.history.find_by_vendor(vendor_id, limit).await
    }
}
