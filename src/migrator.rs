use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_vendors_table::Migration),
            Box::new(m20240301_000002_create_purchase_orders_table::Migration),
            Box::new(m20240301_000003_create_historical_performances_table::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Vendors {
    Table,
    Id,
    Name,
    ContactDetails,
    Address,
    VendorCode,
    OnTimeDeliveryRate,
    QualityRatingAvg,
    AverageResponseTime,
    FulfillmentRate,
    CreatedAt,
    UpdatedAt,
}

mod m20240301_000001_create_vendors_table {
    use super::Vendors;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_vendors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Vendors::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Vendors::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Vendors::Name).string_len(255).not_null())
                        .col(ColumnDef::new(Vendors::ContactDetails).text().not_null())
                        .col(ColumnDef::new(Vendors::Address).text().not_null())
                        .col(
                            ColumnDef::new(Vendors::VendorCode)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Vendors::OnTimeDeliveryRate)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::QualityRatingAvg)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::AverageResponseTime)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::FulfillmentRate)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Vendors::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vendors::Table).to_owned())
                .await
        }
    }
}

mod m20240301_000002_create_purchase_orders_table {
    use super::Vendors;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_purchase_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::PoNumber)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::VendorId).uuid().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::Status)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::DeliveryDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::AcknowledgmentDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::IssueDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::QualityRating).double().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_orders_vendor_id")
                                .from(PurchaseOrders::Table, PurchaseOrders::VendorId)
                                .to(Vendors::Table, Vendors::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_purchase_orders_vendor_status")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::VendorId)
                        .col(PurchaseOrders::Status)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PurchaseOrders {
        Table,
        Id,
        PoNumber,
        VendorId,
        Status,
        OrderDate,
        DeliveryDate,
        AcknowledgmentDate,
        IssueDate,
        QualityRating,
    }
}

mod m20240301_000003_create_historical_performances_table {
    use super::Vendors;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_historical_performances_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(HistoricalPerformances::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(HistoricalPerformances::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformances::VendorId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformances::HistoryDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformances::OnTimeDeliveryRate)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformances::QualityRatingAvg)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformances::AverageResponseTime)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(HistoricalPerformances::FulfillmentRate)
                                .double()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_historical_performances_vendor_id")
                                .from(
                                    HistoricalPerformances::Table,
                                    HistoricalPerformances::VendorId,
                                )
                                .to(Vendors::Table, Vendors::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_historical_performances_vendor_date")
                        .table(HistoricalPerformances::Table)
                        .col(HistoricalPerformances::VendorId)
                        .col(HistoricalPerformances::HistoryDate)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(HistoricalPerformances::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum HistoricalPerformances {
        Table,
        Id,
        VendorId,
        HistoryDate,
        OnTimeDeliveryRate,
        QualityRatingAvg,
        AverageResponseTime,
        FulfillmentRate,
    }
}
