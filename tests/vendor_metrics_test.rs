mod common;

use assert_matches::assert_matches;
use chrono::Duration;
use rstest::rstest;
use vendor_performance::{OrderLookup, OrderStatus, ServiceError};

use common::{base_time, detached_vendor, CountingStore, OrderFixture, TestApp};

#[tokio::test]
async fn on_time_rate_counts_completed_orders_acknowledged_by_delivery_date() {
    let app = TestApp::new().await;
    let vendor = app.create_vendor("Acme Supplies").await;

    for offset in [Duration::days(-2), Duration::zero(), Duration::hours(-1)] {
        app.insert_order(OrderFixture::completed(vendor.id).acknowledged(offset))
            .await;
    }
    app.insert_order(OrderFixture::completed(vendor.id).acknowledged(Duration::days(1)))
        .await;
    // Pending orders are not part of the on-time population.
    app.insert_order(
        OrderFixture::new(vendor.id, OrderStatus::Pending).acknowledged(Duration::days(5)),
    )
    .await;

    let rate = vendor
        .calc_on_time_delivery_rate(&app.orders)
        .await
        .expect("on-time rate");
    assert_eq!(rate, 0.75);
}

#[tokio::test]
async fn fulfillment_rate_is_completed_over_all_orders() {
    let app = TestApp::new().await;
    let vendor = app.create_vendor("Bolt Works").await;

    for _ in 0..6 {
        app.insert_order(OrderFixture::completed(vendor.id)).await;
    }
    for status in [
        OrderStatus::Pending,
        OrderStatus::Pending,
        OrderStatus::Cancelled,
        OrderStatus::Cancelled,
    ] {
        app.insert_order(OrderFixture::new(vendor.id, status)).await;
    }

    let rate = vendor
        .calc_fulfillment_rate(&app.orders)
        .await
        .expect("fulfillment rate");
    assert_eq!(rate, 0.6);
}

#[tokio::test]
async fn quality_average_is_rounded_to_whole_number() {
    let app = TestApp::new().await;
    let vendor = app.create_vendor("Crate & Co").await;

    for rating in [4.0, 5.0, 3.0] {
        app.insert_order(OrderFixture::completed(vendor.id).rated(rating))
            .await;
    }
    // Ratings on orders that never completed are ignored.
    app.insert_order(OrderFixture::new(vendor.id, OrderStatus::Cancelled).rated(1.0))
        .await;

    let avg = vendor
        .calc_avg_quality_ratings(&app.orders)
        .await
        .expect("quality average");
    assert_eq!(avg, 4.0);
}

#[tokio::test]
async fn response_time_of_single_order_is_its_interval_in_seconds() {
    let app = TestApp::new().await;
    let vendor = app.create_vendor("Delta Freight").await;

    let issued = base_time();
    app.insert_order(
        OrderFixture::new(vendor.id, OrderStatus::Pending)
            .issued_and_acked(issued, issued + Duration::seconds(3600)),
    )
    .await;

    let secs = vendor
        .calc_avg_response_time(&app.orders)
        .await
        .expect("response time");
    assert_eq!(secs, 3600.0);
}

#[tokio::test]
async fn response_time_averages_intervals_across_orders() {
    let app = TestApp::new().await;
    let vendor = app.create_vendor("Echo Metals").await;

    let first = base_time();
    let second = base_time() + Duration::days(10);
    app.insert_order(
        OrderFixture::completed(vendor.id).issued_and_acked(first, first + Duration::minutes(30)),
    )
    .await;
    app.insert_order(
        OrderFixture::new(vendor.id, OrderStatus::Pending)
            .issued_and_acked(second, second + Duration::minutes(90)),
    )
    .await;
    // Issued but never acknowledged: excluded.
    let mut open = OrderFixture::new(vendor.id, OrderStatus::Pending);
    open.issue_date = Some(second);
    app.insert_order(open).await;

    let secs = vendor
        .calc_avg_response_time(&app.orders)
        .await
        .expect("response time");
    assert_eq!(secs, 3600.0);
}

#[tokio::test]
async fn vendor_without_orders_scores_zero_everywhere() {
    let app = TestApp::new().await;
    let vendor = app.create_vendor("Fresh Start").await;

    assert_eq!(vendor.calc_on_time_delivery_rate(&app.orders).await.unwrap(), 0.0);
    assert_eq!(vendor.calc_fulfillment_rate(&app.orders).await.unwrap(), 0.0);
    assert_eq!(vendor.calc_avg_quality_ratings(&app.orders).await.unwrap(), 0.0);
    assert_eq!(vendor.calc_avg_response_time(&app.orders).await.unwrap(), 0.0);
}

#[tokio::test]
async fn orders_of_other_vendors_do_not_leak_into_metrics() {
    let app = TestApp::new().await;
    let vendor = app.create_vendor("Gamma Parts").await;
    let other = app.create_vendor("Other Parts").await;

    app.insert_order(OrderFixture::completed(vendor.id).acknowledged(Duration::zero()))
        .await;
    app.insert_order(OrderFixture::new(other.id, OrderStatus::Pending))
        .await;
    app.insert_order(OrderFixture::completed(other.id).acknowledged(Duration::days(3)))
        .await;

    let metrics = vendor.calc_all_metrics(&app.orders).await.unwrap();
    assert_eq!(metrics.on_time_delivery_rate, 1.0);
    assert_eq!(metrics.fulfillment_rate, 1.0);
}

#[tokio::test]
async fn calculations_are_idempotent() {
    let app = TestApp::new().await;
    let vendor = app.create_vendor("Helix Tools").await;

    app.insert_order(OrderFixture::completed(vendor.id).acknowledged(Duration::zero()).rated(3.0))
        .await;
    app.insert_order(OrderFixture::completed(vendor.id).acknowledged(Duration::days(2)).rated(4.0))
        .await;
    app.insert_order(OrderFixture::new(vendor.id, OrderStatus::Pending))
        .await;

    let first = vendor.calc_all_metrics(&app.orders).await.unwrap();
    let second = vendor.calc_all_metrics(&app.orders).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.on_time_delivery_rate,
        vendor.calc_on_time_delivery_rate(&app.orders).await.unwrap()
    );
    assert_eq!(first.fulfillment_rate, 0.67);
}

#[rstest]
#[case(None, 3)]
#[case(Some("completed"), 2)]
#[case(Some("pending"), 1)]
#[case(Some("cancelled"), 0)]
#[tokio::test]
async fn status_lookup_filters_by_known_status(
    #[case] status: Option<&str>,
    #[case] expected: usize,
) {
    let vendor = detached_vendor();
    let store = CountingStore::with_orders(vec![
        OrderFixture::completed(vendor.id).into_model(),
        OrderFixture::completed(vendor.id).into_model(),
        OrderFixture::new(vendor.id, OrderStatus::Pending).into_model(),
    ]);

    let lookup = vendor
        .get_purchase_orders_by_status(&store, status)
        .await
        .expect("lookup");
    assert_matches!(lookup, OrderLookup::Found(ref orders) if orders.len() == expected);
}

#[rstest]
#[case("shipped")]
#[case("canceled")]
#[case("COMPLETED")]
#[tokio::test]
async fn unknown_status_is_an_invalid_filter_not_an_empty_result(#[case] status: &str) {
    let vendor = detached_vendor();
    let store = CountingStore::with_orders(vec![OrderFixture::completed(vendor.id).into_model()]);

    let lookup = vendor
        .get_purchase_orders_by_status(&store, Some(status))
        .await
        .expect("lookup does not fail");

    assert!(lookup.is_invalid());
    assert_eq!(store.calls(), 0, "invalid filters never reach the store");
    assert_matches!(
        lookup.clone(),
        OrderLookup::InvalidFilter(ref s) if s == status
    );
    assert_matches!(lookup.into_orders(), Err(ServiceError::InvalidStatus(_)));
}
