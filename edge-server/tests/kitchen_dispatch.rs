//! Kitchen ticket dispatch through the print service
//!
//! Real SQLite (in memory) for orders and stations, fake printer transport.

mod common;

use std::time::{Duration, Instant};

use common::*;
use edge_server::db::repository::print_station;
use edge_server::printing::{DispatchOptions, PrintServiceError, StationKey};
use edge_server::{OrderError, ServerState};
use shared::models::OrderHeader;

async fn order_with_all_stations(state: &ServerState) -> String {
    state
        .orders
        .create_order(
            table("12"),
            vec![paneer_tikka(), mango_lassi(), gulab_jamun()],
            OPERATOR,
        )
        .await
        .unwrap()
        .order_id
}

#[tokio::test]
async fn one_ticket_per_station_plus_default() {
    let printer = FakePrinter::new();
    let state = test_state(printer.clone()).await;
    seed_stations(&state.pool).await;
    let order_id = order_with_all_stations(&state).await;

    let result = state
        .kitchen
        .dispatch_kitchen_tickets(&order_id, DispatchOptions::default())
        .await
        .unwrap();

    assert_eq!(result.jobs, 3);
    assert_eq!(result.printed, 3);
    assert!(result.is_complete());
    assert_eq!(
        printer.targets(),
        vec!["bar-printer", "default-printer", "grill-printer"]
    );

    let grill = printer.documents_for("grill-printer");
    assert!(grill[0].contains("GRILL"));
    assert!(grill[0].contains("2 x Paneer Tikka"));
    assert!(!grill[0].contains("Mango Lassi"));
    assert!(grill[0].contains("Table 12"));

    let kitchen = printer.documents_for(DEFAULT_PRINTER);
    assert!(kitchen[0].contains("KITCHEN"));
    assert!(kitchen[0].contains("3 x Gulab Jamun"));
}

#[tokio::test]
async fn failing_station_does_not_affect_siblings() {
    let printer = FakePrinter::new();
    let state = test_state(printer.clone()).await;
    let (_, bar) = seed_stations(&state.pool).await;
    let order_id = order_with_all_stations(&state).await;

    printer.fail("bar-printer");
    let result = state
        .kitchen
        .dispatch_kitchen_tickets(&order_id, DispatchOptions::default())
        .await
        .unwrap();

    assert_eq!(result.jobs, 3);
    assert_eq!(result.printed, 2);
    assert_eq!(result.failures.len(), 1);
    let failure = result.failure_for(StationKey::Station(bar.id)).unwrap();
    assert_eq!(failure.station_name, "Bar");
    assert!(failure.message.contains("connection refused"));
    assert_eq!(printer.targets(), vec!["default-printer", "grill-printer"]);

    // Printing never alters the order
    let detail = state.orders.get_order(&order_id).await.unwrap().unwrap();
    assert_eq!(detail.items.len(), 3);
}

#[tokio::test]
async fn hung_printer_times_out_alone() {
    let printer = FakePrinter::new();
    let state = test_state(printer.clone()).await;
    let (grill, _) = seed_stations(&state.pool).await;
    let order_id = order_with_all_stations(&state).await;

    printer.hang("grill-printer");
    let started = Instant::now();
    let result = state
        .kitchen
        .dispatch_kitchen_tickets(&order_id, DispatchOptions::default())
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(result.printed, 2);
    let failure = result.failure_for(StationKey::Station(grill.id)).unwrap();
    assert!(failure.message.contains("timed out"));
    assert_eq!(printer.targets(), vec!["bar-printer", "default-printer"]);

    // The timed-out job still handed its surface back
    let stats = state.kitchen.pool_stats();
    assert_eq!(stats.idle as u64 + stats.discarded, stats.created);
}

#[tokio::test]
async fn pool_surfaces_are_reused_after_failures() {
    let printer = FakePrinter::new();
    let state = test_state(printer.clone()).await;
    seed_stations(&state.pool).await;
    let order_id = order_with_all_stations(&state).await;

    printer.fail("grill-printer");
    state
        .kitchen
        .dispatch_kitchen_tickets(&order_id, DispatchOptions::default())
        .await
        .unwrap();
    let first = state.kitchen.pool_stats();
    assert!((1..=3).contains(&first.created));
    assert_eq!(first.idle as u64, first.created);
    assert_eq!(first.discarded, 0);

    printer.heal("grill-printer");
    let result = state
        .kitchen
        .dispatch_kitchen_tickets(&order_id, DispatchOptions::reprint())
        .await
        .unwrap();
    assert!(result.is_complete());

    let second = state.kitchen.pool_stats();
    assert_eq!(second.created, first.created);
    assert_eq!(second.reused, first.reused + 3);
    assert_eq!(second.idle as u64, second.created);

    // A reused surface starts from a clean buffer
    let grill = printer.documents_for("grill-printer");
    assert_eq!(grill.len(), 1);
    assert_eq!(grill[0].matches("Paneer Tikka").count(), 1);
    assert!(grill[0].contains("REPRINT"));
}

#[tokio::test]
async fn bill_is_attached_on_request() {
    let printer = FakePrinter::new();
    let state = test_state(printer.clone()).await;
    seed_stations(&state.pool).await;
    let order_id = order_with_all_stations(&state).await;

    state
        .kitchen
        .dispatch_kitchen_tickets(&order_id, DispatchOptions::with_bill())
        .await
        .unwrap();

    let bar = printer.documents_for("bar-printer");
    assert!(bar[0].contains("BILL"));
    // The bill lists the whole order, not just this station's items
    assert!(bar[0].contains("Paneer Tikka"));
    assert!(bar[0].contains("TOTAL"));
}

#[tokio::test]
async fn inactive_station_routes_to_default() {
    let printer = FakePrinter::new();
    let state = test_state(printer.clone()).await;
    let (_, bar) = seed_stations(&state.pool).await;
    print_station::set_station_active(&state.pool, bar.id, false)
        .await
        .unwrap();
    let order_id = order_with_all_stations(&state).await;

    let result = state
        .kitchen
        .dispatch_kitchen_tickets(&order_id, DispatchOptions::default())
        .await
        .unwrap();

    assert_eq!(result.jobs, 2);
    assert_eq!(printer.targets(), vec!["default-printer", "grill-printer"]);
    let kitchen = printer.documents_for(DEFAULT_PRINTER);
    assert!(kitchen[0].contains("Mango Lassi"));
    assert!(kitchen[0].contains("Gulab Jamun"));
}

#[tokio::test]
async fn without_stations_everything_goes_to_default() {
    let printer = FakePrinter::new();
    let state = test_state(printer.clone()).await;
    let order_id = order_with_all_stations(&state).await;

    let result = state
        .kitchen
        .dispatch_kitchen_tickets(&order_id, DispatchOptions::default())
        .await
        .unwrap();
    assert_eq!(result.jobs, 1);
    assert_eq!(printer.targets(), vec![DEFAULT_PRINTER]);
}

#[tokio::test]
async fn completed_orders_can_be_reprinted_but_cancelled_cannot() {
    let printer = FakePrinter::new();
    let state = test_state(printer.clone()).await;
    seed_stations(&state.pool).await;

    let done = state
        .orders
        .create_order(OrderHeader::new(shared::models::OrderType::Takeaway), vec![mango_lassi()], OPERATOR)
        .await
        .unwrap();
    state
        .orders
        .complete_order(&done.order_id, shared::models::PaymentMethod::Cash, OPERATOR)
        .await
        .unwrap();
    let result = state
        .kitchen
        .dispatch_kitchen_tickets(&done.order_id, DispatchOptions::reprint())
        .await
        .unwrap();
    assert_eq!(result.printed, 1);

    let cancelled = state
        .orders
        .create_order(table("3"), vec![paneer_tikka()], OPERATOR)
        .await
        .unwrap();
    state.orders.cancel_order(&cancelled.order_id, OPERATOR).await.unwrap();
    let err = state
        .kitchen
        .dispatch_kitchen_tickets(&cancelled.order_id, DispatchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PrintServiceError::Order(OrderError::InvalidState { .. })
    ));
    assert_eq!(printer.count(), 1);
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let state = test_state(FakePrinter::new()).await;
    let err = state
        .kitchen
        .dispatch_kitchen_tickets("nope", DispatchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PrintServiceError::Order(OrderError::NotFound { .. })));
}

#[tokio::test]
async fn void_ticket_goes_to_the_items_station() {
    let printer = FakePrinter::new();
    let state = test_state(printer.clone()).await;
    seed_stations(&state.pool).await;
    let order_id = order_with_all_stations(&state).await;
    let detail = state.orders.get_order(&order_id).await.unwrap().unwrap();
    let lassi = detail
        .items
        .iter()
        .find(|i| i.item_name == "Mango Lassi")
        .unwrap()
        .id
        .clone();

    let result = state
        .kitchen
        .dispatch_void_ticket(&order_id, &[lassi], "Customer changed mind")
        .await
        .unwrap();

    assert_eq!(result.jobs, 1);
    assert_eq!(printer.targets(), vec!["bar-printer"]);
    let doc = &printer.documents_for("bar-printer")[0];
    assert!(doc.contains("VOID"));
    assert!(doc.contains("Customer changed mind"));
    assert!(doc.contains("Mango Lassi"));

    // Presentation only
    let after = state.orders.get_order(&order_id).await.unwrap().unwrap();
    assert_eq!(after, detail);
}

#[tokio::test]
async fn void_ticket_rejects_bad_requests() {
    let printer = FakePrinter::new();
    let state = test_state(printer.clone()).await;
    let order_id = order_with_all_stations(&state).await;
    let item = state.orders.get_order(&order_id).await.unwrap().unwrap().items[0]
        .id
        .clone();

    let err = state
        .kitchen
        .dispatch_void_ticket(&order_id, &[item.clone()], "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, PrintServiceError::Validation(_)));

    let err = state
        .kitchen
        .dispatch_void_ticket(&order_id, &[], "wrong table")
        .await
        .unwrap_err();
    assert!(matches!(err, PrintServiceError::Validation(_)));

    let err = state
        .kitchen
        .dispatch_void_ticket(&order_id, &[item, "ghost".to_string()], "wrong table")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PrintServiceError::Order(OrderError::NotFound { entity: "order_item", .. })
    ));
    assert_eq!(printer.count(), 0);
}
