//! End-to-end runs against the simulated robot.

use fulfilment::config::FulfilmentConfig;
use fulfilment::coordinator::CoordinatorError;
use fulfilment::lifecycle::FulfilmentService;
use fulfilment::model::{CubbyId, Item, ItemCode, Order, OrderId, OrderState};
use fulfilment::FulfilmentError;
use sorting_robot::{RobotClient, RobotError, SimulatedRobot, SortingRobot};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

fn start(seed: u64) -> (FulfilmentService, RobotClient) {
    let (robot, client) = SimulatedRobot::with_seed(16, seed);
    tokio::spawn(robot.run());
    let service = FulfilmentService::new(&FulfilmentConfig::default(), Arc::new(client.clone()));
    (service, client)
}

fn item(code: &str) -> Item {
    Item::new(code, format!("item {}", code))
}

fn order(id: &str, codes: &[&str]) -> Order {
    Order::new(id, codes.iter().map(|code| item(code)).collect())
}

fn stock(orders: &[Order]) -> Vec<Item> {
    orders.iter().flat_map(|o| o.items.clone()).collect()
}

#[tokio::test]
async fn test_two_orders_get_distinct_cubbies_and_become_ready() {
    let (service, robot) = start(1);
    let orders = vec![order("order_1", &["1"]), order("order_2", &["2"])];
    robot.load_items(stock(&orders)).await.unwrap();

    let report = service.load_orders(orders).await.unwrap().wait().await.unwrap();
    assert_eq!(report.placed_items, 2);

    let first = service.get_order_status_by_id("order_1").await.unwrap();
    let second = service.get_order_status_by_id("order_2").await.unwrap();
    assert_eq!(first.state, OrderState::Ready);
    assert_eq!(second.state, OrderState::Ready);
    assert!(first.cubby.is_some());
    assert_ne!(first.cubby, second.cubby);

    let placements = robot.placements().await.unwrap();
    for placement in placements {
        let expected = match placement.item.code.as_str() {
            "1" => first.cubby,
            _ => second.cubby,
        };
        assert_eq!(Some(placement.cubby), expected);
    }

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_every_item_lands_in_its_orders_cubby() {
    let (service, robot) = start(42);
    let orders = vec![
        order("o1", &["A", "B", "C"]),
        order("o2", &["A", "A"]),
        order("o3", &["C", "D", "B"]),
        order("o4", &["D"]),
    ];
    robot.load_items(stock(&orders)).await.unwrap();

    let report = service
        .load_orders(orders.clone())
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert_eq!(report.placed_items, 9);

    let cubbies: HashMap<OrderId, CubbyId> = report
        .prepared
        .iter()
        .map(|p| (p.order.id.clone(), p.cubby))
        .collect();
    assert_eq!(cubbies.values().collect::<HashSet<_>>().len(), 4);

    let mut received: HashMap<CubbyId, Vec<ItemCode>> = HashMap::new();
    for placement in robot.placements().await.unwrap() {
        received
            .entry(placement.cubby)
            .or_default()
            .push(placement.item.code);
    }
    for order in &orders {
        let mut expected: Vec<ItemCode> = order.items.iter().map(|i| i.code.clone()).collect();
        let mut actual = received.remove(&cubbies[&order.id]).unwrap_or_default();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected, "wrong items in cubby of {}", order.id);

        let status = service.get_order_status_by_id(order.id.clone()).await.unwrap();
        assert_eq!(status.state, OrderState::Ready);
        assert_eq!(status.cubby, Some(cubbies[&order.id]));
    }
    assert!(received.is_empty());
    assert!(service.routing_snapshot().await.is_empty());

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_codes_need_both_placements() {
    let (service, robot) = start(3);
    let orders = vec![order("o1", &["A", "A"])];
    robot.load_items(stock(&orders)).await.unwrap();

    let report = service.load_orders(orders).await.unwrap().wait().await.unwrap();
    assert_eq!(report.placed_items, 2);

    let status = service.get_order_status_by_id("o1").await.unwrap();
    assert_eq!(status.state, OrderState::Ready);
    let placements = robot.placements().await.unwrap();
    assert_eq!(placements.len(), 2);
    assert!(placements.iter().all(|p| Some(p.cubby) == status.cubby));

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_one_of_two_duplicate_items_is_not_enough() {
    let (service, robot) = start(3);
    robot.load_items(vec![item("A")]).await.unwrap();

    let err = service
        .load_orders(vec![order("o1", &["A", "A"])])
        .await
        .unwrap()
        .wait()
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FulfilmentError::Coordinator(CoordinatorError::Robot(RobotError::NoItemsLoaded))
    );

    let status = service.get_order_status_by_id("o1").await.unwrap();
    assert!(matches!(status.state, OrderState::Failed { .. }));

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_empty_robot_fails_the_batch_but_not_the_service() {
    let (service, robot) = start(5);

    let err = service
        .load_orders(vec![order("o1", &["A"])])
        .await
        .unwrap()
        .wait()
        .await
        .unwrap_err();
    assert_eq!(err, FulfilmentError::from(RobotError::NoItemsLoaded));
    assert!(!err.is_internal());

    let status = service.get_order_status_by_id("o1").await.unwrap();
    assert_ne!(status.state, OrderState::Ready);
    assert_eq!(
        status.state,
        OrderState::Failed {
            reason: err.to_string()
        }
    );

    robot.load_items(vec![item("B")]).await.unwrap();
    let report = service
        .load_orders(vec![order("o2", &["B"])])
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert_eq!(report.placed_items, 1);
    assert_eq!(
        service.get_order_status_by_id("o2").await.unwrap().state,
        OrderState::Ready
    );

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_stray_item_fails_one_batch_and_is_placed_by_the_next() {
    let (service, robot) = start(21);
    robot.load_items(vec![item("Z")]).await.unwrap();

    let err = service
        .load_orders(vec![order("o1", &["A"])])
        .await
        .unwrap()
        .wait()
        .await
        .unwrap_err();
    assert!(err.is_internal());

    robot.load_items(vec![item("B")]).await.unwrap();
    let report = service
        .load_orders(vec![order("o2", &["Z"]), order("o3", &["B"])])
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert_eq!(report.placed_items, 2);

    for id in ["o2", "o3"] {
        assert_eq!(
            service.get_order_status_by_id(id).await.unwrap().state,
            OrderState::Ready
        );
    }
    let placements = robot.placements().await.unwrap();
    assert_eq!(placements[0].item.code, ItemCode::from("Z"));
    assert_eq!(placements[0].cubby, report.prepared[0].cubby);

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_orders() {
    let (service, robot) = start(23);
    let service = Arc::new(service);
    let count = 8;
    robot
        .load_items((0..count).map(|_| item("A")).collect())
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for n in 0..count {
        let service = service.clone();
        tasks.push(tokio::spawn(async move {
            let id = format!("order_{}", n);
            let handle = service
                .load_orders(vec![order(&id, &["A"])])
                .await
                .unwrap();

            let status = service.get_order_status_by_id(id.as_str()).await.unwrap();
            assert!(!status.state.is_terminal() || status.state.is_ready());
            service.get_all_orders_status().await.unwrap();

            handle.wait().await.unwrap();
            service.get_order_status_by_id(id.as_str()).await.unwrap()
        }));
    }

    for task in tasks {
        let status = task.await.unwrap();
        assert_eq!(status.state, OrderState::Ready);
        assert!(status.cubby.is_some());
    }

    let all = service.get_all_orders_status().await.unwrap();
    assert_eq!(all.len(), count);
    assert!(all.iter().all(|s| s.state.is_ready()));
    assert!(all.windows(2).all(|w| w[0].batch_id < w[1].batch_id));

    let service = Arc::try_unwrap(service).ok().unwrap();
    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_batches_are_processed_in_acceptance_order() {
    let (service, robot) = start(9);
    robot.load_items(vec![item("A"), item("A")]).await.unwrap();

    let first = service.load_orders(vec![order("o1", &["A"])]).await.unwrap();
    let second = service.load_orders(vec![order("o2", &["A"])]).await.unwrap();
    assert!(first.batch_id() < second.batch_id());

    let first = first.wait().await.unwrap();
    let second = second.wait().await.unwrap();

    let placements = robot.placements().await.unwrap();
    assert_eq!(placements.len(), 2);
    assert_eq!(placements[0].cubby, first.prepared[0].cubby);
    assert_eq!(placements[1].cubby, second.prepared[0].cubby);

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_empty_order_is_ready_once_it_has_a_cubby() {
    let (service, robot) = start(11);
    robot.load_items(vec![item("A")]).await.unwrap();

    service
        .load_orders(vec![order("empty", &[]), order("full", &["A"])])
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();

    let status = service.get_order_status_by_id("empty").await.unwrap();
    assert_eq!(status.state, OrderState::Ready);
    assert!(status.cubby.is_some());

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_mark_fulfilled_lifecycle() {
    let (service, robot) = start(13);
    robot.load_items(vec![item("A")]).await.unwrap();

    service
        .load_orders(vec![order("o1", &["A"])])
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();

    let err = service
        .load_orders(vec![order("o1", &["B"])])
        .await
        .unwrap_err();
    assert!(matches!(err, FulfilmentError::InvalidBatch(_)));

    let status = service.mark_fulfilled("o1").await.unwrap();
    assert_eq!(status.state, OrderState::Ready);
    assert_eq!(
        service.get_order_status_by_id("o1").await.unwrap_err(),
        FulfilmentError::OrderNotFound(OrderId::from("o1"))
    );
    assert_eq!(
        service.mark_fulfilled("o1").await.unwrap_err(),
        FulfilmentError::OrderNotFound(OrderId::from("o1"))
    );

    // Robot bin is empty now, so this batch fails.
    let handle = service
        .load_orders(vec![order("o1", &["A"])])
        .await
        .unwrap();
    assert!(handle.wait().await.is_err());
    let err = service.mark_fulfilled("o1").await.unwrap_err();
    assert!(matches!(
        err,
        FulfilmentError::OrderNotReady {
            state: OrderState::Failed { .. },
            ..
        }
    ));

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_status_queries_never_fail_for_unknown_ids() {
    let (service, _robot) = start(17);

    assert_eq!(
        service.get_order_status_by_id("nope").await.unwrap_err(),
        FulfilmentError::OrderNotFound(OrderId::from("nope"))
    );
    assert!(service.get_all_orders_status().await.unwrap().is_empty());

    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_batches_register_nothing() {
    let (service, _robot) = start(19);

    assert!(matches!(
        service.load_orders(vec![]).await.unwrap_err(),
        FulfilmentError::InvalidBatch(_)
    ));
    assert!(matches!(
        service
            .load_orders(vec![order("o1", &["A"]), order("o1", &["B"])])
            .await
            .unwrap_err(),
        FulfilmentError::InvalidBatch(_)
    ));
    assert!(service.get_all_orders_status().await.unwrap().is_empty());

    service.shutdown().await.unwrap();
}
