//! Demo: one batch through a simulated robot.
//!
//! Reads configuration from the TOML file named by `FULFILMENT_CONFIG`, or uses the
//! defaults. `RUST_LOG=debug` shows every placement.

use fulfilment::config::{load_config, validate_config, FulfilmentConfig};
use fulfilment::lifecycle::{setup_tracing, FulfilmentService};
use fulfilment::model::{Item, Order};
use sorting_robot::{SimulatedRobot, SortingRobot};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = match std::env::var("FULFILMENT_CONFIG") {
        Ok(path) => load_config(Path::new(&path))?,
        Err(_) => FulfilmentConfig::default(),
    };
    validate_config(&config)?;

    let (robot, robot_client) = SimulatedRobot::from_seed(32, config.robot.seed);
    let robot_handle = tokio::spawn(robot.run());

    let orders = vec![
        Order::new(
            "order_1",
            vec![Item::new("1", "Apple"), Item::new("2", "Banana")],
        ),
        Order::new(
            "order_2",
            vec![Item::new("1", "Apple"), Item::new("3", "Cherry")],
        ),
        Order::new("order_3", vec![Item::new("4", "Durian")]),
    ];
    let stock: Vec<Item> = orders.iter().flat_map(|o| o.items.clone()).collect();
    robot_client.load_items(stock).await?;

    let service = FulfilmentService::new(&config, Arc::new(robot_client.clone()));

    let span = tracing::info_span!("demo_batch");
    let outcome = async {
        let handle = service.load_orders(orders).await?;
        info!(batch_id = %handle.batch_id(), "Batch accepted, waiting for the robot");
        handle.wait().await
    }
    .instrument(span)
    .await;

    match outcome {
        Ok(report) => info!(
            batch_id = %report.batch_id,
            placed_items = report.placed_items,
            "Batch finished"
        ),
        Err(e) => error!(error = %e, "Batch failed"),
    }

    for status in service.get_all_orders_status().await? {
        println!(
            "{:<10} {:<8} {}",
            status.order_id,
            status.state,
            status
                .cubby
                .map_or_else(|| "-".to_string(), |cubby| cubby.to_string())
        );
    }

    if let Ok(status) = service.mark_fulfilled("order_1").await {
        info!(order_id = %status.order_id, "Collected");
    }

    service.shutdown().await?;
    drop(robot_client);
    robot_handle.await?;

    info!("Demo completed successfully");
    Ok(())
}
