use sorting_robot::{CubbyId, Item, RobotClient, RobotError, SimulatedRobot, SortingRobot};

fn start_robot() -> RobotClient {
    let (robot, client) = SimulatedRobot::with_seed(16, 2024);
    tokio::spawn(robot.run());
    client
}

async fn robot_with_two_items() -> (RobotClient, Vec<Item>) {
    let items = vec![Item::new("1", "Apple"), Item::new("2", "Banana")];
    let client = start_robot();
    client.load_items(items.clone()).await.unwrap();
    (client, items)
}

#[tokio::test]
async fn test_load_items_no_error() {
    let client = start_robot();
    let result = client
        .load_items(vec![Item::new("1", "Apple"), Item::new("2", "Banana")])
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_select_item_when_no_loaded_items() {
    let client = start_robot();
    let err = client.select_item().await.unwrap_err();
    assert_eq!(err, RobotError::NoItemsLoaded);
    assert_eq!(err.to_string(), "no items loaded");
}

#[tokio::test]
async fn test_select_item_when_an_item_is_already_selected() {
    let (client, _) = robot_with_two_items().await;
    assert!(client.select_item().await.is_ok());

    let err = client.select_item().await.unwrap_err();
    assert_eq!(err, RobotError::AlreadySelected);
    assert_eq!(err.to_string(), "an item is already selected");
}

#[tokio::test]
async fn test_select_item_returns_a_loaded_item() {
    let (client, items) = robot_with_two_items().await;
    let item = client.select_item().await.unwrap();
    assert!(items.contains(&item));
}

#[tokio::test]
async fn test_move_item_when_an_item_is_selected() {
    let (client, _) = robot_with_two_items().await;
    client.select_item().await.unwrap();
    assert!(client.move_item(CubbyId(1)).await.is_ok());

    // The hold is cleared, so the next select succeeds.
    assert!(client.select_item().await.is_ok());
}

#[tokio::test]
async fn test_move_item_when_no_item_is_selected() {
    let client = start_robot();
    let err = client.move_item(CubbyId(1)).await.unwrap_err();
    assert_eq!(err, RobotError::NoItemSelected);
    assert_eq!(err.to_string(), "no item is selected");
}

#[tokio::test]
async fn test_bin_empties_after_every_item_is_moved() {
    let (client, _) = robot_with_two_items().await;
    for cubby in 0..2 {
        client.select_item().await.unwrap();
        client.move_item(CubbyId(cubby)).await.unwrap();
    }
    assert_eq!(
        client.select_item().await.unwrap_err(),
        RobotError::NoItemsLoaded
    );
    assert_eq!(client.placements().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_dropped_robot_reports_disconnect() {
    let (robot, client) = SimulatedRobot::new(4);
    drop(robot);
    assert_eq!(
        client.select_item().await.unwrap_err(),
        RobotError::Disconnected
    );
}
