use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use food_ordering::schema::orders;
use uuid::Uuid;

use crate::helpers::{MessageBody, TestApp, TestUser};

async fn stock_of(app: &TestApp, user: &TestUser, item_id: Uuid) -> i64 {
    let body: serde_json::Value = app.get(&user.client, "/list_items")
        .await
        .json()
        .await
        .unwrap();

    body["items"].as_array()
        .unwrap()
        .iter()
        .find(|item| item["item_id"] == item_id.to_string())
        .and_then(|item| item["available_quantity"].as_i64())
        .unwrap()
}

#[actix_web::test]
async fn create_items_order_returns_order_id(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;
    let customer = app.create_logged_in_user(0).await;
    let item_id = app.add_item(&vendor, "Thali", 10, 150).await;

    let response = app.create_cart(&customer, serde_json::json!([{"item_id": item_id, "quantity": 2}])).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Order added to cart successfully");
    assert!(body["order_id"].is_string());

    // Nothing is reserved until the order is placed
    assert_eq!(stock_of(&app, &customer, item_id).await, 10);
}

#[actix_web::test]
async fn only_customers_can_create_orders(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;
    let admin = app.create_logged_in_user(2).await;
    let item_id = app.add_item(&vendor, "Thali", 10, 150).await;

    let lines = serde_json::json!([{"item_id": item_id, "quantity": 1}]);
    for user in [&vendor, &admin] {
        let response = app.create_cart(user, lines.clone()).await;
        assert_eq!(response.status().as_u16(), 403);
    }
}

#[actix_web::test]
async fn create_items_order_with_invalid_lines_returns_400(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;
    let customer = app.create_logged_in_user(0).await;
    let item_id = app.add_item(&vendor, "Thali", 10, 150).await;

    let test_cases = vec![
        (serde_json::json!([]), "no lines"),
        (serde_json::json!([{"item_id": item_id, "quantity": 0}]), "zero quantity"),
        (serde_json::json!([{"item_id": item_id, "quantity": -3}]), "negative quantity"),
        (serde_json::json!([{"item_id": "not-a-uuid", "quantity": 1}]), "malformed item_id"),
    ];

    for (lines, description) in test_cases {
        let response = app.create_cart(&customer, lines).await;

        assert_eq!(
            response.status().as_u16(),
            400,
            "The API did not fail with 400 Bad Request when the cart had {}",
            description
        );
    }
}

#[actix_web::test]
async fn create_items_order_with_unknown_item_returns_404(){
    let app = TestApp::spawn_app().await;
    let customer = app.create_logged_in_user(0).await;

    let response = app.create_cart(&customer, serde_json::json!([{"item_id": Uuid::new_v4(), "quantity": 1}])).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn place_order_charges_total_and_decrements_stock(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;
    let customer = app.create_logged_in_user(0).await;
    let rice = app.add_item(&vendor, "Jeera rice", 10, 120).await;
    let dal = app.add_item(&vendor, "Dal tadka", 5, 90).await;

    let order_id = app.create_cart_id(&customer, serde_json::json!([
        {"item_id": rice, "quantity": 2},
        {"item_id": dal, "quantity": 3},
        {"item_id": rice, "quantity": 1}
    ])).await;

    let response = app.place_order(&customer, order_id).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Order is successfully placed");
    assert_eq!(body["total_amount"], 3 * 120 + 3 * 90);

    assert_eq!(stock_of(&app, &customer, rice).await, 7);
    assert_eq!(stock_of(&app, &customer, dal).await, 2);

    let mut conn = app.pool.get().unwrap();
    let (is_placed, total_amount): (bool, i64) = orders::table
        .filter(orders::order_id.eq(order_id))
        .select((orders::is_placed, orders::total_amount))
        .first(&mut conn)
        .unwrap();
    assert!(is_placed);
    assert_eq!(total_amount, 630);
}

#[actix_web::test]
async fn placing_an_order_twice_returns_409(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;
    let customer = app.create_logged_in_user(0).await;
    let item_id = app.add_item(&vendor, "Paratha", 10, 40).await;

    let order_id = app.create_cart_id(&customer, serde_json::json!([{"item_id": item_id, "quantity": 4}])).await;

    let response = app.place_order(&customer, order_id).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.place_order(&customer, order_id).await;
    assert_eq!(response.status().as_u16(), 409);

    assert_eq!(stock_of(&app, &customer, item_id).await, 6);
}

#[actix_web::test]
async fn insufficient_stock_rolls_back_the_whole_order(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;
    let customer = app.create_logged_in_user(0).await;
    let plenty = app.add_item(&vendor, "Naan", 50, 30).await;
    let scarce = app.add_item(&vendor, "Gulab jamun", 1, 60).await;

    let order_id = app.create_cart_id(&customer, serde_json::json!([
        {"item_id": plenty, "quantity": 5},
        {"item_id": scarce, "quantity": 2}
    ])).await;

    let response = app.place_order(&customer, order_id).await;
    assert_eq!(response.status().as_u16(), 409);

    let body: MessageBody = response.json().await.unwrap();
    assert!(body.message.contains(&scarce.to_string()));

    assert_eq!(stock_of(&app, &customer, plenty).await, 50);
    assert_eq!(stock_of(&app, &customer, scarce).await, 1);
}

#[actix_web::test]
async fn placing_unknown_or_foreign_order_returns_404(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;
    let owner = app.create_logged_in_user(0).await;
    let stranger = app.create_logged_in_user(0).await;
    let item_id = app.add_item(&vendor, "Samosa", 10, 20).await;

    let order_id = app.create_cart_id(&owner, serde_json::json!([{"item_id": item_id, "quantity": 1}])).await;

    let response = app.place_order(&stranger, order_id).await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app.place_order(&owner, Uuid::new_v4()).await;
    assert_eq!(response.status().as_u16(), 404);

    assert_eq!(stock_of(&app, &owner, item_id).await, 10);
}

#[actix_web::test]
async fn list_orders_returns_only_placed_orders(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;
    let customer = app.create_logged_in_user(0).await;
    let item_id = app.add_item(&vendor, "Kulfi", 10, 50).await;

    let placed = app.create_cart_id(&customer, serde_json::json!([{"item_id": item_id, "quantity": 2}])).await;
    let _in_cart = app.create_cart_id(&customer, serde_json::json!([{"item_id": item_id, "quantity": 1}])).await;
    app.place_order(&customer, placed).await;

    let body = serde_json::json!({ "cust_id": customer.user_id });
    let response = app.post_json(&customer.client, "/list_orders", &body).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["order_id"], placed.to_string());
    assert_eq!(orders[0]["total_amount"], 100);

    let items = orders[0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["item_id"], item_id.to_string());
    assert_eq!(items[0]["quantity"], 2);
}

#[actix_web::test]
async fn customers_cannot_list_orders_of_others(){
    let app = TestApp::spawn_app().await;
    let customer = app.create_logged_in_user(0).await;
    let other = app.create_logged_in_user(0).await;
    let admin = app.create_logged_in_user(2).await;

    let body = serde_json::json!({ "cust_id": other.user_id });

    let response = app.post_json(&customer.client, "/list_orders", &body).await;
    assert_eq!(response.status().as_u16(), 403);
    let message: MessageBody = response.json().await.unwrap();
    assert_eq!(message.message, "Customers can only list their own orders");

    let response = app.post_json(&admin.client, "/list_orders", &body).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[actix_web::test]
async fn list_all_orders_is_admin_only(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;
    let customer = app.create_logged_in_user(0).await;
    let admin = app.create_logged_in_user(2).await;
    let item_id = app.add_item(&vendor, "Lassi", 10, 35).await;

    app.create_cart_id(&customer, serde_json::json!([{"item_id": item_id, "quantity": 1}])).await;

    for user in [&customer, &vendor] {
        let response = app.get(&user.client, "/list_all_orders").await;
        assert_eq!(response.status().as_u16(), 403);
    }

    let response = app.get(&admin.client, "/list_all_orders").await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["user_id"], customer.user_id.to_string());
    assert_eq!(orders[0]["is_placed"], false);
}

#[actix_web::test]
async fn concurrent_placements_cannot_oversell(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;
    let first = app.create_logged_in_user(0).await;
    let second = app.create_logged_in_user(0).await;
    let item_id = app.add_item(&vendor, "Hyderabadi biryani", 3, 250).await;

    let lines = serde_json::json!([{"item_id": item_id, "quantity": 3}]);
    let first_order = app.create_cart_id(&first, lines.clone()).await;
    let second_order = app.create_cart_id(&second, lines).await;

    let (first_response, second_response) = tokio::join!(
        app.place_order(&first, first_order),
        app.place_order(&second, second_order)
    );

    let mut statuses = vec![
        first_response.status().as_u16(),
        second_response.status().as_u16()
    ];
    statuses.sort();
    assert_eq!(statuses, vec![200, 409]);

    assert_eq!(stock_of(&app, &first, item_id).await, 0);
}
