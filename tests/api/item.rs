use crate::helpers::TestApp;

fn item_body(available_quantity: i32, unit_price: i32) -> serde_json::Value {
    serde_json::json!({
        "item_name": "Veg biryani",
        "calories_per_gm": 2,
        "available_quantity": available_quantity,
        "restaurant_name": "Paradise",
        "unit_price": unit_price
    })
}

#[actix_web::test]
async fn only_vendors_can_add_items(){
    let app = TestApp::spawn_app().await;

    let test_cases = vec![
        (0, 403, "customer"),
        (1, 200, "vendor"),
        (2, 403, "admin"),
    ];

    for (level, expected, description) in test_cases {
        let user = app.create_logged_in_user(level).await;
        let response = app.post_json(&user.client, "/add_item", &item_body(5, 120)).await;

        assert_eq!(
            response.status().as_u16(),
            expected,
            "Unexpected status when a {} added an item",
            description
        );
    }
}

#[actix_web::test]
async fn add_item_with_negative_numbers_returns_400(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;

    let response = app.post_json(&vendor.client, "/add_item", &item_body(-1, 120)).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.post_json(&vendor.client, "/add_item", &item_body(3, -5)).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn list_items_returns_every_item(){
    let app = TestApp::spawn_app().await;
    let vendor = app.create_logged_in_user(1).await;
    let customer = app.create_logged_in_user(0).await;

    let first = app.add_item(&vendor, "Idli", 20, 30).await;
    let second = app.add_item(&vendor, "Vada", 15, 25).await;

    let response = app.get(&customer.client, "/list_items").await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);

    let idli = items.iter()
        .find(|item| item["item_id"] == first.to_string())
        .unwrap();
    assert_eq!(idli["vendor_id"], vendor.user_id.to_string());
    assert_eq!(idli["available_quantity"], 20);
    assert_eq!(idli["unit_price"], 30);
    assert!(items.iter().any(|item| item["item_id"] == second.to_string()));
}
