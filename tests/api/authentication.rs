use crate::helpers::{api_client, MessageBody, TestApp};

#[actix_web::test]
async fn signup_returns_200_and_user_id(){
    let app = TestApp::spawn_app().await;
    let client = api_client();

    let response = app.signup(&client, "ana_cooks", "a-long-password", 0).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User successfully registered");
    assert!(body["user_id"].is_string());
}

#[actix_web::test]
async fn signup_with_taken_username_returns_409(){
    let app = TestApp::spawn_app().await;
    let client = api_client();

    let response = app.signup(&client, "ana_cooks", "a-long-password", 0).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.signup(&client, "ana_cooks", "another-password", 1).await;
    assert_eq!(response.status().as_u16(), 409);
}

#[actix_web::test]
async fn signup_with_invalid_fields_returns_400(){
    let app = TestApp::spawn_app().await;
    let client = api_client();

    let test_cases = vec![
        (serde_json::json!({"name": "Ana", "username": "ana", "password": "short", "level": "0"}), "short password"),
        (serde_json::json!({"name": "", "username": "ana", "password": "a-long-password", "level": "0"}), "empty name"),
        (serde_json::json!({"name": "   ", "username": "ana", "password": "a-long-password", "level": "0"}), "whitespace-only name"),
        (serde_json::json!({"name": "Ana", "username": "a b", "password": "a-long-password", "level": "0"}), "bad username"),
        (serde_json::json!({"name": "Ana", "username": "ana", "password": "a-long-password", "level": "7"}), "unknown level"),
        (serde_json::json!({"name": "Ana", "password": "a-long-password"}), "missing username"),
    ];

    for (body, description) in test_cases {
        let response = app.post_json(&client, "/signup", &body).await;

        assert_eq!(
            response.status().as_u16(),
            400,
            "The API did not fail with 400 Bad Request when the payload had {}",
            description
        );

        let body: MessageBody = response.json().await.unwrap();
        assert!(!body.message.is_empty());
    }
}

#[actix_web::test]
async fn login_with_correct_credentials_returns_200(){
    let app = TestApp::spawn_app().await;
    let client = api_client();

    app.signup(&client, "ana_cooks", "a-long-password", 0).await;
    let response = app.login(&client, "ana_cooks", "a-long-password").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: MessageBody = response.json().await.unwrap();
    assert_eq!(body.message, "User successfully logged in");
}

#[actix_web::test]
async fn login_with_wrong_credentials_returns_401(){
    let app = TestApp::spawn_app().await;
    let client = api_client();

    app.signup(&client, "ana_cooks", "a-long-password", 0).await;

    let response = app.login(&client, "ana_cooks", "the-wrong-password").await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.login(&client, "nobody_here", "a-long-password").await;
    assert_eq!(response.status().as_u16(), 401);

    let wrong_password: MessageBody = app.login(&client, "ana_cooks", "the-wrong-password").await.json().await.unwrap();
    let unknown_user: MessageBody = app.login(&client, "nobody_here", "a-long-password").await.json().await.unwrap();
    assert_eq!(wrong_password.message, unknown_user.message);
}

#[actix_web::test]
async fn protected_routes_without_session_return_401(){
    let app = TestApp::spawn_app().await;
    let client = api_client();

    for path in ["/list_vendors", "/list_items", "/list_all_orders"] {
        let response = app.get(&client, path).await;
        assert_eq!(response.status().as_u16(), 401, "GET {} without a session", path);
    }

    for path in ["/logout", "/add_vendor", "/add_item", "/create_items_order", "/place_order", "/list_orders"] {
        let response = app.post_json(&client, path, &serde_json::json!({})).await;
        assert_eq!(response.status().as_u16(), 401, "POST {} without a session", path);
    }
}

#[actix_web::test]
async fn logout_ends_the_session(){
    let app = TestApp::spawn_app().await;
    let user = app.create_logged_in_user(0).await;

    let response = app.get(&user.client, "/list_items").await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.post_empty(&user.client, "/logout").await;
    assert_eq!(response.status().as_u16(), 200);
    let body: MessageBody = response.json().await.unwrap();
    assert_eq!(body.message, "User is successfully logged out");

    let response = app.get(&user.client, "/list_items").await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.login(&user.client, &user.username, &user.password).await;
    assert_eq!(response.status().as_u16(), 200);
}
