//! API integration tests
//!
//! These run against a live server with a fresh database.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Register a throwaway account and return its bearer token and user id
async fn register_and_login(client: &Client, username: &str) -> (String, i64) {
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "testpass123",
            "email": format!("{}@example.com", username)
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse register response");
    let user_id = body["id"].as_i64().expect("No user ID");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "testpass123"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("No token in response").to_string();
    (token, user_id)
}

/// Create an author, a genre and a book; returns the book id
async fn create_book(client: &Client, token: &str, title: &str, isbn: &str) -> i64 {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "first_name": "Test",
            "last_name": format!("Author-{}", isbn)
        }))
        .send()
        .await
        .expect("Failed to create author");
    assert_eq!(response.status(), 201);
    let author: Value = response.json().await.expect("Failed to parse author");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": title,
            "author_ids": [author["id"]],
            "genre_ids": [],
            "isbn": isbn,
            "edition_type": "paperback"
        }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.expect("Failed to parse book");
    book["id"].as_i64().expect("No book ID")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "nobody",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_register_and_get_current_user() {
    let client = Client::new();
    let (token, _) = register_and_login(&client, "it_current_user").await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "it_current_user");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_username_rejected() {
    let client = Client::new();
    let _ = register_and_login(&client, "it_dup_user").await;

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": "it_dup_user",
            "password": "testpass123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_create_book_invalid_isbn() {
    let client = Client::new();
    let (token, _) = register_and_login(&client, "it_bad_isbn").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Bad ISBN",
            "author_ids": [1],
            "genre_ids": [],
            "isbn": "not-an-isbn",
            "edition_type": "paperback"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_review_updates_average_rating() {
    let client = Client::new();
    let (token, _) = register_and_login(&client, "it_reviewer").await;
    let book_id = create_book(&client, &token, "Rated Book", "9780000000101").await;

    let response = client
        .post(format!("{}/reviews", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "book_id": book_id,
            "rating": 4,
            "content": "Solid read"
        }))
        .send()
        .await
        .expect("Failed to create review");
    assert_eq!(response.status(), 201);
    let review: Value = response.json().await.expect("Failed to parse review");

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to get book");
    let book: Value = response.json().await.expect("Failed to parse book");
    assert_eq!(book["average_rating"].as_f64(), Some(4.0));

    // A second review from the same user is rejected
    let response = client
        .post(format!("{}/reviews", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "book_id": book_id,
            "rating": 2
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Deleting the review resets the average
    let response = client
        .delete(format!("{}/reviews/{}", BASE_URL, review["id"]))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to delete review");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to get book");
    let book: Value = response.json().await.expect("Failed to parse book");
    assert_eq!(book["average_rating"].as_f64(), Some(0.0));
}

#[tokio::test]
#[ignore]
async fn test_exchange_offer_negotiation() {
    let client = Client::new();
    let (token_a, user_a) = register_and_login(&client, "it_exch_owner").await;
    let (token_b, _) = register_and_login(&client, "it_exch_initiator").await;

    // The target owns the wanted book; the initiator offers two candidates
    let book_a = create_book(&client, &token_a, "Wanted Book", "9780000000201").await;
    let cand_1 = create_book(&client, &token_b, "Candidate One", "9780000000202").await;
    let cand_2 = create_book(&client, &token_b, "Candidate Two", "9780000000203").await;

    let response = client
        .post(format!("{}/library", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&json!({ "book_id": book_a }))
        .send()
        .await
        .expect("Failed to add to library");
    assert_eq!(response.status(), 201);

    // Propose
    let response = client
        .post(format!("{}/exchange-offers", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_b))
        .json(&json!({
            "user_a_id": user_a,
            "book_a_id": book_a,
            "books_b_ids": [cand_1, cand_2]
        }))
        .send()
        .await
        .expect("Failed to create offer");
    assert_eq!(response.status(), 201);
    let offer: Value = response.json().await.expect("Failed to parse offer");
    assert_eq!(offer["state"], "proposed");
    let offer_id = offer["id"].as_i64().expect("No offer ID");

    // The offer announcement lands in the parties' conversation
    let response = client
        .get(format!("{}/conversations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .expect("Failed to list conversations");
    let conversations: Value = response.json().await.expect("Failed to parse conversations");
    let conversations = conversations.as_array().expect("Not an array");
    assert_eq!(conversations.len(), 1);
    let last = &conversations[0]["last_message"];
    assert_eq!(last["attachment"]["kind"], "exchange_offer");
    assert_eq!(last["attachment"]["id"].as_i64(), Some(offer_id));

    // The initiator cannot choose
    let response = client
        .post(format!("{}/exchange-offers/{}/choose", BASE_URL, offer_id))
        .header("Authorization", format!("Bearer {}", token_b))
        .json(&json!({ "book_id": cand_1 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Confirming before a choice is invalid
    let response = client
        .post(format!("{}/exchange-offers/{}/confirm", BASE_URL, offer_id))
        .header("Authorization", format!("Bearer {}", token_b))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // The target chooses a candidate
    let response = client
        .post(format!("{}/exchange-offers/{}/choose", BASE_URL, offer_id))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&json!({ "book_id": cand_2 }))
        .send()
        .await
        .expect("Failed to choose");
    assert!(response.status().is_success());
    let offer: Value = response.json().await.expect("Failed to parse offer");
    assert_eq!(offer["state"], "chosen");
    assert_eq!(offer["chosen_book_b"]["id"].as_i64(), Some(cand_2));

    // The initiator confirms
    let response = client
        .post(format!("{}/exchange-offers/{}/confirm", BASE_URL, offer_id))
        .header("Authorization", format!("Bearer {}", token_b))
        .send()
        .await
        .expect("Failed to confirm");
    assert!(response.status().is_success());
    let offer: Value = response.json().await.expect("Failed to parse offer");
    assert_eq!(offer["state"], "confirmed");

    // Confirmed offers can no longer be rejected
    let response = client
        .post(format!("{}/exchange-offers/{}/reject", BASE_URL, offer_id))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_reject_is_idempotent() {
    let client = Client::new();
    let (token_a, user_a) = register_and_login(&client, "it_rej_owner").await;
    let (token_b, _) = register_and_login(&client, "it_rej_initiator").await;

    let book_a = create_book(&client, &token_a, "Rejected Book", "9780000000301").await;
    let cand = create_book(&client, &token_b, "Rejected Candidate", "9780000000302").await;

    let response = client
        .post(format!("{}/library", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&json!({ "book_id": book_a }))
        .send()
        .await
        .expect("Failed to add to library");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/exchange-offers", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_b))
        .json(&json!({
            "user_a_id": user_a,
            "book_a_id": book_a,
            "books_b_ids": [cand]
        }))
        .send()
        .await
        .expect("Failed to create offer");
    assert_eq!(response.status(), 201);
    let offer: Value = response.json().await.expect("Failed to parse offer");
    let offer_id = offer["id"].as_i64().expect("No offer ID");

    for _ in 0..2 {
        let response = client
            .post(format!("{}/exchange-offers/{}/reject", BASE_URL, offer_id))
            .header("Authorization", format!("Bearer {}", token_b))
            .send()
            .await
            .expect("Failed to reject");
        assert!(response.status().is_success());
        let offer: Value = response.json().await.expect("Failed to parse offer");
        assert_eq!(offer["state"], "rejected");
    }

    // Choosing after rejection is invalid
    let response = client
        .post(format!("{}/exchange-offers/{}/choose", BASE_URL, offer_id))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&json!({ "book_id": cand }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_messaging_read_receipts() {
    let client = Client::new();
    let (token_a, user_a) = register_and_login(&client, "it_msg_alice").await;
    let (token_b, user_b) = register_and_login(&client, "it_msg_bob").await;

    // First message creates the conversation
    let response = client
        .post(format!("{}/messages", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&json!({
            "recipient_id": user_b,
            "content": "Hello there"
        }))
        .send()
        .await
        .expect("Failed to send message");
    assert_eq!(response.status(), 201);
    let message: Value = response.json().await.expect("Failed to parse message");
    assert_eq!(message["is_read"], false);
    let message_id = message["id"].as_i64().expect("No message ID");
    let conversation_id = message["conversation_id"].as_i64().expect("No conversation ID");

    // A second message to the same recipient reuses the conversation
    let response = client
        .post(format!("{}/messages", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_b))
        .json(&json!({
            "recipient_id": user_a,
            "content": "Hi back"
        }))
        .send()
        .await
        .expect("Failed to send message");
    let reply: Value = response.json().await.expect("Failed to parse message");
    assert_eq!(reply["conversation_id"].as_i64(), Some(conversation_id));

    // The sender cannot mark their own message as read
    let response = client
        .post(format!("{}/messages/{}/read", BASE_URL, message_id))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // The recipient can, and doing it twice stays read
    for _ in 0..2 {
        let response = client
            .post(format!("{}/messages/{}/read", BASE_URL, message_id))
            .header("Authorization", format!("Bearer {}", token_b))
            .send()
            .await
            .expect("Failed to mark read");
        assert!(response.status().is_success());
        let message: Value = response.json().await.expect("Failed to parse message");
        assert_eq!(message["is_read"], true);
    }

    // An outsider cannot read the conversation
    let (token_c, _) = register_and_login(&client, "it_msg_carol").await;
    let response = client
        .get(format!("{}/conversations/{}/messages", BASE_URL, conversation_id))
        .header("Authorization", format!("Bearer {}", token_c))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_first_messages_share_one_conversation() {
    let client = Client::new();
    let (token_a, user_a) = register_and_login(&client, "it_conc_alice").await;
    let (token_b, user_b) = register_and_login(&client, "it_conc_bob").await;

    // Both users open the thread at the same time; the pair upsert must
    // converge on a single conversation
    let send_a = client
        .post(format!("{}/messages", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&json!({ "recipient_id": user_b, "content": "ping" }))
        .send();
    let send_b = client
        .post(format!("{}/messages", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_b))
        .json(&json!({ "recipient_id": user_a, "content": "pong" }))
        .send();

    let (response_a, response_b) = tokio::join!(send_a, send_b);
    let response_a = response_a.expect("Failed to send message");
    let response_b = response_b.expect("Failed to send message");
    assert_eq!(response_a.status(), 201);
    assert_eq!(response_b.status(), 201);

    let message_a: Value = response_a.json().await.expect("Failed to parse message");
    let message_b: Value = response_b.json().await.expect("Failed to parse message");
    assert_eq!(
        message_a["conversation_id"].as_i64(),
        message_b["conversation_id"].as_i64()
    );

    let response = client
        .get(format!("{}/conversations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .expect("Failed to list conversations");
    let conversations: Value = response.json().await.expect("Failed to parse conversations");
    assert_eq!(conversations.as_array().expect("Not an array").len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_rankings_and_activity_feed() {
    let client = Client::new();
    let (token, user_id) = register_and_login(&client, "it_feed_user").await;
    let book_id = create_book(&client, &token, "Charting Book", "9780000000401").await;

    let response = client
        .post(format!("{}/reviews", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "book_id": book_id,
            "rating": 5,
            "content": "Top shelf"
        }))
        .send()
        .await
        .expect("Failed to create review");
    assert_eq!(response.status(), 201);

    // The review puts the book on the ranking chart with score = rating sum
    let response = client
        .get(format!("{}/rankings", BASE_URL))
        .send()
        .await
        .expect("Failed to list rankings");
    assert!(response.status().is_success());
    let rankings: Value = response.json().await.expect("Failed to parse rankings");
    let entry = rankings
        .as_array()
        .expect("Not an array")
        .iter()
        .find(|r| r["book"]["id"].as_i64() == Some(book_id))
        .expect("Book missing from rankings");
    assert_eq!(entry["score"].as_f64(), Some(5.0));

    // And the action shows up in the activity feed
    let response = client
        .get(format!("{}/activities", BASE_URL))
        .send()
        .await
        .expect("Failed to list activities");
    assert!(response.status().is_success());
    let activities: Value = response.json().await.expect("Failed to parse activities");
    let entry = activities
        .as_array()
        .expect("Not an array")
        .iter()
        .find(|a| a["user"]["id"].as_i64() == Some(user_id))
        .expect("User missing from activity feed");
    assert!(entry["action"]
        .as_str()
        .expect("No action")
        .contains("Charting Book"));
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/library", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
