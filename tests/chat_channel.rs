//! Realtime chat channel behavior against an in-process WebSocket server

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use findash::chat::{ChatRole, ChatSession};
use findash::ws::client::ChatConfig;

/// Bind a local WebSocket server that answers each inbound frame with
/// whatever `reply` computes from it (or stays silent on `None`)
async fn spawn_server(
    reply: fn(serde_json::Value) -> Option<serde_json::Value>,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut ws = accept_async(stream).await.unwrap();
                while let Some(Ok(msg)) = ws.next().await {
                    if let Message::Text(text) = msg {
                        let request: serde_json::Value = serde_json::from_str(&text).unwrap();
                        if let Some(response) = reply(request) {
                            let frame = Message::Text(response.to_string().into());
                            if ws.send(frame).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            });
        }
    });

    format!("ws://{}", addr)
}

#[tokio::test]
async fn test_question_and_answer_appends_two_messages() {
    let url = spawn_server(|request| {
        let question = request["message"].as_str().unwrap_or_default().to_string();
        Some(serde_json::json!({
            "response": format!("You asked: {}", question)
        }))
    })
    .await;

    let mut session = ChatSession::open(ChatConfig::new(url)).await.unwrap();
    assert!(session.messages().is_empty());

    session.ask("How is my portfolio?", None).await;

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, ChatRole::User);
    assert_eq!(messages[0].content, "How is my portfolio?");
    assert_eq!(messages[1].role, ChatRole::Assistant);
    assert_eq!(messages[1].content, "You asked: How is my portfolio?");
}

#[tokio::test]
async fn test_portfolio_context_reaches_the_server() {
    let url = spawn_server(|request| {
        let total = request["userPortfolio"]["total_value"].as_i64().unwrap_or(0);
        Some(serde_json::json!({
            "response": format!("Your portfolio is worth {}", total)
        }))
    })
    .await;

    let mut session = ChatSession::open(ChatConfig::new(url)).await.unwrap();
    let context = serde_json::json!({"total_value": 15000});
    let reply = session.ask("What am I worth?", Some(context)).await;

    assert_eq!(reply.content, "Your portfolio is worth 15000");
}

#[tokio::test]
async fn test_error_payload_rendered_as_assistant_message() {
    let url = spawn_server(|_request| {
        Some(serde_json::json!({"error": "model unavailable"}))
    })
    .await;

    let mut session = ChatSession::open(ChatConfig::new(url)).await.unwrap();
    session.ask("Anyone home?", None).await;

    // The failure stays conversational: still exactly one user entry plus
    // one assistant entry, in order
    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, ChatRole::Assistant);
    assert!(messages[1].content.contains("model unavailable"));
}

#[tokio::test]
async fn test_bounded_wait_when_server_stays_silent() {
    let url = spawn_server(|_request| None).await;

    let mut config = ChatConfig::new(url);
    config.response_timeout = Duration::from_millis(200);

    let mut session = ChatSession::open(config).await.unwrap();
    let started = std::time::Instant::now();
    session.ask("Hello?", None).await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_secs(5));

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, ChatRole::Assistant);
    assert!(messages[1].content.contains("did not respond"));
}

#[tokio::test]
async fn test_consecutive_questions_stay_ordered() {
    let url = spawn_server(|request| {
        let question = request["message"].as_str().unwrap_or_default().to_string();
        Some(serde_json::json!({"response": format!("re: {}", question)}))
    })
    .await;

    let mut session = ChatSession::open(ChatConfig::new(url)).await.unwrap();
    session.ask("first", None).await;
    session.ask("second", None).await;

    let messages = session.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].content, "first");
    assert_eq!(messages[1].content, "re: first");
    assert_eq!(messages[2].content, "second");
    assert_eq!(messages[3].content, "re: second");
}
