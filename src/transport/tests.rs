use super::{
    AckMode, ClientFrame, ConnectionFactory, Destination, FaultListener, OutboundMessage,
    WsConnectionFactory,
};
use crate::utils::error::TransportError;

use futures_util::StreamExt;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::accept_async;

/// A stand-in broker: accepts one WebSocket client, forwards every text
/// frame it receives, and drops the socket when `kill` fires.
async fn spawn_broker() -> (String, mpsc::UnboundedReceiver<String>, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (frames_tx, frames_rx) = mpsc::unbounded_channel();
    let (kill_tx, mut kill_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        loop {
            tokio::select! {
                frame = ws.next() => match frame {
                    Some(Ok(msg)) if msg.is_text() => {
                        let _ = frames_tx.send(msg.to_text().unwrap().to_string());
                    }
                    Some(Ok(_)) => {}
                    _ => break,
                },
                _ = &mut kill_rx => break,
            }
        }
    });

    (format!("ws://{addr}"), frames_rx, kill_tx)
}

fn outbound(body: &str) -> OutboundMessage {
    OutboundMessage {
        message_id: "ID:7".to_string(),
        destination: "orders".to_string(),
        body: body.to_string(),
        timestamp: 1_725_000_000_000,
    }
}

#[test]
fn publish_frame_uses_broker_envelope() {
    let frame = ClientFrame::publish("orders", &outbound("hello"));
    let json: serde_json::Value = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["type"], "publish");
    assert_eq!(json["topic"], "orders");
    assert_eq!(json["payload"], "hello");
    assert_eq!(json["message_id"], "ID:7");
    assert_eq!(json["qos"], 0);
}

#[tokio::test]
async fn producer_publishes_to_its_destination() {
    let (url, mut frames, _kill) = spawn_broker().await;
    let factory = WsConnectionFactory::new(url);

    let mut connection = factory.create_connection().await.unwrap();
    let mut session = connection
        .create_session(false, AckMode::Auto)
        .await
        .unwrap();
    let mut producer = session
        .create_producer(&Destination::new("orders"))
        .await
        .unwrap();

    let delivery = producer.send(&outbound("hello")).await.unwrap();
    assert_eq!(delivery.broker_message_id, None);

    let raw = tokio::time::timeout(Duration::from_secs(2), frames.recv())
        .await
        .unwrap()
        .unwrap();
    let frame: ClientFrame = serde_json::from_str(&raw).unwrap();
    let ClientFrame::Publish { topic, payload, .. } = frame;
    assert_eq!(topic, "orders");
    assert_eq!(payload, "hello");

    connection.close().await.unwrap();
}

#[tokio::test]
async fn transacted_sessions_are_rejected() {
    let (url, _frames, _kill) = spawn_broker().await;
    let mut connection = WsConnectionFactory::new(url)
        .create_connection()
        .await
        .unwrap();

    let err = connection
        .create_session(true, AckMode::Auto)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, TransportError::Unsupported(_)));
}

#[tokio::test]
async fn lost_link_fires_fault_listener() {
    let (url, _frames, kill) = spawn_broker().await;
    let mut connection = WsConnectionFactory::new(url)
        .create_connection()
        .await
        .unwrap();
    let (listener, mut faults) = FaultListener::channel();
    connection.set_fault_listener(listener.with_generation(3));

    kill.send(()).unwrap();

    let fault = tokio::time::timeout(Duration::from_secs(2), faults.recv())
        .await
        .expect("fault listener was not notified")
        .unwrap();
    assert_eq!(fault.generation, 3);
}

#[tokio::test]
async fn local_close_is_idempotent_and_silent() {
    let (url, _frames, _kill) = spawn_broker().await;
    let mut connection = WsConnectionFactory::new(url)
        .create_connection()
        .await
        .unwrap();
    let (listener, mut faults) = FaultListener::channel();
    connection.set_fault_listener(listener);
    let mut session = connection
        .create_session(false, AckMode::Auto)
        .await
        .unwrap();
    let mut producer = session
        .create_producer(&Destination::new("orders"))
        .await
        .unwrap();

    connection.close().await.unwrap();
    connection.close().await.unwrap();

    let err = producer.send(&outbound("late")).await.unwrap_err();
    assert_eq!(err, TransportError::Closed);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(faults.try_recv().is_err());
}

#[tokio::test]
async fn unreachable_broker_is_a_connect_error() {
    // Grab a free port and release it so nothing is listening there.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = WsConnectionFactory::new(format!("ws://{addr}"))
        .create_connection()
        .await
        .err()
        .unwrap();
    assert!(matches!(err, TransportError::Connect { .. }));
}
