//! Minimal editor stand-in: connects to a running server, starts a
//! three-machine line, prints a few updates and resets.
//!
//! Run the server first, then:
//! `cargo run --package simutwin-server --example editor_client [ws://127.0.0.1:4000]`

use futures::{SinkExt, StreamExt};
use serde_json::json;
use simutwin_server::{ClientMessage, ServerMessage};
use tokio_tungstenite::tungstenite::Message;

const UPDATES: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ws://127.0.0.1:4000".to_string());
    let (mut ws, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
    println!("connected to {url}");

    let layout = json!([
        {"id": "M-1", "customType": "machine", "name": "Cutter", "left": 40,
         "top": 100, "width": 80, "height": 60, "processingTime": 2},
        {"id": "C-1", "customType": "conveyor", "left": 130, "top": 125,
         "width": 60, "height": 10},
        {"id": "M-2", "customType": "machine", "name": "Press", "left": 200,
         "top": 100, "width": 80, "height": 60, "processingTime": "4"},
        {"id": "M-3", "customType": "machine", "name": "Paint", "left": 360,
         "top": 100, "width": 80, "height": 60, "processingTime": 1.5},
    ]);
    send(&mut ws, &ClientMessage::StartSimulation(layout)).await?;

    let mut seen = 0;
    while let Some(frame) = ws.next().await {
        let Message::Text(text) = frame? else {
            continue;
        };
        match serde_json::from_str::<ServerMessage>(&text)? {
            ServerMessage::SimulationUpdate(snapshot) => {
                let products: Vec<_> = snapshot
                    .products
                    .iter()
                    .map(|p| format!("{}@({:.0},{:.0})", p.id, p.x, p.y))
                    .collect();
                let bottlenecks: Vec<_> = snapshot
                    .machines
                    .iter()
                    .filter(|m| m.is_bottleneck)
                    .map(|m| m.id.to_string())
                    .collect();
                println!(
                    "finished={:>3} bottleneck={:?} products=[{}]",
                    snapshot.total_products_finished,
                    bottlenecks,
                    products.join(", ")
                );
                seen += 1;
                if seen == UPDATES {
                    send(&mut ws, &ClientMessage::ResetSimulation).await?;
                }
            }
            ServerMessage::SimulationReset => {
                println!("reset acknowledged");
                break;
            }
        }
    }

    ws.close(None).await?;
    Ok(())
}

async fn send<S>(ws: &mut S, message: &ClientMessage) -> anyhow::Result<()>
where
    S: futures::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    ws.send(Message::Text(serde_json::to_string(message)?)).await?;
    Ok(())
}
