//! WebSocket front end: accepts editor connections and runs one
//! [`run_connection`] loop per client.

use std::sync::Arc;

use futures::{SinkExt, StreamExt, future};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::ServerConfig;
use crate::connection::run_connection;
use crate::error::ServerError;
use crate::protocol::{self, ClientMessage, ServerMessage};

/// Bind the configured address and serve until the listener fails.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(addr = %listener.local_addr()?, "SimuTwin engine listening");
    serve_listener(listener, Arc::new(config)).await
}

/// Accept loop over an already-bound listener.
pub async fn serve_listener(
    listener: TcpListener,
    config: Arc<ServerConfig>,
) -> Result<(), ServerError> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "accept failed");
                continue;
            }
        };
        let config = Arc::clone(&config);
        tokio::spawn(
            async move {
                if let Err(e) = handle_socket(stream, &config).await {
                    warn!(error = %e, "connection ended with error");
                }
            }
            .instrument(info_span!("connection", %peer)),
        );
    }
}

async fn handle_socket(stream: TcpStream, config: &ServerConfig) -> Result<(), ServerError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    info!("client connected");

    let (mut sink, source) = ws.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();

    let writer = tokio::spawn(
        async move {
            while let Some(message) = out_rx.recv().await {
                let text = protocol::encode(&message)?;
                sink.send(Message::Text(text)).await?;
            }
            // The peer may already be gone.
            let _ = sink.close().await;
            Ok::<(), ServerError>(())
        }
        .in_current_span(),
    );

    let inbound = source
        .take_while(|frame| {
            future::ready(match frame {
                Ok(Message::Close(_)) => false,
                Ok(_) => true,
                Err(e) => {
                    debug!(error = %e, "read failed");
                    false
                }
            })
        })
        .filter_map(|frame| future::ready(frame.ok().and_then(decode_frame)));
    let inbound = std::pin::pin!(inbound);

    run_connection(inbound, out_tx, config).await;
    info!("client disconnected");

    match writer.await {
        Ok(result) => result,
        Err(e) => Err(ServerError::Protocol {
            detail: format!("writer task failed: {e}"),
        }),
    }
}

/// Text frames carry client events; anything else is ignored.
fn decode_frame(frame: Message) -> Option<ClientMessage> {
    match frame {
        Message::Text(text) => match protocol::decode(&text) {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(error = %e, "ignoring malformed message");
                None
            }
        },
        _ => None,
    }
}

