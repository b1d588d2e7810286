//! WebSocket channel task. One instance of [`run`] owns one inbound
//! stream for its whole life: connect, pump frames into the ingestor and
//! throughput monitor, and report when the peer goes away. Reconnection
//! policy is deliberately left to whoever embeds the core.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as WsMessage};

use crate::ingest::StreamIngestor;
use crate::model::RateRequest;
use crate::monitor::{Channel, ThroughputMonitor};

/// Commands the viewer can push out on an open channel.
#[derive(Debug)]
pub enum UpstreamCommand {
    /// Asks the streamer for a different target message rate; goes out
    /// as a bare `{"Num": n}` frame on the taxi channel.
    SetRate(i64),
}

/// Connection status surfaced to the embedding UI's status display.
/// A closed channel is reported, not retried, and never terminates the
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Connecting,
    Open,
    Closed,
}

pub async fn run(
    url: String,
    channel: Channel,
    ingestor: Arc<StreamIngestor>,
    mut monitor: ThroughputMonitor,
    mut cmd_rx: mpsc::UnboundedReceiver<UpstreamCommand>,
    status_tx: watch::Sender<ChannelStatus>,
    mut shutdown: broadcast::Receiver<()>,
) {
    log::info!("Connecting to {} stream: {}", channel, url);
    let _ = status_tx.send(ChannelStatus::Connecting);

    let ws_stream = match connect_async(&url).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            log::error!("Failed to connect to {} stream: {}", channel, e);
            let _ = status_tx.send(ChannelStatus::Closed);
            return;
        }
    };

    log::info!("Connected to {} stream", channel);
    let _ = status_tx.send(ChannelStatus::Open);
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                log::info!("{} stream shutting down...", channel);
                let _ = write.close().await;
                break;
            }
            Some(cmd) = cmd_rx.recv() => {
                match cmd {
                    UpstreamCommand::SetRate(num) => {
                        let frame = match serde_json::to_string(&RateRequest { num }) {
                            Ok(frame) => frame,
                            Err(e) => {
                                log::error!("Failed to encode rate request: {}", e);
                                continue;
                            }
                        };
                        log::debug!("Sending on {} stream: {}", channel, frame);
                        // Fire-and-forget: a failed send is logged, nothing more.
                        if let Err(e) = write.send(WsMessage::Text(frame.into())).await {
                            log::error!("Failed to send rate request on {} stream: {}", channel, e);
                        }
                    }
                }
            }
            msg = read.next() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        // Every raw arrival counts, parseable or not.
                        if let Some(sample) = monitor.record() {
                            log::info!(
                                "{} stream rate: {} msgs over {:.2}s",
                                sample.channel,
                                sample.count,
                                sample.window.as_secs_f64()
                            );
                        }
                        match channel {
                            Channel::Taxis => ingestor.on_taxi_message(text.as_str()).await,
                            Channel::Clients => ingestor.on_request_message(text.as_str()).await,
                        }
                    }
                    Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                    Some(Ok(WsMessage::Close(_))) | None => {
                        log::warn!("{} stream closed by peer", channel);
                        break;
                    }
                    Some(Err(e)) => {
                        log::error!("{} stream error: {}", channel, e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    let _ = status_tx.send(ChannelStatus::Closed);
}
