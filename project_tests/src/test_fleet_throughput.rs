//! Measures the throughput of the taxi and client WebSocket streams. It
//! simply records how many messages each stream receives per (at least)
//! one-second window and reports the number to the console. No magic.

use clap::Parser;
use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use fleetview::monitor::{Channel, ThroughputMonitor};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Taxi stream URL
    #[clap(long, default_value = "ws://127.0.0.1:8080/ws")]
    taxi_url: String,

    /// Client request stream URL
    #[clap(long, default_value = "ws://127.0.0.1:8080/ws-clients")]
    client_url: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let taxis = tokio::spawn(watch_stream(args.taxi_url, Channel::Taxis));
    let clients = tokio::spawn(watch_stream(args.client_url, Channel::Clients));
    let _ = tokio::join!(taxis, clients);
}

async fn watch_stream(url: String, channel: Channel) {
    println!("Connecting to {} stream at {}...", channel, url);
    let ws_stream = match connect_async(&url).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            eprintln!("Failed to connect to {} stream: {}", channel, e);
            return;
        }
    };
    println!("Connected to {} stream. Press Ctrl+C to stop.", channel);

    let (_write, mut read) = ws_stream.split();
    let mut monitor = ThroughputMonitor::new(channel);

    while let Some(Ok(msg)) = read.next().await {
        if let Message::Text(_) = msg {
            if let Some(sample) = monitor.record() {
                println!(
                    "{}: {} msgs over {:.2}s",
                    sample.channel,
                    sample.count,
                    sample.window.as_secs_f64()
                );
            }
        }
    }
    println!("{} stream closed.", channel);
}
