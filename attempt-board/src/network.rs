use board_common::presenter::BoardEvent;
use crossbeam_channel::Sender;
use log::*;
use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use thiserror::Error;
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    net::{TcpListener, TcpStream},
    task,
};

/// What the networking thread hands to the render loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkMessage {
    Event(BoardEvent),
    /// The last competition engine connection closed
    ConnectionLost,
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("The render loop closed the channel")]
    ChannelClosed,
    #[error(transparent)]
    IoError(#[from] io::Error),
}

#[tokio::main]
pub async fn networking_thread(
    tx: Sender<NetworkMessage>,
    listen_port: u16,
) -> Result<(), NetworkError> {
    info!("Starting listener on port {listen_port}");

    // Some OSs also accept IPv4 connections on an IPv6 socket, the others
    // need a separate IPv4 listener
    let listener = match TcpListener::bind(("::", listen_port)).await {
        Ok(listener) => listener,
        Err(e) => {
            warn!("Failed to bind IPv6 port {listen_port}, falling back to IPv4: {e:?}");
            TcpListener::bind(("0.0.0.0", listen_port)).await?
        }
    };

    info!("Listener started");
    serve(listener, tx).await;
    Ok(())
}

/// Accepts competition engine connections forever, forwarding their events
pub async fn serve(listener: TcpListener, tx: Sender<NetworkMessage>) {
    let active = Arc::new(AtomicUsize::new(0));

    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("New connection failed: {e:?}");
                continue;
            }
        };
        info!("New connection from {addr:?}");
        active.fetch_add(1, Ordering::SeqCst);

        let tx = tx.clone();
        let active = active.clone();
        task::spawn(async move {
            match connection_worker(stream, addr, &tx).await {
                Ok(()) => info!("Connection from {addr:?} closed"),
                Err(e) => error!("Connection from {addr:?} failed: {e}"),
            }
            if active.fetch_sub(1, Ordering::SeqCst) == 1 {
                warn!("No competition engine connected");
                if tx.send(NetworkMessage::ConnectionLost).is_err() {
                    error!("Render loop could not receive connection loss");
                }
            }
        });
    }
}

async fn connection_worker(
    stream: TcpStream,
    addr: SocketAddr,
    tx: &Sender<NetworkMessage>,
) -> Result<(), NetworkError> {
    let mut lines = BufReader::new(stream).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<BoardEvent>(line) {
            Ok(event) => {
                debug!("Event from {addr:?}: {event:?}");
                tx.send(NetworkMessage::Event(event))
                    .map_err(|_| NetworkError::ChannelClosed)?;
            }
            Err(e) => warn!("Corrupted event from {addr:?} discarded: {e}"),
        }
    }

    Ok(())
}
