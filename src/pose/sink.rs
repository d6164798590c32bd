use super::{FrameSource, PoseFrame};
use crate::error::SinkError;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

// Both must stay below the publish cadence.
const CONNECT_TIMEOUT: Duration = Duration::from_millis(50);
const WRITE_TIMEOUT: Duration = Duration::from_millis(50);

/// Wherever rendered poses end up (display process, servo driver, simulation).
///
/// Two tasks write concurrently; the last frame written wins. Implementations
/// over a non-shareable transport serialize writes themselves.
#[async_trait]
pub trait PoseSink: Send + Sync {
    async fn emit(&self, frame: &PoseFrame) -> Result<(), SinkError>;
}

/// Writes every frame to the log at trace level.
#[derive(Debug, Default)]
pub struct LogPoseSink;

#[async_trait]
impl PoseSink for LogPoseSink {
    async fn emit(&self, frame: &PoseFrame) -> Result<(), SinkError> {
        log::trace!(
            "📡 {:?} pose (jaw {:+.3}): {:?}",
            frame.source,
            frame.position.jaw(),
            frame.position.positions()
        );
        Ok(())
    }
}

/// Streams frames as newline-delimited JSON joint-state messages over TCP.
///
/// Connects lazily and reconnects on the next frame after a write failure, so
/// a renderer that starts late or restarts picks the stream back up.
pub struct TcpPoseSink {
    address: String,
    connection: tokio::sync::Mutex<Option<TcpStream>>,
}

impl TcpPoseSink {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            connection: tokio::sync::Mutex::new(None),
        }
    }
}

#[async_trait]
impl PoseSink for TcpPoseSink {
    async fn emit(&self, frame: &PoseFrame) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(frame)?;
        line.push(b'\n');

        let mut connection = self.connection.lock().await;
        if connection.is_none() {
            let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(&self.address))
                .await
                .map_err(|_| std::io::Error::from(std::io::ErrorKind::TimedOut))??;
            stream.set_nodelay(true)?;
            log::info!("📡 Connected to pose renderer at {}", self.address);
            *connection = Some(stream);
        }

        if let Some(stream) = connection.as_mut() {
            // Bounded: a stalled renderer must not hold the lock.
            let written = tokio::time::timeout(WRITE_TIMEOUT, stream.write_all(&line))
                .await
                .unwrap_or_else(|_| Err(std::io::Error::from(std::io::ErrorKind::TimedOut)));
            if let Err(e) = written {
                log::warn!("📡 Lost pose renderer at {}: {}", self.address, e);
                *connection = None;
                return Err(e.into());
            }
        }
        Ok(())
    }
}

/// Keeps every frame in memory, for simulation and inspection.
#[derive(Debug, Default)]
pub struct MemoryPoseSink {
    frames: Mutex<Vec<PoseFrame>>,
}

impl MemoryPoseSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<PoseFrame> {
        self.lock().clone()
    }

    pub fn frames_from(&self, source: FrameSource) -> Vec<PoseFrame> {
        self.lock()
            .iter()
            .filter(|frame| frame.source == source)
            .cloned()
            .collect()
    }

    pub fn last(&self) -> Option<PoseFrame> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PoseFrame>> {
        // A panicking writer cannot leave a half-pushed frame behind.
        self.frames.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PoseSink for MemoryPoseSink {
    async fn emit(&self, frame: &PoseFrame) -> Result<(), SinkError> {
        self.lock().push(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{PoseVector, POSE_LEN};
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    fn frame(jaw: f64, source: FrameSource) -> PoseFrame {
        PoseFrame::new(PoseVector::new([0.0; POSE_LEN]).with_jaw(jaw), source)
    }

    #[tokio::test]
    async fn test_memory_sink_filters_by_source() {
        let sink = MemoryPoseSink::new();
        sink.emit(&frame(0.0, FrameSource::Resting)).await.unwrap();
        sink.emit(&frame(0.1, FrameSource::Animation)).await.unwrap();
        sink.emit(&frame(0.2, FrameSource::Animation)).await.unwrap();

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.frames_from(FrameSource::Animation).len(), 2);
        assert_eq!(sink.last().unwrap().position.jaw(), 0.2);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_tcp_sink_writes_json_lines() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let reader = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut lines = BufReader::new(socket).lines();
            let mut received = Vec::new();
            while received.len() < 2 {
                match lines.next_line().await.unwrap() {
                    Some(line) => received.push(line),
                    None => break,
                }
            }
            received
        });

        let sink = TcpPoseSink::new(address);
        sink.emit(&frame(0.1, FrameSource::Animation)).await.unwrap();
        sink.emit(&frame(0.0, FrameSource::Resting)).await.unwrap();

        let received = reader.await.unwrap();
        assert_eq!(received.len(), 2);
        let first: serde_json::Value = serde_json::from_str(&received[0]).unwrap();
        assert_eq!(first["position"][2], 0.1);
        assert_eq!(first["source"], "animation");
        assert_eq!(first["name"][0], "neck_yaw");
    }

    #[tokio::test]
    async fn test_tcp_sink_reports_unreachable_renderer() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let sink = TcpPoseSink::new(address);
        let result = sink.emit(&frame(0.0, FrameSource::Resting)).await;
        assert!(matches!(result, Err(SinkError::Io(_))));
    }

    #[tokio::test]
    async fn test_tcp_sink_gives_up_on_a_renderer_that_stops_reading() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let (hold_tx, hold_rx) = tokio::sync::oneshot::channel::<()>();
        let acceptor = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            // Keep the socket open without ever reading from it.
            let _ = hold_rx.await;
            drop(socket);
        });

        let sink = TcpPoseSink::new(address);
        let outcome = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                if let Err(e) = sink.emit(&frame(0.1, FrameSource::Animation)).await {
                    return e;
                }
            }
        })
        .await
        .expect("emit blocked on a full socket");

        match outcome {
            SinkError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::TimedOut),
            other => panic!("expected a timed-out write, got {:?}", other),
        }
        assert!(sink.connection.lock().await.is_none());

        let _ = hold_tx.send(());
        acceptor.await.unwrap();
    }
}
