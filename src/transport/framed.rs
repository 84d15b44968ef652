//! Length-prefixed TCP transport.
//!
//! # Responsibilities
//! - Open a `TcpStream` per attempt within the send timeout
//! - Write frames within the send timeout, read them within the receive timeout
//! - Refuse frames larger than `MAX_FRAME_SIZE`
//! - Map I/O errors onto `Failure`

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{Failure, Phase, TransportFailure};
use crate::load_balancer::Endpoint;
use crate::resilience::timeouts::{with_timeout, Timeouts};
use crate::transport::connector::{Connection, Connector};
use crate::transport::protocol::{RequestFrame, ResponseFrame};

/// Largest frame accepted in either direction (16 MiB).
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Write one length-prefixed frame.
pub async fn write_frame<W>(writer: &mut W, data: &[u8]) -> Result<(), Failure>
where
    W: AsyncWrite + Unpin + Send,
{
    if data.len() > MAX_FRAME_SIZE {
        return Err(Failure::Protocol(format!(
            "Frame too large: {} bytes (max {})",
            data.len(),
            MAX_FRAME_SIZE
        )));
    }

    let len = data.len() as u32;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed frame.
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>, Failure>
where
    R: AsyncRead + Unpin + Send,
{
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes).await?;

    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(Failure::Protocol(format!(
            "Frame too large: {} bytes (max {})",
            len, MAX_FRAME_SIZE
        )));
    }

    let mut data = vec![0u8; len];
    reader.read_exact(&mut data).await?;
    Ok(data)
}

/// Connects over plain TCP.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, endpoint: &Endpoint, timeouts: Timeouts) -> Result<Box<dyn Connection>, Failure> {
        let stream = with_timeout(timeouts.for_phase(Phase::Connect), Phase::Connect, async {
            TcpStream::connect((endpoint.host(), endpoint.port()))
                .await
                .map_err(|e| Failure::Transport(TransportFailure::Connect(format!("{}: {}", endpoint, e))))
        })
        .await?;

        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(endpoint = %endpoint, error = %e, "Failed to set TCP_NODELAY");
        }

        Ok(Box::new(FramedConnection::new(stream, timeouts)))
    }
}

/// Frames requests and responses over any byte stream.
#[derive(Debug)]
pub struct FramedConnection<S = TcpStream> {
    stream: S,
    timeouts: Timeouts,
}

impl<S> FramedConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, timeouts: Timeouts) -> Self {
        Self { stream, timeouts }
    }

    async fn write_request(&mut self, frame: &RequestFrame) -> Result<(), Failure> {
        let data = frame.encode()?;
        let bound = self.timeouts.for_phase(Phase::Send);
        with_timeout(bound, Phase::Send, write_frame(&mut self.stream, &data)).await
    }
}

#[async_trait]
impl<S> Connection for FramedConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn call(&mut self, frame: &RequestFrame) -> Result<ResponseFrame, Failure> {
        self.write_request(frame).await?;

        let bound = self.timeouts.for_phase(Phase::Receive);
        let data = with_timeout(bound, Phase::Receive, read_frame(&mut self.stream)).await?;
        let response = ResponseFrame::decode(&data)?;

        if response.seq_id != frame.seq_id {
            return Err(Failure::Protocol(format!(
                "Out of sequence response: expected {}, got {}",
                frame.seq_id, response.seq_id
            )));
        }
        Ok(response)
    }

    async fn send_oneway(&mut self, frame: &RequestFrame) -> Result<(), Failure> {
        self.write_request(frame).await
    }

    async fn close(&mut self) -> Result<(), Failure> {
        self.stream.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::OperationContext;
    use serde_json::{json, Value};

    fn frame() -> RequestFrame {
        RequestFrame::new("ping", false, OperationContext::default(), Value::Null)
    }

    #[tokio::test]
    async fn test_call_over_duplex() {
        let (client, mut server) = tokio::io::duplex(1024);
        let mut conn = FramedConnection::new(client, Timeouts::default());

        let server_task = tokio::spawn(async move {
            let data = read_frame(&mut server).await.unwrap();
            let request = RequestFrame::decode(&data).unwrap();
            let response = ResponseFrame::reply(request.seq_id, json!("pong"));
            write_frame(&mut server, &response.encode().unwrap()).await.unwrap();
        });

        let response = conn.call(&frame()).await.unwrap();
        assert_eq!(response.into_value(), Ok(json!("pong")));
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_sequence_mismatch_is_protocol_failure() {
        let (client, mut server) = tokio::io::duplex(1024);
        let mut conn = FramedConnection::new(client, Timeouts::default());

        tokio::spawn(async move {
            let _ = read_frame(&mut server).await;
            let response = ResponseFrame::reply(0, Value::Null);
            let _ = write_frame(&mut server, &response.encode().unwrap()).await;
        });

        let err = conn.call(&frame()).await.unwrap_err();
        assert!(matches!(err, Failure::Protocol(msg) if msg.contains("Out of sequence")));
    }

    #[tokio::test]
    async fn test_peer_close_mid_frame() {
        let (client, mut server) = tokio::io::duplex(1024);
        let mut conn = FramedConnection::new(client, Timeouts::default());

        tokio::spawn(async move {
            let _ = read_frame(&mut server).await;
            let _ = server.write_all(&[0, 0, 0, 10, b'{']).await;
            drop(server);
        });

        let err = conn.call(&frame()).await.unwrap_err();
        assert_eq!(err, Failure::Transport(TransportFailure::Closed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_peer_times_out_on_receive() {
        let (client, _server) = tokio::io::duplex(1024);
        let mut conn = FramedConnection::new(client, Timeouts::from_millis(100, 300));

        let err = conn.call(&frame()).await.unwrap_err();
        assert_eq!(
            err,
            Failure::Transport(TransportFailure::Timeout { phase: Phase::Receive, millis: 300 })
        );
    }

    #[tokio::test]
    async fn test_oversized_length_prefix_refused() {
        let (mut client, mut server) = tokio::io::duplex(64);
        tokio::spawn(async move {
            let len = (MAX_FRAME_SIZE as u32) + 1;
            let _ = server.write_all(&len.to_be_bytes()).await;
        });

        let err = read_frame(&mut client).await.unwrap_err();
        assert_eq!(err.kind(), "protocol");
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = TcpConnector
            .connect(&Endpoint::new("127.0.0.1", port), Timeouts::default())
            .await;
        assert!(matches!(
            result,
            Err(Failure::Transport(TransportFailure::Connect(_)))
        ));
    }
}
