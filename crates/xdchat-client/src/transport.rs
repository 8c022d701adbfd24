//! Transport seam.
//!
//! The session never names a socket type. It asks a [`Connector`] for a byte
//! stream, splits it into halves and owns both from then on. Production uses
//! [`TcpConnector`]; tests substitute in-memory pipes or a simulated network.

use std::{future::Future, io};

use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};

/// Opens the byte stream a session runs over.
pub trait Connector: Send + Sync + 'static {
    /// Bidirectional stream type.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Open a stream to `host:port`.
    ///
    /// # Errors
    ///
    /// Returns the resolver or connect error unchanged.
    fn connect(&self, host: &str, port: u16) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

/// Plain TCP, no TLS.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, host: &str, port: u16) -> io::Result<TcpStream> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true)?;
        tracing::debug!("TCP connected to {host}:{port} from {:?}", stream.local_addr().ok());
        Ok(stream)
    }
}
