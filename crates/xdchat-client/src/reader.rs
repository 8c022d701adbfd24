//! Inbound Reader.
//!
//! One task per connection. Reads fixed-size chunks, reassembles them into
//! lines, forwards each line to the event sink in arrival order and answers
//! `PING` probes from inside the loop. When the stream ends or fails, the task
//! hands a reason to [`Shared::teardown`], which ignores it if the connection
//! it belonged to is already gone.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, ReadHalf};
use xdchat_proto::{Command, LineDecoder, ping_token};

use crate::{ConnectionState, SessionEvent, TransportError, session::Shared};

/// Bytes requested per socket read.
pub const READ_CHUNK_SIZE: usize = 2048;

/// Reader task body for the connection registered as `epoch`.
pub(crate) async fn run<S>(read_half: ReadHalf<S>, shared: Arc<Shared<S>>, epoch: u64)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    tracing::debug!("Reader {epoch} started");

    match read_loop(read_half, &shared, epoch).await {
        Ok(()) => tracing::debug!("Reader {epoch} stopped: connection no longer active"),
        Err(e) => {
            tracing::info!("Reader {epoch} stopped: {e}");
            shared.teardown(epoch, format!("=== Disconnected: {e} ===")).await;
        },
    }
}

/// Read until the stream ends, fails, or the connection is no longer active.
///
/// Returns `Ok(())` only when the state left `Connected` underneath the
/// reader, in which case there is nothing left to tear down.
async fn read_loop<S>(
    mut read_half: ReadHalf<S>,
    shared: &Shared<S>,
    epoch: u64,
) -> Result<(), TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let mut decoder = LineDecoder::new();
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];

    loop {
        let n = read_half.read(&mut chunk).await.map_err(TransportError::Read)?;

        if n == 0 {
            if let Some(rest) = decoder.finish() {
                shared.sink.emit(SessionEvent::Inbound(rest));
            }
            return Err(TransportError::Closed);
        }

        decoder.extend(&chunk[..n]);

        while let Some(line) = decoder.next_line()? {
            let pong = ping_token(&line).map(|token| Command::Pong { token: token.to_string() });
            shared.sink.emit(SessionEvent::Inbound(line));

            if let Some(pong) = pong {
                shared.write_for(epoch, &pong).await?;
                tracing::debug!("Answered keep-alive probe");
            }
        }

        if shared.state() != ConnectionState::Connected {
            return Ok(());
        }
    }
}
