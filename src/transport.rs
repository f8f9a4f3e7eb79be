//! NDJSON transport: one JSON-RPC message per line.
//!
//! The writer is a task that owns the output stream, so concurrent tool
//! calls never interleave partial lines.

use log::{debug, error, trace};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;

use crate::error::Error;
use crate::protocol::JsonRpcResponse;

pub type OutgoingSender = mpsc::UnboundedSender<JsonRpcResponse>;

/// Line reader over the input stream
pub struct LineReader<R>
{   lines: Lines<R>
}

impl<R> LineReader<R>
where R: AsyncBufRead + Unpin
{   pub fn new(reader: R) -> Self
    {   LineReader
        {   lines: reader.lines()
        }
    }

    /// Next non-blank line, `None` at EOF
    pub async fn next_message(&mut self)
      -> Result<Option<String>, Error>
    {   loop
        {   match self.lines.next_line().await?
            {   Some(line) => {
                  let trimmed = line.trim();
                  if trimmed.is_empty()
                  {   continue;
                  }
                  trace!("<- {}", trimmed);
                  return Ok(Some(trimmed.to_string()));
                }
              , None => return Ok(None)
            }
        }
    }
}

/// Spawn the writer task; it ends once every sender is dropped
pub fn spawn_writer<W>(writer: W)
  -> (OutgoingSender, tokio::task::JoinHandle<Result<(), Error>>)
where W: AsyncWrite + Unpin + Send + 'static
{   let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
      run_writer_loop(rx, writer).await
    });
    (tx, handle)
}

async fn run_writer_loop<W>(
  mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>
, mut writer: W
) -> Result<(), Error>
where W: AsyncWrite + Unpin
{   debug!("Starting writer loop");
    while let Some(message) = rx.recv().await
    {   let mut line = match serde_json::to_vec(&message)
        {   Ok(bytes) => bytes
          , Err(e) => {
              error!("Failed to serialize response: {}", e);
              continue;
            }
        };
        line.push(b'\n');
        trace!("-> {}", String::from_utf8_lossy(&line).trim_end());
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    debug!("Writer loop drained");
    Ok(())
}
