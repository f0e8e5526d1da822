//! File sink for the `/file` sub-protocol.
//!
//! After a `/file <name>` line the peer writes raw bytes with no framing;
//! end-of-stream is end-of-file. The sender may have pipelined payload bytes
//! into the same packets as the command line, so the caller passes whatever
//! the line reader had already buffered and we write that before copying the
//! rest of the stream.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Reduce a client-supplied file name to its final path component.
///
/// Peers control this string, so anything that would resolve outside the
/// drop directory (separators, `..`, absolute paths) is reduced to the bare
/// file name. Returns `None` when nothing usable remains.
pub fn sanitize_name(raw: &str) -> Option<&str> {
    Path::new(raw).file_name()?.to_str()
}

/// Receive one file: write `initial`, then copy `reader` to disk until
/// end-of-stream. Returns the destination path and total byte count.
///
/// When the name is unusable the stream is still drained, so the peer can
/// finish its upload without a connection reset, but nothing is written.
pub async fn receive<R>(
    dir: &Path,
    raw_name: &str,
    initial: &[u8],
    reader: &mut R,
) -> io::Result<(PathBuf, u64)>
where
    R: AsyncRead + Unpin,
{
    let Some(name) = sanitize_name(raw_name) else {
        let mut sink = tokio::io::sink();
        sink.write_all(initial).await?;
        tokio::io::copy(reader, &mut sink).await?;
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unusable file name: {raw_name:?}"),
        ));
    };

    fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    let mut file = fs::File::create(&path).await?;
    file.write_all(initial).await?;
    let copied = tokio::io::copy(reader, &mut file).await?;
    file.flush().await?;

    Ok((path, initial.len() as u64 + copied))
}
