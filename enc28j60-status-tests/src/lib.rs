//! Shared fixtures for the integration tests.
use bytes::BytesMut;
use enc28j60_status::{
    error::StreamError,
    stream::{DebugLogCodec, LoggedVector},
};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::codec::Decoder;

/// Debug output of the driver for two sent and two received frames.
/// The second transmission hit a late collision, the second reception a CRC error.
pub const SERIAL_LOG: &str = "\
Initializing ENC28J60...
MAC initialized!
Sending Packet with 64 bytes...
Transmit Status Vector: 40 00 80 00 40 00 00
Received Packet with 60 bytes...
Receive Status Vector: 3c 00 80 02
Sending Packet with 64 bytes...
Transmit Status Vector: 40 00 81 20 c0 00 00
Error while sending Packet!
Received Packet with 60 bytes...
Receive Status Vector: 3c 00 10 00
";

/// Reads `reader` to the end and collects every status vector found.
///
/// This is what `FramedRead` does with the codec, without needing a `Stream` consumer.
pub async fn collect_vectors<R: AsyncRead + Unpin>(
    mut reader: R,
    mut codec: DebugLogCodec,
) -> Result<Vec<LoggedVector>, StreamError> {
    let mut buf = BytesMut::with_capacity(64);
    let mut vectors = Vec::new();
    loop {
        while let Some(vector) = codec.decode(&mut buf)? {
            vectors.push(vector);
        }
        if reader.read_buf(&mut buf).await? == 0 {
            break;
        }
    }
    while let Some(vector) = codec.decode_eof(&mut buf)? {
        vectors.push(vector);
    }
    Ok(vectors)
}
