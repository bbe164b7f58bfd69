use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::checksum;

/// Wrap a payload in a sentence envelope.
///
/// # Example
///
/// ```
/// assert_eq!(fgps::nmea::frame("GPGSV,1,1,00"), "$GPGSV,1,1,00*79\r\n");
/// ```
pub fn frame(payload: &str) -> String {
    format!("${}*{}\r\n", payload, checksum(payload))
}

/// Frame the payload and write it to the output channel.
///
/// The write is attempted once. Failures are returned to the caller, there is
/// no retry.
pub async fn emit<W: AsyncWrite + Unpin>(payload: &str, writer: &mut W) -> std::io::Result<()> {
    let sentence = frame(payload);

    log::debug!("Echo: {}", sentence.trim_end());

    writer.write_all(sentence.as_bytes()).await?;
    writer.flush().await
}
