use std::{
    io::{Read, Write},
    pin::Pin,
    task::{Context, Poll},
};

use tokio::io::{self, unix::AsyncFd, AsyncRead, AsyncWrite, ReadBuf};

use crate::{BaudRate, CharSize, FlowControl, Parity, StopBits};

/// A UART-based serial port driven by the tokio reactor.
///
/// The port will be closed when the value is dropped.
pub struct Uart {
    inner: AsyncFd<crate::imp::Uart>,
}

impl Uart {
    /// Open an UART device as 8N1 without flow control.
    ///
    /// This is the line setting used by GPS receivers and by the radio data
    /// port. For more fine grained control use the serial builder.
    ///
    /// ## Errors
    ///
    /// * `NoDevice` if the device could not be opened. This could indicate that the device is
    ///   already in use.
    /// * `InvalidInput` if `path` is not a valid device name or the baud rate is unsupported.
    /// * `Io` for any other error while opening or initializing the device.
    pub fn open(path: &std::path::Path, baud_rate: BaudRate) -> crate::Result<Self> {
        let uart = crate::builder(path)?
            .set_baud_rate(baud_rate)?
            .set_char_size(CharSize::Bits8)
            .set_parity(Parity::ParityNone)
            .set_stop_bits(StopBits::Stop1)
            .set_flow_control(FlowControl::FlowNone)
            .build()?;

        log::debug!("Opened serial device {} at {}", path.display(), baud_rate);

        Ok(uart)
    }

    pub(crate) fn from_impl(value: crate::imp::Uart) -> crate::Result<Self> {
        Ok(Self {
            inner: AsyncFd::new(value)?,
        })
    }
}

impl AsyncRead for Uart {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        loop {
            let mut guard = match self.inner.poll_read_ready_mut(cx)? {
                Poll::Ready(guard) => guard,
                Poll::Pending => return Poll::Pending,
            };

            match guard.try_io(|inner| inner.get_mut().read(buf.initialize_unfilled())) {
                Ok(Ok(size)) => {
                    buf.advance(size);
                    return Poll::Ready(Ok(()));
                }
                Ok(Err(e)) => return Poll::Ready(Err(e)),
                Err(_would_block) => continue,
            }
        }
    }
}

impl AsyncWrite for Uart {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        loop {
            let mut guard = match self.inner.poll_write_ready_mut(cx)? {
                Poll::Ready(guard) => guard,
                Poll::Pending => return Poll::Pending,
            };

            match guard.try_io(|inner| inner.get_mut().write(buf)) {
                Ok(result) => return Poll::Ready(result),
                Err(_would_block) => continue,
            }
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
