use std::{
    ffi::CString,
    os::unix::prelude::OsStrExt,
    path::Path,
};

use libc::EINVAL;
use termios::{tcflush, tcsetattr, Termios};

use crate::{error, BaudRate, CharSize, FlowControl, Parity, StopBits};

/// Serial device configuration.
///
/// The device is opened non-blocking and put in raw mode when the builder is
/// created. Settings are only written to the device on [`Builder::build`].
pub struct Builder {
    uart: crate::imp::Uart,
    termios: Termios,
    exclusive: bool,
}

impl Builder {
    pub(crate) fn new(path: &Path) -> error::Result<Self> {
        use libc::{O_NOCTTY, O_NONBLOCK, O_RDWR};

        let cstr = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| error::from_raw_os_error(EINVAL))?;

        let fd = unsafe { libc::open(cstr.as_ptr(), O_RDWR | O_NOCTTY | O_NONBLOCK, 0) };
        if fd < 0 {
            return Err(error::last_os_error());
        }

        // The descriptor is owned from here on and closed on any early return.
        Self::from_uart(crate::imp::Uart(fd))
    }

    fn from_uart(uart: crate::imp::Uart) -> error::Result<Self> {
        use libc::{
            CLOCAL, CREAD, ECHO, ECHOE, ECHOK, ECHONL, ICANON, ICRNL, IEXTEN, IGNBRK, IGNCR, INLCR,
            ISIG, OPOST, VMIN, VTIME,
        };

        let mut termios = Termios::from_fd(uart.0)?;

        // NMEA lines are CR LF terminated, translation would corrupt the frame.
        termios.c_iflag &= !(INLCR | IGNCR | ICRNL | IGNBRK);
        termios.c_oflag &= !OPOST;
        termios.c_cflag |= CREAD | CLOCAL;
        termios.c_lflag &= !(ICANON | ECHO | ECHOE | ECHOK | ECHONL | ISIG | IEXTEN);

        termios.c_cc[VMIN] = 1;
        termios.c_cc[VTIME] = 0;

        Ok(Self {
            uart,
            termios,
            exclusive: true,
        })
    }

    #[inline]
    pub fn set_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn set_baud_rate(mut self, baud_rate: BaudRate) -> error::Result<Self> {
        let speed = termios_speed(baud_rate).ok_or_else(|| {
            error::Error::new(
                error::ErrorKind::InvalidInput,
                format!("unsupported baud rate: {}", baud_rate),
            )
        })?;

        termios::cfsetspeed(&mut self.termios, speed)?;

        Ok(self)
    }

    pub fn set_char_size(mut self, char_size: CharSize) -> Self {
        use termios::{CS7, CS8, CSIZE};

        self.termios.c_cflag &= !CSIZE;
        self.termios.c_cflag |= match char_size {
            CharSize::Bits7 => CS7,
            CharSize::Bits8 => CS8,
        };

        self
    }

    pub fn set_parity(mut self, parity: Parity) -> Self {
        use termios::{IGNPAR, INPCK, PARENB, PARODD};

        match parity {
            Parity::ParityNone => {
                self.termios.c_cflag &= !(PARENB | PARODD);
                self.termios.c_iflag &= !INPCK;
                self.termios.c_iflag |= IGNPAR;
            }
            Parity::ParityOdd => {
                self.termios.c_cflag |= PARENB | PARODD;
                self.termios.c_iflag |= INPCK;
                self.termios.c_iflag &= !IGNPAR;
            }
            Parity::ParityEven => {
                self.termios.c_cflag &= !PARODD;
                self.termios.c_cflag |= PARENB;
                self.termios.c_iflag |= INPCK;
                self.termios.c_iflag &= !IGNPAR;
            }
        };

        self
    }

    pub fn set_stop_bits(mut self, stop_bits: StopBits) -> Self {
        use termios::CSTOPB;

        match stop_bits {
            StopBits::Stop1 => self.termios.c_cflag &= !CSTOPB,
            StopBits::Stop2 => self.termios.c_cflag |= CSTOPB,
        };

        self
    }

    pub fn set_flow_control(mut self, flow_control: FlowControl) -> Self {
        use termios::os::target::CRTSCTS;
        use termios::{IXOFF, IXON};

        match flow_control {
            FlowControl::FlowNone => {
                self.termios.c_iflag &= !(IXON | IXOFF);
                self.termios.c_cflag &= !CRTSCTS;
            }
            FlowControl::FlowSoftware => {
                self.termios.c_iflag |= IXON | IXOFF;
                self.termios.c_cflag &= !CRTSCTS;
            }
            FlowControl::FlowHardware => {
                self.termios.c_iflag &= !(IXON | IXOFF);
                self.termios.c_cflag |= CRTSCTS;
            }
        };

        self
    }

    /// Apply the settings and hand the device over to the reactor.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> error::Result<crate::Uart> {
        use libc::{ioctl, TCIOFLUSH, TCSANOW, TIOCEXCL};

        let uart = self.uart;

        if self.exclusive {
            let ret = unsafe { ioctl(uart.0, TIOCEXCL) };
            if ret < 0 {
                return Err(error::last_os_error());
            }
        }

        tcsetattr(uart.0, TCSANOW, &self.termios)?;

        // Drop anything the receiver sent before we were listening.
        tcflush(uart.0, TCIOFLUSH)?;

        crate::Uart::from_impl(uart)
    }
}

fn termios_speed(baud_rate: BaudRate) -> Option<libc::speed_t> {
    use termios::os::linux::{B460800, B921600};
    use termios::os::target::{B115200, B230400, B57600};
    use termios::{B1200, B19200, B2400, B38400, B4800, B9600};

    let speed = match baud_rate {
        BaudRate::Baud1200 => B1200,
        BaudRate::Baud2400 => B2400,
        BaudRate::Baud4800 => B4800,
        BaudRate::Baud9600 => B9600,
        BaudRate::Baud19200 => B19200,
        BaudRate::Baud38400 => B38400,
        BaudRate::Baud57600 => B57600,
        BaudRate::Baud115200 => B115200,
        BaudRate::BaudOther(230400) => B230400,
        BaudRate::BaudOther(460800) => B460800,
        BaudRate::BaudOther(921600) => B921600,
        BaudRate::BaudOther(_) => return None,
    };

    Some(speed)
}
