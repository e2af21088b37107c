//! Narrow interfaces to the collaborators around the pipeline: the GNSS
//! receiver on one side, the wireless transport on the other.

/// Inbound GNSS bytes. Implementations return within a bounded timeout and
/// report "nothing yet" as `Ok(0)`.
pub trait ByteSource {
    type Error;

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Outbound path to the GNSS receiver, used by the rover to inject corrections.
pub trait ByteSink {
    type Error;

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// Outbound correction channel. Fire-and-forget: an `Ok` only means the frame was
/// handed to the transport, never that a peer received it.
pub trait CorrectionLink {
    type Error;

    /// Largest payload the transport carries in one frame.
    fn max_frame_len(&self) -> usize;

    fn send(&mut self, payload: &[u8]) -> Result<(), Self::Error>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    type Error = T::Error;

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_bytes(buf)
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    type Error = T::Error;

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_bytes(data)
    }
}

/// Adapts any blocking `std::io` stream (a serial port, usually) to the byte traits.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoPort<T> {
    inner: T,
}

#[cfg(feature = "std")]
impl<T> IoPort<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<T: std::io::Read> ByteSource for IoPort<T> {
    type Error = std::io::Error;

    /// Reads the port, converting timeouts into "no data received"
    fn read_bytes(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.inner.read(buf) {
            Ok(b) => Ok(b),
            Err(e) => match e.kind() {
                std::io::ErrorKind::TimedOut
                | std::io::ErrorKind::WouldBlock
                | std::io::ErrorKind::Interrupted => Ok(0),
                _ => Err(e),
            },
        }
    }
}

#[cfg(feature = "std")]
impl<T: std::io::Write> ByteSink for IoPort<T> {
    type Error = std::io::Error;

    fn write_bytes(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.inner.write_all(data)
    }
}

#[cfg(all(test, feature = "std"))]
mod test {
    use super::*;
    use std::io;

    struct TimingOut;

    impl io::Read for TimingOut {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::TimedOut, "no data"))
        }
    }

    struct Broken;

    impl io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"))
        }
    }

    #[test]
    fn io_port_reads_through() {
        let mut port = IoPort::new(&b"$GNGGA"[..]);
        let mut buf = [0; 4];
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"$GNG");
    }

    #[test]
    fn io_port_timeout_is_no_data() {
        let mut port = IoPort::new(TimingOut);
        let mut buf = [0; 4];
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 0);
    }

    #[test]
    fn io_port_propagates_other_errors() {
        let mut port = IoPort::new(Broken);
        let mut buf = [0; 4];
        let err = port.read_bytes(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn io_port_writes_all() {
        let mut port = IoPort::new(Vec::new());
        port.write_bytes(&[0xd3, 0x00, 0x13]).unwrap();
        port.write_bytes(&[0x3e]).unwrap();
        assert_eq!(port.into_inner(), vec![0xd3, 0x00, 0x13, 0x3e]);
    }
}
