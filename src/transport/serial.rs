use std::io::{Error, ErrorKind};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{spawn, JoinHandle};
use std::time::Duration;

use log::{debug, error, info, trace, warn};
use serialport::SerialPort;

use super::Transport;
use crate::event::Event;
use crate::frame::Frame;
use crate::frame_buffer::FrameBuffer;

/// Read timeout of serial ports opened with [`open`].
const READ_TIMEOUT: Duration = Duration::from_secs(3600);

/// Opens a serial port for use with [`SerialTransport`].
///
/// # Errors
///
/// For errors please refer to [`serialport::SerialPortBuilder::open()`].
pub fn open<'a>(
    path: impl Into<std::borrow::Cow<'a, str>>,
    baud_rate: u32,
) -> serialport::Result<Box<dyn SerialPort>> {
    serialport::new(path, baud_rate)
        .timeout(READ_TIMEOUT)
        .open()
}

/// Frame transport over a serial port.
///
/// A reader thread decodes incoming frames and reports them to the engine.
pub struct SerialTransport {
    writer: FrameBuffer<Box<dyn SerialPort>>,
    frames: Receiver<Frame>,
    reader: Option<JoinHandle<()>>,
}

impl SerialTransport {
    /// Creates the transport and spawns its reader thread.
    ///
    /// # Errors
    ///
    /// Returns a [`serialport::Error`] if the serial port cannot be cloned.
    pub fn spawn(
        serial_port: Box<dyn SerialPort>,
        events: Sender<Event>,
    ) -> serialport::Result<Self> {
        let reader = FrameBuffer::new(serial_port.try_clone()?);
        let (frames_tx, frames_rx) = channel();

        Ok(Self {
            writer: FrameBuffer::new(serial_port),
            frames: frames_rx,
            reader: Some(spawn(move || read_frames(reader, &frames_tx, &events))),
        })
    }

    /// Returns whether the reader thread is still running.
    #[must_use]
    pub fn is_reading(&self) -> bool {
        self.reader
            .as_ref()
            .is_some_and(|reader| !reader.is_finished())
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("reading", &self.is_reading())
            .finish_non_exhaustive()
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, frame: &Frame) -> std::io::Result<()> {
        self.writer.write_frame(frame)
    }

    fn receive(&mut self) -> std::io::Result<Frame> {
        self.frames
            .recv()
            .map_err(|_| Error::new(ErrorKind::BrokenPipe, "Serial reader terminated."))
    }
}

/// Reads frames until the port fails or the engine is gone.
fn read_frames<T>(mut reader: FrameBuffer<T>, frames: &Sender<Frame>, events: &Sender<Event>)
where
    T: std::io::Read,
{
    loop {
        let event = match reader.read_frame() {
            Ok(frame) => {
                trace!("Received frame: {frame}");

                if frames.send(frame).is_err() {
                    break;
                }

                Event::Arrival
            }
            Err(error) if error.kind() == ErrorKind::InvalidData => {
                debug!("Received damaged frame: {error}");
                Event::Corrupt
            }
            Err(error) if error.kind() == ErrorKind::TimedOut => {
                trace!("Serial port read timed out.");
                continue;
            }
            Err(error) if error.kind() == ErrorKind::OutOfMemory => {
                warn!("{error}");
                Event::Corrupt
            }
            Err(error) => {
                error!("Serial port read failed: {error}");
                return;
            }
        };

        if events.send(event).is_err() {
            break;
        }
    }

    info!("Engine gone, serial reader exiting.");
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::mpsc::channel;

    use super::read_frames;
    use crate::event::Event;
    use crate::frame::Frame;
    use crate::frame_buffer::FrameBuffer;
    use crate::sequence::SeqNum;
    use crate::types::Payload;

    #[test]
    fn test_read_frames_reports_events() {
        let good = Frame::data(
            SeqNum::from_u8_lossy(0),
            SeqNum::from_u8_lossy(7),
            Payload::try_from(b"good".as_slice()).unwrap(),
        );
        let mut writer = FrameBuffer::new(Vec::new());
        writer.write_frame(&good).unwrap();
        let mut bytes = writer.into_inner();
        let damaged = bytes.len();
        bytes.extend_from_within(..);
        bytes[damaged + 1] ^= 0x04;
        writer = FrameBuffer::new(bytes);
        writer.write_frame(&Frame::ack(SeqNum::from_u8_lossy(2))).unwrap();

        let (frames_tx, frames_rx) = channel();
        let (events_tx, events_rx) = channel();
        read_frames(
            FrameBuffer::new(Cursor::new(writer.into_inner())),
            &frames_tx,
            &events_tx,
        );

        let events: Vec<_> = events_rx.try_iter().collect();
        assert_eq!(events, [Event::Arrival, Event::Corrupt, Event::Arrival]);
        let frames: Vec<_> = frames_rx.try_iter().collect();
        assert_eq!(frames, [good, Frame::ack(SeqNum::from_u8_lossy(2))]);
    }
}
