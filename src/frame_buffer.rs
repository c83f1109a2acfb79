//! Frame buffer for reading and writing frames on byte streams.

use std::io::{Error, ErrorKind, Read, Write};

use log::{debug, trace};

use crate::frame::Frame;
use crate::protocol::{Stuff, Unstuff, CANCEL, FLAG, SUBSTITUTE};
use crate::types::RawFrame;

/// A buffer for reading and writing frames.
#[derive(Debug)]
pub struct FrameBuffer<T> {
    inner: T,
    buffer: RawFrame,
}

impl<T> FrameBuffer<T> {
    /// Create a new `FrameBuffer` with the given inner reader and/or writer.
    #[must_use]
    pub const fn new(inner: T) -> Self {
        Self {
            inner,
            buffer: RawFrame::new(),
        }
    }

    /// Return the inner reader-writer type.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn buffer_overflow(byte: u8) -> Error {
        Error::new(
            ErrorKind::OutOfMemory,
            format!("Frame buffer overflow: {byte:#04X}"),
        )
    }
}

impl<T> FrameBuffer<T>
where
    T: Read,
{
    /// Read a [`Frame`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::InvalidData`] if the frame is damaged,
    /// or any other [`Error`] if the underlying read failed.
    pub fn read_frame(&mut self) -> std::io::Result<Frame> {
        Ok(Frame::try_from(self.read_raw_frame()?)?)
    }

    /// Reads a raw, unstuffed frame into the buffer.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if any I/O error occurs, the stream ends or a frame was marked damaged.
    pub fn read_raw_frame(&mut self) -> std::io::Result<&[u8]> {
        self.buffer.clear();
        let mut error = false;

        #[allow(clippy::unbuffered_bytes)]
        for byte in (&mut self.inner).bytes() {
            match byte? {
                CANCEL => {
                    trace!("Resetting buffer due to cancel byte.");
                    self.buffer.clear();
                    error = false;
                }
                FLAG => {
                    trace!("Received flag byte.");

                    if error {
                        debug!("Discarding frame marked as damaged.");
                        self.buffer.clear();
                        return Err(Error::new(
                            ErrorKind::InvalidData,
                            "Frame was marked as damaged.",
                        ));
                    }

                    if !self.buffer.is_empty() {
                        trace!("Buffer: {:#04X?}", self.buffer);
                        self.buffer.unstuff();
                        trace!("Unstuffed buffer: {:#04X?}", self.buffer);
                        return Ok(&self.buffer);
                    }
                }
                SUBSTITUTE => {
                    trace!("Received SUBSTITUTE byte. Setting error condition.");
                    error = true;
                }
                byte => {
                    if self.buffer.push(byte).is_err() {
                        return Err(Self::buffer_overflow(byte));
                    }
                }
            }
        }

        Err(Error::new(
            ErrorKind::UnexpectedEof,
            "Byte stream terminated unexpectedly.",
        ))
    }
}

impl<T> FrameBuffer<T>
where
    T: Write,
{
    /// Write a [`Frame`].
    ///
    /// # Errors
    ///
    /// Returns an [Error] if the write operation failed or a buffer overflow occurred.
    pub fn write_frame(&mut self, frame: &Frame) -> std::io::Result<()> {
        trace!("Writing frame: {frame}");
        self.buffer.clear();

        for byte in frame.into_iter().stuff() {
            self.buffer
                .push(byte)
                .map_err(|_| Self::buffer_overflow(byte))?;
        }

        self.buffer
            .push(FLAG)
            .map_err(|_| Self::buffer_overflow(FLAG))?;
        trace!("Writing bytes: {:#04X?}", self.buffer);
        self.inner.write_all(&self.buffer)?;
        self.inner.flush()
    }
}
