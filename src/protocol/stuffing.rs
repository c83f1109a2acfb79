use super::{CANCEL, ESCAPE, FLAG, SUBSTITUTE};

const RESERVED_BYTES: [u8; 4] = [FLAG, ESCAPE, SUBSTITUTE, CANCEL];
const COMPLEMENT_BIT: u8 = 1 << 5;

/// Trait to allow stuffing of byte iterators.
pub trait Stuff: Iterator<Item = u8> + Sized {
    /// Stuffs a byte stream.
    fn stuff(self) -> Stuffer<Self> {
        Stuffer::new(self)
    }
}

impl<T> Stuff for T where T: Iterator<Item = u8> {}

/// Iterator escaping reserved bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stuffer<T>
where
    T: Iterator<Item = u8>,
{
    bytes: T,
    next: Option<u8>,
}

impl<T> Stuffer<T>
where
    T: Iterator<Item = u8>,
{
    const fn new(bytes: T) -> Self {
        Self { bytes, next: None }
    }
}

impl<T> Iterator for Stuffer<T>
where
    T: Iterator<Item = u8>,
{
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(next) = self.next.take() {
            return Some(next);
        }

        let byte = self.bytes.next()?;

        if RESERVED_BYTES.contains(&byte) {
            self.next = Some(byte ^ COMPLEMENT_BIT);
            Some(ESCAPE)
        } else {
            Some(byte)
        }
    }
}

/// Reverts byte stuffing in place.
pub trait Unstuff {
    /// Removes escape bytes and restores the escaped bytes.
    fn unstuff(&mut self);
}

impl<const SIZE: usize> Unstuff for heapless::Vec<u8, SIZE> {
    fn unstuff(&mut self) {
        let mut cursor: usize = 0;

        while let Some(index) = self
            .iter()
            .skip(cursor)
            .position(|&byte| byte == ESCAPE)
        {
            cursor += index;
            self.remove(cursor);

            if let Some(byte) = self.get_mut(cursor) {
                *byte ^= COMPLEMENT_BIT;
            }

            // Skip the restored byte, it may equal ESCAPE.
            cursor += 1;
        }
    }
}
