//! A lock-free single-producer/single-consumer byte ring buffer, following
//! `spa_ringbuffer`'s wrapping-index scheme: the read and write cursors are
//! unbounded `u32` counters, and availability is computed from their
//! wrapping difference rather than from a stored occupancy count. This
//! avoids the "is the buffer full or empty" ambiguity a plain `head == tail`
//! check has once wraparound is introduced.
//!
//! The buffer size must be a power of two so that index-to-slot translation
//! is a cheap bitmask instead of a modulo.

#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicU32, Ordering};

/// A lock-free SPSC ring buffer over a fixed-size byte slice.
///
/// The producer only ever calls [`RingBuffer::write_index`]/
/// [`RingBuffer::advance_write`]; the consumer only ever calls
/// [`RingBuffer::read_index`]/[`RingBuffer::advance_read`]. Calling the
/// "wrong side's" methods from both threads breaks the single-writer
/// discipline the lock-free guarantee depends on.
///
/// # Examples
///
/// ```
/// use ringbuf::RingBuffer;
///
/// let mut rb = RingBuffer::new(16);
/// let mut data = vec![0u8; 16];
///
/// let n = rb.write(&mut data, b"hello");
/// assert_eq!(n, 5);
///
/// let mut out = [0u8; 5];
/// let n = rb.read(&data, &mut out);
/// assert_eq!(n, 5);
/// assert_eq!(&out, b"hello");
/// ```
#[derive(Debug)]
pub struct RingBuffer {
    size: u32,
    mask: u32,
    read: AtomicU32,
    write: AtomicU32,
}

impl RingBuffer {
    /// Construct a new ring buffer descriptor for a backing region of
    /// `size` bytes. `size` must be a power of two.
    pub fn new(size: u32) -> Self {
        debug_assert!(size.is_power_of_two(), "ring buffer size must be a power of two");

        Self {
            size,
            mask: size - 1,
            read: AtomicU32::new(0),
            write: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Bytes available to read.
    #[inline]
    pub fn avail_read(&self) -> u32 {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    /// Bytes available to write before the buffer is full.
    #[inline]
    pub fn avail_write(&self) -> u32 {
        self.size - self.avail_read()
    }

    #[inline]
    fn read_index(&self) -> u32 {
        self.read.load(Ordering::Acquire)
    }

    #[inline]
    fn write_index(&self) -> u32 {
        self.write.load(Ordering::Acquire)
    }

    /// Advance the read cursor by `count` bytes after the consumer has
    /// copied them out. Called only by the consumer side.
    #[inline]
    pub fn advance_read(&self, count: u32) {
        self.read.store(self.read_index().wrapping_add(count), Ordering::Release);
    }

    /// Advance the write cursor by `count` bytes after the producer has
    /// copied them in. Called only by the producer side.
    #[inline]
    pub fn advance_write(&self, count: u32) {
        self.write
            .store(self.write_index().wrapping_add(count), Ordering::Release);
    }

    /// Copy as many bytes of `src` as fit into `data` (the backing region,
    /// owned by the caller since shared-memory regions live outside this
    /// type) and advance the write cursor. Returns the number of bytes
    /// written.
    pub fn write(&self, data: &mut [u8], src: &[u8]) -> u32 {
        let avail = self.avail_write();
        let len = (src.len() as u32).min(avail);
        let write = self.write_index();

        for i in 0..len {
            let slot = ((write.wrapping_add(i)) & self.mask) as usize;
            data[slot] = src[i as usize];
        }

        self.advance_write(len);
        len
    }

    /// Copy as many bytes as fit into `dst` out of `data` and advance the
    /// read cursor. Returns the number of bytes read.
    pub fn read(&self, data: &[u8], dst: &mut [u8]) -> u32 {
        let avail = self.avail_read();
        let len = (dst.len() as u32).min(avail);
        let read = self.read_index();

        for i in 0..len {
            let slot = ((read.wrapping_add(i)) & self.mask) as usize;
            dst[i as usize] = data[slot];
        }

        self.advance_read(len);
        len
    }

    /// Reset both cursors to zero. Only safe when neither side is
    /// concurrently reading or writing.
    pub fn clear(&self) {
        self.read.store(0, Ordering::Release);
        self.write.store(0, Ordering::Release);
    }
}

pub mod typed;
pub use self::typed::TypedRing;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_data_smaller_than_capacity() {
        let rb = RingBuffer::new(32);
        let mut data = vec![0u8; 32];

        let written = rb.write(&mut data, b"the quick brown fox");
        assert_eq!(written, 19);

        let mut out = vec![0u8; 19];
        let read = rb.read(&data, &mut out);
        assert_eq!(read, 19);
        assert_eq!(&out, b"the quick brown fox");
        assert_eq!(rb.avail_read(), 0);
    }

    #[test]
    fn write_saturates_when_full() {
        let rb = RingBuffer::new(8);
        let mut data = vec![0u8; 8];

        let written = rb.write(&mut data, b"0123456789");
        assert_eq!(written, 8);
        assert_eq!(rb.avail_write(), 0);
    }

    #[test]
    fn wraps_past_the_end_of_the_backing_slice() {
        let rb = RingBuffer::new(8);
        let mut data = vec![0u8; 8];

        rb.write(&mut data, b"ABCDEF");
        let mut out = [0u8; 6];
        rb.read(&data, &mut out);

        // write cursor is now at 6, wraps after 2 more bytes.
        let written = rb.write(&mut data, b"0123456789");
        assert_eq!(written, 8);

        let mut out = vec![0u8; 8];
        let read = rb.read(&data, &mut out);
        assert_eq!(read, 8);
        assert_eq!(&out, b"01234567");
    }
}
