//! Lock-free receive ring buffer
//!
//! Single producer (the USB host receive callback, possibly in interrupt
//! context) and single consumer (the main loop). Both indices advance
//! monotonically and wrap; slots are addressed modulo `N`.
//!
//! When the ring is full the producer drops the oldest byte by advancing
//! the tail itself, so stale data gives way to recent data. The consumer
//! confirms every read with a compare-exchange on the tail and retries if
//! the producer moved it underneath.

use portable_atomic::{AtomicU8, AtomicUsize, Ordering};
use tinklink_protocol::line::is_terminator;
use tinklink_protocol::{LineBuf, MAX_LINE_LEN};

/// Receive ring capacity for the USB link
pub const RX_RING_SIZE: usize = 512;

/// Fixed-capacity SPSC byte ring
pub struct RxRing<const N: usize> {
    buf: [AtomicU8; N],
    /// Next slot to write; producer only
    head: AtomicUsize,
    /// Next slot to read; consumer, or producer on overflow
    tail: AtomicUsize,
}

impl<const N: usize> RxRing<N> {
    /// Slots stay contiguous across index wrap only for powers of two
    const CAPACITY_OK: () = assert!(N.is_power_of_two(), "ring capacity must be a power of two");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;
        Self {
            buf: [const { AtomicU8::new(0) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of unread bytes
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.wrapping_sub(tail).min(N)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---- Producer ----

    /// Append a byte, dropping the oldest one if full
    ///
    /// Returns true if a byte was dropped.
    pub fn push(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let mut dropped = false;

        loop {
            let tail = self.tail.load(Ordering::Acquire);
            if head.wrapping_sub(tail) < N {
                break;
            }
            if self
                .tail
                .compare_exchange(
                    tail,
                    tail.wrapping_add(1),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                dropped = true;
                break;
            }
        }

        self.buf[head % N].store(byte, Ordering::Relaxed);
        // Publish the byte before the index
        self.head.store(head.wrapping_add(1), Ordering::Release);
        dropped
    }

    /// Append a slice; returns how many old bytes were dropped
    pub fn push_slice(&self, data: &[u8]) -> usize {
        data.iter().filter(|&&b| self.push(b)).count()
    }

    /// Discard everything unread
    ///
    /// Producer side; used when the device goes away.
    pub fn clear(&self) {
        let head = self.head.load(Ordering::Relaxed);
        self.tail.store(head, Ordering::Release);
    }

    // ---- Consumer ----

    /// Take the oldest byte
    pub fn pop(&self) -> Option<u8> {
        loop {
            let tail = self.tail.load(Ordering::Acquire);
            let head = self.head.load(Ordering::Acquire);
            if head == tail {
                return None;
            }
            let byte = self.buf[tail % N].load(Ordering::Relaxed);
            if self
                .tail
                .compare_exchange(
                    tail,
                    tail.wrapping_add(1),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                return Some(byte);
            }
        }
    }

    /// Look at the byte `offset` positions past the read cursor
    pub fn peek(&self, offset: usize) -> Option<u8> {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        if offset >= head.wrapping_sub(tail).min(N) {
            return None;
        }
        Some(self.buf[tail.wrapping_add(offset) % N].load(Ordering::Relaxed))
    }

    /// Take one complete line
    ///
    /// Any run of CR/LF terminates a line and is consumed as a whole, so
    /// CRLF, bare CR and bare LF all behave the same. Without a terminator
    /// the partial line stays in the ring. Lines longer than
    /// [`MAX_LINE_LEN`] are truncated.
    pub fn take_line(&self) -> Option<LineBuf> {
        self.skip_terminators();

        let end = (0..self.len()).find(|&i| self.peek(i).is_some_and(is_terminator))?;

        let mut line = LineBuf::new();
        for _ in 0..end {
            match self.pop() {
                Some(byte) if !is_terminator(byte) => {
                    // Excess bytes are discarded
                    let _ = line.push(byte);
                }
                // The producer overwrote the line while we were reading
                _ => break,
            }
        }
        self.skip_terminators();

        if line.is_empty() {
            None
        } else {
            debug_assert!(line.len() <= MAX_LINE_LEN);
            Some(line)
        }
    }

    fn skip_terminators(&self) {
        while self.peek(0).is_some_and(is_terminator) {
            self.pop();
        }
    }
}

impl<const N: usize> Default for RxRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
