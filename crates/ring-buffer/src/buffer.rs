//! Lock-Free Ring Buffer Implementation

use crate::RingError;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Fixed-capacity SPSC ring buffer.
///
/// One slot is always left unused so that `head == tail` means empty and
/// `(tail + 1) % N == head` means full without a separate counter. The
/// usable capacity is therefore `N - 1`.
///
/// `head` is only ever stored by the [`Consumer`] and `tail` only by the
/// [`Producer`]. Both are plain acquire loads and release stores.
pub struct RingBuffer<T: Copy, const N: usize> {
    /// Pre-allocated storage
    slots: [UnsafeCell<MaybeUninit<T>>; N],
    /// Next slot to read (consumer-owned)
    head: AtomicUsize,
    /// Next slot to write (producer-owned)
    tail: AtomicUsize,
}

// SAFETY: a slot is written by the producer only while it lies outside
// [head, tail), and read by the consumer only while it lies inside. The
// release store of the owning index publishes the slot to the other side.
unsafe impl<T: Copy + Send, const N: usize> Sync for RingBuffer<T, N> {}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    /// Create an empty ring buffer
    ///
    /// # Panics
    /// Panics if `N < 2`, since one slot is reserved.
    pub fn new() -> Self {
        assert!(N >= 2, "ring buffer needs at least two slots, got {}", N);
        Self {
            slots: std::array::from_fn(|_| UnsafeCell::new(MaybeUninit::uninit())),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Split the buffer into its producer and consumer handles.
    ///
    /// This is the only way to obtain handles, and it consumes the buffer,
    /// so there is exactly one of each.
    pub fn split(self) -> (Producer<T, N>, Consumer<T, N>) {
        let ring = Arc::new(self);
        (
            Producer { ring: Arc::clone(&ring) },
            Consumer { ring },
        )
    }

    #[inline]
    const fn advance(index: usize) -> usize {
        (index + 1) % N
    }

    /// Check if buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Check if buffer is full
    #[inline]
    pub fn is_full(&self) -> bool {
        Self::advance(self.tail.load(Ordering::Acquire)) == self.head.load(Ordering::Acquire)
    }

    /// Get the number of items currently in the buffer
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        if tail >= head {
            tail - head
        } else {
            N - head + tail
        }
    }

    /// Usable capacity (one slot is reserved)
    pub const fn capacity(&self) -> usize {
        N - 1
    }
}

impl<T: Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write side of a [`RingBuffer`]. Sole writer of `tail`.
pub struct Producer<T: Copy, const N: usize> {
    ring: Arc<RingBuffer<T, N>>,
}

impl<T: Copy, const N: usize> Producer<T, N> {
    /// Check if buffer is full
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Check if buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Number of items currently buffered
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Usable capacity
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Copy `item` into the tail slot, or hand it back if the buffer is full.
    pub fn try_enqueue(&mut self, item: T) -> Result<(), RingError<T>> {
        let tail = self.ring.tail.load(Ordering::Relaxed);
        let next_tail = RingBuffer::<T, N>::advance(tail);

        if next_tail == self.ring.head.load(Ordering::Acquire) {
            return Err(RingError::Full(item));
        }

        // SAFETY: the slot at `tail` is outside [head, tail) so the consumer
        // will not read it until the store below publishes it.
        unsafe { (*self.ring.slots[tail].get()).write(item) };

        self.ring.tail.store(next_tail, Ordering::Release);
        Ok(())
    }

    /// Copy `item` into the tail slot.
    ///
    /// # Panics
    /// Panics if the buffer is full. Callers check [`is_full`](Self::is_full)
    /// first; calling this on a full buffer is a bug.
    pub fn enqueue(&mut self, item: T) {
        if self.try_enqueue(item).is_err() {
            panic!("enqueue called on a full ring buffer (capacity {})", N - 1);
        }
    }
}

/// Read side of a [`RingBuffer`]. Sole writer of `head`.
pub struct Consumer<T: Copy, const N: usize> {
    ring: Arc<RingBuffer<T, N>>,
}

impl<T: Copy, const N: usize> Consumer<T, N> {
    /// Check if buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Check if buffer is full
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Number of items currently buffered
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Usable capacity
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Copy the item out of the head slot, if there is one.
    pub fn try_dequeue(&mut self) -> Result<T, RingError<T>> {
        let head = self.ring.head.load(Ordering::Relaxed);

        if head == self.ring.tail.load(Ordering::Acquire) {
            return Err(RingError::Empty);
        }

        // SAFETY: `head != tail`, so the producer initialised this slot and
        // published it with a release store of `tail`.
        let item = unsafe { (*self.ring.slots[head].get()).assume_init_read() };

        self.ring
            .head
            .store(RingBuffer::<T, N>::advance(head), Ordering::Release);
        Ok(item)
    }

    /// Copy the item out of the head slot.
    ///
    /// # Panics
    /// Panics if the buffer is empty. Callers check
    /// [`is_empty`](Self::is_empty) first; calling this on an empty buffer is
    /// a bug.
    pub fn dequeue(&mut self) -> T {
        match self.try_dequeue() {
            Ok(item) => item,
            Err(_) => panic!("dequeue called on an empty ring buffer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = RingBuffer::<u32, 8>::new();
        assert!(buffer.is_empty());
        assert!(!buffer.is_full());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 7);
    }

    #[test]
    fn test_full_after_n_minus_one() {
        let (mut producer, mut consumer) = RingBuffer::<u32, 4>::new().split();

        for i in 0..3 {
            assert!(!producer.is_full());
            producer.enqueue(i);
        }

        assert!(producer.is_full());
        assert!(!producer.is_empty());
        assert_eq!(producer.len(), 3);

        consumer.dequeue();
        assert!(!consumer.is_full());
    }

    #[test]
    fn test_fifo_order_across_wrap() {
        let (mut producer, mut consumer) = RingBuffer::<u32, 4>::new().split();

        // Push the indices around the end of the array a few times
        for round in 0..5 {
            for i in 0..3 {
                producer.enqueue(round * 10 + i);
            }
            for i in 0..3 {
                assert_eq!(consumer.dequeue(), round * 10 + i);
            }
            assert!(consumer.is_empty());
        }
    }

    #[test]
    fn test_try_enqueue_returns_item_when_full() {
        let (mut producer, _consumer) = RingBuffer::<u8, 2>::new().split();
        producer.enqueue(1);

        let err = producer.try_enqueue(2).unwrap_err();
        assert_eq!(err, RingError::Full(2));
        assert_eq!(err.into_inner(), Some(2));
    }

    #[test]
    fn test_try_dequeue_empty() {
        let (_producer, mut consumer) = RingBuffer::<u8, 2>::new().split();
        assert_eq!(consumer.try_dequeue(), Err(RingError::Empty));
    }

    #[test]
    #[should_panic(expected = "full ring buffer")]
    fn test_enqueue_on_full_panics() {
        let (mut producer, _consumer) = RingBuffer::<u8, 2>::new().split();
        producer.enqueue(1);
        producer.enqueue(2);
    }

    #[test]
    #[should_panic(expected = "empty ring buffer")]
    fn test_dequeue_on_empty_panics() {
        let (_producer, mut consumer) = RingBuffer::<u8, 4>::new().split();
        consumer.dequeue();
    }

    #[test]
    #[should_panic(expected = "at least two slots")]
    fn test_single_slot_rejected() {
        let _ = RingBuffer::<u8, 1>::new();
    }

    #[test]
    fn test_cross_thread_transfer() {
        let (mut producer, mut consumer) = RingBuffer::<u32, 16>::new().split();
        const COUNT: u32 = 10_000;

        let writer = std::thread::spawn(move || {
            for i in 0..COUNT {
                while producer.is_full() {
                    std::hint::spin_loop();
                }
                producer.enqueue(i);
            }
        });

        let mut expected = 0;
        while expected < COUNT {
            if let Ok(value) = consumer.try_dequeue() {
                assert_eq!(value, expected);
                expected += 1;
            }
        }

        writer.join().unwrap();
        assert!(consumer.is_empty());
    }

    proptest! {
        #[test]
        fn prop_occupancy_stays_within_capacity(ops in proptest::collection::vec(any::<bool>(), 0..256)) {
            let (mut producer, mut consumer) = RingBuffer::<u16, 8>::new().split();
            let mut model = VecDeque::new();
            let mut next = 0u16;

            for push in ops {
                if push {
                    if !producer.is_full() {
                        producer.enqueue(next);
                        model.push_back(next);
                        next += 1;
                    }
                } else if !consumer.is_empty() {
                    prop_assert_eq!(Some(consumer.dequeue()), model.pop_front());
                }

                prop_assert!(producer.len() <= 7);
                prop_assert_eq!(producer.len(), model.len());
                prop_assert!(!(producer.is_full() && producer.is_empty()));
            }
        }

        #[test]
        fn prop_fifo_without_interleaving(items in proptest::collection::vec(any::<[u8; 3]>(), 0..32)) {
            let (mut producer, mut consumer) = RingBuffer::<[u8; 3], 32>::new().split();

            for item in &items {
                producer.enqueue(*item);
            }
            let drained: Vec<_> = (0..items.len()).map(|_| consumer.dequeue()).collect();

            prop_assert_eq!(drained, items);
            prop_assert!(consumer.is_empty());
        }
    }
}
