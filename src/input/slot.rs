//! Single-value direction mailbox
//!
//! Written by the input worker, drained by the tick loop. Later writes
//! overwrite earlier ones that were never consumed.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::input::Direction;

const EMPTY: u8 = 0;

#[inline]
fn encode(direction: Option<Direction>) -> u8 {
    match direction {
        None => EMPTY,
        Some(Direction::Left) => 1,
        Some(Direction::Right) => 2,
        Some(Direction::Up) => 3,
        Some(Direction::Down) => 4,
    }
}

#[inline]
fn decode(raw: u8) -> Option<Direction> {
    match raw {
        1 => Some(Direction::Left),
        2 => Some(Direction::Right),
        3 => Some(Direction::Up),
        4 => Some(Direction::Down),
        _ => None,
    }
}

/// Lock-free last-write-wins slot
#[derive(Debug, Default)]
pub struct DirectionSlot {
    value: AtomicU8,
}

impl DirectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn store(&self, direction: Option<Direction>) {
        self.value.store(encode(direction), Ordering::Release);
    }

    #[inline]
    pub fn load(&self) -> Option<Direction> {
        decode(self.value.load(Ordering::Acquire))
    }

    /// Atomically read and clear
    #[inline]
    pub fn take(&self) -> Option<Direction> {
        decode(self.value.swap(EMPTY, Ordering::AcqRel))
    }

    #[inline]
    pub fn clear(&self) {
        self.value.store(EMPTY, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_empty_by_default() {
        let slot = DirectionSlot::new();
        assert_eq!(slot.load(), None);
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let slot = DirectionSlot::new();
        slot.store(Some(Direction::Left));
        slot.store(Some(Direction::Up));
        assert_eq!(slot.load(), Some(Direction::Up));
    }

    #[test]
    fn test_take_clears() {
        let slot = DirectionSlot::new();
        for direction in Direction::ALL {
            slot.store(Some(direction));
            assert_eq!(slot.take(), Some(direction));
            assert_eq!(slot.take(), None);
        }
    }

    #[test]
    fn test_clear() {
        let slot = DirectionSlot::new();
        slot.store(Some(Direction::Down));
        slot.clear();
        assert_eq!(slot.load(), None);
    }

    #[test]
    fn test_each_write_consumed_at_most_once() {
        let slot = Arc::new(DirectionSlot::new());
        let writer = {
            let slot = slot.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    slot.store(Some(Direction::Right));
                }
            })
        };

        let mut taken = 0;
        while !writer.is_finished() {
            if slot.take().is_some() {
                taken += 1;
            }
        }
        writer.join().unwrap();
        if slot.take().is_some() {
            taken += 1;
        }

        assert!(taken <= 1000);
        assert_eq!(slot.load(), None);
    }
}
