//! RGB Triple Definitions

use std::fmt;

/// A colour triple, the unit of work carried through the ring buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Number of distinct triples in one enumeration cycle
    pub const CYCLE_LEN: u32 = 1 << 24;

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Position within the enumeration cycle
    pub const fn index(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Triple at `index` (taken modulo the cycle length)
    pub const fn from_index(index: u32) -> Self {
        Self {
            r: (index >> 16) as u8,
            g: (index >> 8) as u8,
            b: index as u8,
        }
    }

    /// Next triple: `b` wraps fastest, carrying into `g`, then into `r`.
    /// `(255, 255, 255)` is followed by `(0, 0, 0)`.
    pub const fn successor(self) -> Self {
        Self::from_index(self.index().wrapping_add(1))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Endless ordered enumeration of all triples
#[derive(Debug, Clone, Default)]
pub struct RgbSequence {
    next: Rgb,
}

impl RgbSequence {
    /// Start at `(0, 0, 0)`
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at an arbitrary triple
    pub fn starting_at(first: Rgb) -> Self {
        Self { next: first }
    }

    /// The triple the next call will yield
    pub fn peek(&self) -> Rgb {
        self.next
    }

    /// Yield the next triple; never runs out
    pub fn next_rgb(&mut self) -> Rgb {
        let current = self.next;
        self.next = current.successor();
        current
    }
}

impl Iterator for RgbSequence {
    type Item = Rgb;

    fn next(&mut self) -> Option<Rgb> {
        Some(self.next_rgb())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_at_zero() {
        let first: Vec<_> = RgbSequence::new().take(3).collect();
        assert_eq!(
            first,
            vec![Rgb::new(0, 0, 0), Rgb::new(0, 0, 1), Rgb::new(0, 0, 2)]
        );
    }

    #[test]
    fn test_triple_is_three_bytes() {
        assert_eq!(std::mem::size_of::<Rgb>(), 3);
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "(1, 2, 3)");
    }

    #[test]
    fn test_blue_carries_into_green() {
        let mut seq = RgbSequence::starting_at(Rgb::new(0, 0, 255));
        assert_eq!(seq.next_rgb(), Rgb::new(0, 0, 255));
        assert_eq!(seq.next_rgb(), Rgb::new(0, 1, 0));
    }

    #[test]
    fn test_green_carries_into_red() {
        assert_eq!(Rgb::new(7, 255, 255).successor(), Rgb::new(8, 0, 0));
    }

    #[test]
    fn test_cycle_restarts_at_zero() {
        let mut seq = RgbSequence::starting_at(Rgb::new(255, 255, 255));
        seq.next_rgb();
        assert_eq!(seq.peek(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Rgb::new(1, 22, 255).to_string(), "(1, 22, 255)");
    }

    proptest! {
        #[test]
        fn prop_successor_is_next_index(index in 0u32..Rgb::CYCLE_LEN) {
            let rgb = Rgb::from_index(index);
            prop_assert_eq!(rgb.index(), index);
            prop_assert_eq!(rgb.successor().index(), (index + 1) % Rgb::CYCLE_LEN);
        }
    }
}
