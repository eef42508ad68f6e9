//! Channel membership of an edge.

use bitflags::bitflags;

bitflags! {
    /// Set of output channels an edge contributes to.
    ///
    /// Two-channel combinations are the normal case: the median of three
    /// channels only reconstructs an edge when at least two of them see it.
    /// An empty set (black) is invalid on any edge that reaches a generator.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EdgeColor: u8 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const YELLOW = Self::RED.bits() | Self::GREEN.bits();
        const MAGENTA = Self::RED.bits() | Self::BLUE.bits();
        const CYAN = Self::GREEN.bits() | Self::BLUE.bits();
        const WHITE = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
    }
}

impl EdgeColor {
    pub const BLACK: Self = Self::empty();

    /// Single-channel colours in output channel order.
    pub const CHANNELS: [Self; 3] = [Self::RED, Self::GREEN, Self::BLUE];

    /// `true` when the edge feeds output channel `index` (0 = R, 1 = G, 2 = B).
    #[inline]
    pub fn has_channel(self, index: usize) -> bool {
        self.contains(Self::CHANNELS[index])
    }

    fn is_primary(self) -> bool {
        self == Self::RED || self == Self::GREEN || self == Self::BLUE
    }

    /// Picks the next colour at a corner.
    ///
    /// Black and white start from one of cyan/magenta/yellow chosen by the
    /// seed; a two-channel colour rotates by one or two bits.  If the colour
    /// shares exactly one channel with `banned`, the complement of that channel
    /// is returned so the result never repeats `banned`'s pairing.  Returns the
    /// new colour and the consumed seed.
    pub fn switched(self, seed: u64, banned: Self) -> (Self, u64) {
        let combined = self & banned;
        if combined.is_primary() {
            return (combined ^ Self::WHITE, seed);
        }
        if self == Self::BLACK || self == Self::WHITE {
            const START: [EdgeColor; 3] = [EdgeColor::CYAN, EdgeColor::MAGENTA, EdgeColor::YELLOW];
            return (START[(seed % 3) as usize], seed / 3);
        }
        let shifted = (self.bits() as u32) << (1 + (seed & 1));
        let rotated = ((shifted | (shifted >> 3)) & Self::WHITE.bits() as u32) as u8;
        (Self::from_bits_truncate(rotated), seed >> 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_colour_depends_on_seed() {
        assert_eq!(EdgeColor::WHITE.switched(0, EdgeColor::BLACK), (EdgeColor::CYAN, 0));
        assert_eq!(EdgeColor::WHITE.switched(1, EdgeColor::BLACK), (EdgeColor::MAGENTA, 0));
        assert_eq!(EdgeColor::BLACK.switched(5, EdgeColor::BLACK), (EdgeColor::YELLOW, 1));
    }

    #[test]
    fn two_channel_colours_rotate() {
        // cyan (GB) shifted by one wraps blue around to red
        let (next, seed) = EdgeColor::CYAN.switched(0, EdgeColor::BLACK);
        assert_eq!(next, EdgeColor::MAGENTA);
        assert_eq!(seed, 0);
        let (next, _) = EdgeColor::CYAN.switched(1, EdgeColor::BLACK);
        assert_eq!(next, EdgeColor::YELLOW);
    }

    #[test]
    fn banned_overlap_uses_complement() {
        // yellow & magenta = red, so the switch jumps straight to cyan
        let (next, seed) = EdgeColor::YELLOW.switched(7, EdgeColor::MAGENTA);
        assert_eq!(next, EdgeColor::CYAN);
        assert_eq!(seed, 7);
    }

    #[test]
    fn every_switch_keeps_two_channels() {
        for start in [EdgeColor::CYAN, EdgeColor::MAGENTA, EdgeColor::YELLOW] {
            for seed in 0..8 {
                let (next, _) = start.switched(seed, EdgeColor::BLACK);
                assert_eq!(next.bits().count_ones(), 2);
                assert_ne!(next, start);
            }
        }
    }
}
