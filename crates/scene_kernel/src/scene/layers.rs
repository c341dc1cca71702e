//! Layer membership mask
//!
//! A node is a member of up to 32 layers. Cameras only render nodes that share
//! at least one layer with them.

use bitflags::bitflags;

bitflags! {
    /// 32-channel membership mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Layers: u32 {
        /// Channel 0, the layer every node starts in
        const DEFAULT = 1;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Layers {
    /// Number of available channels
    pub const CHANNELS: u32 = 32;

    fn channel_bit(channel: u32) -> u32 {
        assert!(channel < Self::CHANNELS, "Layer channel out of range: {}", channel);
        1 << channel
    }

    /// Make this mask contain only `channel`
    pub fn set_channel(&mut self, channel: u32) {
        *self = Self::from_bits_retain(Self::channel_bit(channel));
    }

    /// Add `channel` to the mask
    pub fn enable_channel(&mut self, channel: u32) {
        *self = Self::from_bits_retain(self.bits() | Self::channel_bit(channel));
    }

    /// Flip membership of `channel`
    pub fn toggle_channel(&mut self, channel: u32) {
        *self = Self::from_bits_retain(self.bits() ^ Self::channel_bit(channel));
    }

    /// Remove `channel` from the mask
    pub fn disable_channel(&mut self, channel: u32) {
        *self = Self::from_bits_retain(self.bits() & !Self::channel_bit(channel));
    }

    /// Whether `channel` is enabled
    pub fn has_channel(&self, channel: u32) -> bool {
        self.bits() & Self::channel_bit(channel) != 0
    }

    /// True when the two masks share a channel
    pub fn test(&self, other: &Self) -> bool {
        self.bits() & other.bits() != 0
    }
}
