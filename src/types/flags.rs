/*
    avhrr-l1b
    https://github.com/dbalsom/avhrr-l1b

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/types/flags.rs

    The channel presence mask decoded from the TBM header.
*/

use bitflags::bitflags;

bitflags! {
    /// The set of AVHRR channels present in a data set, decoded from the channel presence
    /// bitmap of the TBM header. Bit `i` corresponds to byte `i` of the bitmap.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[rustfmt::skip]
    pub struct ChannelMask: u32 {
        #[doc = "AVHRR channel 1 (visible)"]
        const CHANNEL_1     = 0b0000_0000_0000_0001;
        #[doc = "AVHRR channel 2 (near infrared)"]
        const CHANNEL_2     = 0b0000_0000_0000_0010;
        #[doc = "AVHRR channel 3 (3A or 3B on NOAA-15 and later)"]
        const CHANNEL_3     = 0b0000_0000_0000_0100;
        #[doc = "AVHRR channel 4 (thermal infrared)"]
        const CHANNEL_4     = 0b0000_0000_0000_1000;
        #[doc = "AVHRR channel 5 (thermal infrared)"]
        const CHANNEL_5     = 0b0000_0000_0001_0000;
        #[doc = "All five AVHRR channels"]
        const ALL           = 0b0000_0000_0001_1111;
    }
}

impl ChannelMask {
    /// Number of channels (and therefore raster bands) present.
    pub fn band_count(&self) -> usize {
        self.bits().count_ones() as usize
    }

    /// Iterate over the zero-based indices of present channels, in bitmap order.
    pub fn channel_indices(&self) -> impl Iterator<Item = usize> {
        let bits = self.bits();
        (0..u32::BITS as usize).filter(move |i| bits & (1 << i) != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_count() {
        assert_eq!(ChannelMask::ALL.band_count(), 5);
        assert_eq!((ChannelMask::CHANNEL_1 | ChannelMask::CHANNEL_4).band_count(), 2);
        assert_eq!(ChannelMask::from_bits_retain(1 << 12).band_count(), 1);
    }

    #[test]
    fn test_channel_indices() {
        let mask = ChannelMask::CHANNEL_2 | ChannelMask::CHANNEL_5;
        assert_eq!(mask.channel_indices().collect::<Vec<_>>(), vec![1, 4]);
    }
}
