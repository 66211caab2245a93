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

    src/bits.rs

    Bit field extraction for AVHRR sample words.

    Packed 10-bit data stores three samples in each 32-bit big-endian word:

         31 30 29                 20 19                 10 9                   0
        +-----+---------------------+---------------------+---------------------+
        | pad |      sample 0       |      sample 1       |      sample 2       |
        +-----+---------------------+---------------------+---------------------+
*/
use crate::types::SampleEncoding;

const SAMPLE_MASK: u32 = 0x3FF;

/// Unpack the three 10-bit samples of a packed word, left to right.
///
/// `word` is the value as it was loaded from the buffer. If `byte_order_is_little_endian` is
/// set, the word was loaded in little-endian order and is byte swapped back to the big-endian
/// wire order before the fields are extracted. The two padding bits are ignored.
#[inline]
pub fn extract_packed10(word: u32, byte_order_is_little_endian: bool) -> [u16; 3] {
    let word = if byte_order_is_little_endian {
        word.swap_bytes()
    }
    else {
        word
    };

    [
        ((word >> 20) & SAMPLE_MASK) as u16,
        ((word >> 10) & SAMPLE_MASK) as u16,
        (word & SAMPLE_MASK) as u16,
    ]
}

/// Unpack every packed word in `buffer` into `out`, three samples per word. Any trailing bytes
/// that do not form a whole word are ignored.
pub fn extract_packed10_slice(buffer: &[u8], out: &mut Vec<u16>) {
    out.reserve(buffer.len() / 4 * 3);
    for chunk in buffer.chunks_exact(4) {
        let word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        out.extend_from_slice(&extract_packed10(word, false));
    }
}

/// Copy `count` unpacked samples from the front of `buffer`, widening them to 16 bits.
///
/// 8-bit samples are widened without any byte order concerns. 16-bit samples are big-endian
/// on the wire and are converted to native order. Packed data has no fixed width, so it
/// returns an empty vector; use [`extract_packed10_slice`] instead.
///
/// The caller guarantees `buffer` holds at least `count` samples.
pub fn extract_unpacked(buffer: &[u8], encoding: SampleEncoding, count: usize) -> Vec<u16> {
    match encoding {
        SampleEncoding::Unpacked8Bit => buffer[..count].iter().map(|&b| b as u16).collect(),
        SampleEncoding::Unpacked16Bit => buffer[..count * 2]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect(),
        SampleEncoding::Packed10Bit => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(a: u16, b: u16, c: u16) -> u32 {
        ((a as u32 & SAMPLE_MASK) << 20) | ((b as u32 & SAMPLE_MASK) << 10) | (c as u32 & SAMPLE_MASK)
    }

    #[test]
    fn test_packed10_extract() {
        // Every value in every field position, with the neighbouring fields saturated.
        for v in 0..1024u16 {
            assert_eq!(extract_packed10(pack(v, 0, 0), false), [v, 0, 0]);
            assert_eq!(extract_packed10(pack(0, v, 0), false), [0, v, 0]);
            assert_eq!(extract_packed10(pack(0, 0, v), false), [0, 0, v]);
            assert_eq!(extract_packed10(pack(v, 1023, 1023), false), [v, 1023, 1023]);
            assert_eq!(extract_packed10(pack(1023, v, 1023), false), [1023, v, 1023]);
            assert_eq!(extract_packed10(pack(1023, 1023, v), false), [1023, 1023, v]);
        }
    }

    #[test]
    fn test_packed10_sweep() {
        // Stride through the 30-bit word space; 997 is prime so all three fields vary.
        for word in (0..1u32 << 30).step_by(997) {
            let expected = [(word >> 20) as u16, ((word >> 10) & SAMPLE_MASK) as u16, (word & SAMPLE_MASK) as u16];
            assert_eq!(extract_packed10(word, false), expected);
            let swapped = u32::from_le_bytes(word.to_be_bytes());
            assert_eq!(extract_packed10(swapped, true), expected);
        }
    }

    #[test]
    fn test_packed10_ignores_padding() {
        let word = pack(5, 6, 7) | 0xC000_0000;
        assert_eq!(extract_packed10(word, false), [5, 6, 7]);
    }

    #[test]
    fn test_packed10_byte_swap() {
        let word = pack(100, 200, 300);
        let little = u32::from_le_bytes(word.to_be_bytes());
        assert_eq!(extract_packed10(little, true), [100, 200, 300]);
    }

    #[test]
    fn test_packed10_slice() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&pack(1, 2, 3).to_be_bytes());
        buf.extend_from_slice(&pack(4, 5, 6).to_be_bytes());
        buf.push(0xFF);

        let mut out = Vec::new();
        extract_packed10_slice(&buf, &mut out);
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_unpacked() {
        let buf = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(extract_unpacked(&buf, SampleEncoding::Unpacked8Bit, 3), vec![1, 2, 3]);
        assert_eq!(extract_unpacked(&buf, SampleEncoding::Unpacked16Bit, 2), vec![0x0102, 0x0304]);
    }
}
