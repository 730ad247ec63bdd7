//! Bit-level I/O over byte sinks and sources.
//!
//! Bits are packed most-significant-bit first: the first bit written becomes
//! the high-order bit of its byte. The writer emits each byte as soon as it is
//! complete; the reader unpacks one source byte at a time, on demand.

use std::io::{self, Read, Write};

use bitvec::prelude::*;
use log::trace;

use crate::error::{Error, Result};

/// Packs single bits into bytes and streams them to a sink.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    /// Pending bits, left-aligned in the order they were written.
    acc: u8,
    /// Number of valid bits in `acc`, always below 8 between calls.
    filled: u8,
    bits_written: u64,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            acc: 0,
            filled: 0,
            bits_written: 0,
            bytes_written: 0,
        }
    }

    /// Append `bits` and emit every complete byte to the sink.
    ///
    /// Fewer than 8 bits remain pending afterwards.
    pub fn write(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<()> {
        let mut ready = Vec::with_capacity(bits.len() / 8 + 1);
        for bit in bits.iter().by_vals() {
            self.acc = (self.acc << 1) | u8::from(bit);
            self.filled += 1;
            if self.filled == 8 {
                ready.push(self.acc);
                self.acc = 0;
                self.filled = 0;
            }
        }
        self.bits_written += bits.len() as u64;
        self.emit(&ready)
    }

    /// Append `bits`, zero-pad to the next byte boundary and flush the sink.
    pub fn finish(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<()> {
        self.write(bits)?;
        if self.filled > 0 {
            let padding = 8 - self.filled;
            trace!("padding final byte with {} zero bits", padding);
            let byte = self.acc << padding;
            self.acc = 0;
            self.filled = 0;
            self.emit(&[byte])?;
        }
        self.inner.flush()?;
        Ok(())
    }

    /// Number of meaningful bits written so far, padding excluded.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Number of bytes handed to the sink so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Number of bits waiting for a byte to fill up.
    pub fn pending_bits(&self) -> u8 {
        self.filled
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the sink. Pending bits that were never finished are dropped.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.inner.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }
}

/// Yields bits one at a time from a byte source.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    bytes: io::Bytes<R>,
    current: u8,
    /// Bits of `current` not yet handed out.
    remaining: u8,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            bytes: inner.bytes(),
            current: 0,
            remaining: 0,
            bits_read: 0,
        }
    }

    /// Return the next bit, pulling one more byte from the source only when
    /// the current byte is used up.
    pub fn next_bit(&mut self) -> Result<bool> {
        if self.remaining == 0 {
            self.current = match self.bytes.next() {
                Some(byte) => byte?,
                None => return Err(Error::EndOfInput),
            };
            self.remaining = 8;
        }
        self.remaining -= 1;
        self.bits_read += 1;
        Ok((self.current >> self.remaining) & 1 == 1)
    }

    /// Number of bits handed out so far.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Check what follows the last bit read: true when only zero padding
    /// inside the current byte remains and the source is exhausted.
    pub fn only_padding_remains(&mut self) -> Result<bool> {
        let mask = ((1u16 << self.remaining) - 1) as u8;
        if self.current & mask != 0 {
            return Ok(false);
        }
        match self.bytes.next() {
            None => Ok(true),
            Some(byte) => {
                byte?;
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all<R: Read>(reader: &mut BitReader<R>) -> BitVec<u8, Msb0> {
        let mut out = BitVec::new();
        while let Ok(bit) = reader.next_bit() {
            out.push(bit);
        }
        out
    }

    #[test]
    fn test_write_msb_first() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write(bits![u8, Msb0; 1, 0, 1, 1, 0, 0, 0, 1]).unwrap();
        assert_eq!(writer.get_ref(), &vec![0b1011_0001]);
        assert_eq!(writer.pending_bits(), 0);
    }

    #[test]
    fn test_write_emits_complete_bytes_eagerly() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write(bits![u8, Msb0; 1, 1, 1]).unwrap();
        assert!(writer.get_ref().is_empty());
        assert_eq!(writer.pending_bits(), 3);

        writer.write(bits![u8, Msb0; 0, 0, 0, 0, 0, 1, 1]).unwrap();
        assert_eq!(writer.get_ref(), &vec![0b1110_0000]);
        assert_eq!(writer.pending_bits(), 2);
    }

    #[test]
    fn test_finish_pads_with_zeros() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write(bits![u8, Msb0; 1, 0, 1]).unwrap();
        writer.finish(bits![u8, Msb0; 1]).unwrap();
        assert_eq!(writer.bits_written(), 4);
        assert_eq!(writer.into_inner(), vec![0b1011_0000]);
    }

    #[test]
    fn test_finish_on_byte_boundary_adds_nothing() {
        let mut writer = BitWriter::new(Vec::new());
        writer.finish(bits![u8, Msb0; 0, 1, 0, 1, 0, 1, 0, 1]).unwrap();
        assert_eq!(writer.bytes_written(), 1);
        assert_eq!(writer.into_inner(), vec![0x55]);
    }

    #[test]
    fn test_finish_with_nothing_pending_writes_nothing() {
        let mut writer = BitWriter::new(Vec::new());
        writer.finish(BitSlice::<u8, Msb0>::empty()).unwrap();
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn test_reader_unpacks_msb_first() {
        let data = [0b1000_0001u8, 0xff];
        let mut reader = BitReader::new(&data[..]);
        let bits = read_all(&mut reader);
        assert_eq!(bits.len(), 16);
        assert!(bits[0]);
        assert!(!bits[1]);
        assert!(bits[7]);
        assert!(bits[8..].all());
        assert_eq!(reader.bits_read(), 16);
    }

    #[test]
    fn test_reader_end_of_input() {
        let empty: &[u8] = &[];
        let mut reader = BitReader::new(empty);
        assert!(matches!(reader.next_bit(), Err(Error::EndOfInput)));
    }

    #[test]
    fn test_write_then_read_is_prefix_with_zero_tail() {
        let original = bits![u8, Msb0; 1, 1, 0, 1, 0, 0, 1, 1, 1, 0, 1].to_bitvec();
        let mut writer = BitWriter::new(Vec::new());
        writer.write(&original[..5]).unwrap();
        writer.finish(&original[5..]).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), 2);

        let mut reader = BitReader::new(&bytes[..]);
        let back = read_all(&mut reader);
        assert_eq!(&back[..original.len()], &original[..]);
        assert!(back[original.len()..].not_any());
    }

    #[test]
    fn test_only_padding_remains() {
        let mut reader = BitReader::new(&[0b1100_0000u8][..]);
        reader.next_bit().unwrap();
        reader.next_bit().unwrap();
        assert!(reader.only_padding_remains().unwrap());

        let mut reader = BitReader::new(&[0b1100_0100u8][..]);
        reader.next_bit().unwrap();
        assert!(!reader.only_padding_remains().unwrap());

        let mut reader = BitReader::new(&[0b1000_0000u8, 0x00][..]);
        reader.next_bit().unwrap();
        assert!(!reader.only_padding_remains().unwrap());
    }
}
