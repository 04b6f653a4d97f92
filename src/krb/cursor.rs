/// Read cursor over a byte slice. All reads are little-endian.
///
/// Reads return `None` on shortfall and leave the position untouched, so the
/// reader can map the failure to whichever section it was decoding.
#[derive(Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Remaining bytes from current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Read a slice of `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        if n > self.remaining() {
            return None;
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Some(slice)
    }

    /// Read a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Some(out)
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        let [b] = self.read_array::<1>()?;
        Some(b)
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        self.read_array::<2>().map(u16::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let mut c = Cursor::new(&[0x01, 0x34, 0x12, 0xAA]);
        assert_eq!(c.read_u8(), Some(0x01));
        assert_eq!(c.read_u16(), Some(0x1234));
        assert_eq!(c.position(), 3);
        assert_eq!(c.remaining(), 1);
    }

    #[test]
    fn test_shortfall_leaves_position() {
        let mut c = Cursor::new(&[0x01]);
        assert_eq!(c.read_u16(), None);
        assert_eq!(c.position(), 0);
        assert_eq!(c.read_bytes(1), Some(&[0x01][..]));
        assert_eq!(c.read_u8(), None);
    }
}
