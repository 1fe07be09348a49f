//! Append-only binary writer with amortized-doubling growth.

/// A binary buffer writer that grows automatically as needed.
///
/// All multi-byte integers and floats are written big-endian. Growth at least
/// doubles the allocation, so a sequence of appends costs amortized O(1) per
/// byte.
///
/// # Example
///
/// ```
/// use msgpackpp_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u8u16(0xcd, 0x0203);
/// let data = writer.flush();
/// assert_eq!(data, [0x01, 0xcd, 0x02, 0x03]);
/// ```
#[derive(Debug)]
pub struct Writer {
    /// Bytes written since the last flush.
    uint8: Vec<u8>,
    /// Allocation size used when the buffer is first grown.
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default allocation size (256 bytes).
    pub fn new() -> Self {
        Self::with_alloc_size(256)
    }

    /// Creates a new writer with a custom allocation size.
    ///
    /// Nothing is allocated until the first write.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: Vec::new(),
            alloc_size: alloc_size.max(1),
        }
    }

    /// Number of bytes written since the last flush.
    #[inline]
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    /// Returns `true` if nothing was written since the last flush.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Current allocation of the underlying storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.uint8.capacity()
    }

    /// Ensures at least `capacity` more bytes can be appended without
    /// reallocating.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let len = self.uint8.len();
        let remaining = self.uint8.capacity() - len;
        if remaining >= capacity {
            return;
        }
        let required = len + capacity;
        let new_size = required
            .max(self.uint8.capacity().saturating_mul(2))
            .max(self.alloc_size);
        self.uint8.reserve_exact(new_size - len);
    }

    /// Drops everything written since the last flush.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Hands the written bytes to the caller and leaves the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.uint8.push(val);
    }

    /// Writes a signed 8-bit integer.
    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.u8(val as u8);
    }

    /// Writes a u8 followed by a u8.
    pub fn u8u8(&mut self, u8_val: u8, val: u8) {
        self.ensure_capacity(2);
        self.uint8.push(u8_val);
        self.uint8.push(val);
    }

    /// Writes a u8 followed by a u16 (big-endian).
    pub fn u8u16(&mut self, u8_val: u8, u16_val: u16) {
        self.ensure_capacity(3);
        self.uint8.push(u8_val);
        self.uint8.extend_from_slice(&u16_val.to_be_bytes());
    }

    /// Writes a u8 followed by a u32 (big-endian).
    pub fn u8u32(&mut self, u8_val: u8, u32_val: u32) {
        self.ensure_capacity(5);
        self.uint8.push(u8_val);
        self.uint8.extend_from_slice(&u32_val.to_be_bytes());
    }

    /// Writes a u8 followed by a u64 (big-endian).
    pub fn u8u64(&mut self, u8_val: u8, u64_val: u64) {
        self.ensure_capacity(9);
        self.uint8.push(u8_val);
        self.uint8.extend_from_slice(&u64_val.to_be_bytes());
    }

    /// Writes a u8 followed by an f64 (big-endian).
    pub fn u8f64(&mut self, u8_val: u8, f64_val: f64) {
        self.u8u64(u8_val, f64_val.to_bits());
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        self.ensure_capacity(buf.len());
        self.uint8.extend_from_slice(buf);
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        let bytes = s.as_bytes();
        self.buf(bytes);
        bytes.len()
    }
}
