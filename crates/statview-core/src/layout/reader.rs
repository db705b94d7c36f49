//! Little-endian field reader shared by the layout decoders.

use byteorder::{LittleEndian, ReadBytesExt};

use super::FieldSpec;
use crate::error::DecodeError;
use crate::time::TimeValue;

/// Reads consecutive fields from a raw record.
///
/// Every read names the field it expects. In debug builds the name, offset
/// and width are checked against the layout's schedule, so a decoder that
/// drifts from its table fails loudly in tests.
pub(crate) struct FieldReader<'a> {
    rest: &'a [u8],
    offset: usize,
    schedule: &'static [FieldSpec],
    index: usize,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(buf: &'a [u8], schedule: &'static [FieldSpec]) -> Self {
        Self {
            rest: buf,
            offset: 0,
            schedule,
            index: 0,
        }
    }

    fn advance(&mut self, field: &'static str, width: usize) {
        if cfg!(debug_assertions) {
            let spec = self.schedule.get(self.index);
            debug_assert!(spec.is_some(), "{field} read past end of schedule");
            if let Some(spec) = spec {
                debug_assert_eq!(spec.name, field, "field order");
                debug_assert_eq!(spec.offset, self.offset, "{field} offset");
                debug_assert_eq!(spec.width, width, "{field} width");
            }
        }
        self.index += 1;
        self.offset += width;
    }

    pub(crate) fn u16(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        let v = self
            .rest
            .read_u16::<LittleEndian>()
            .map_err(|_| DecodeError::Truncated { field })?;
        self.advance(field, 2);
        Ok(v)
    }

    pub(crate) fn u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let v = self
            .rest
            .read_u32::<LittleEndian>()
            .map_err(|_| DecodeError::Truncated { field })?;
        self.advance(field, 4);
        Ok(v)
    }

    pub(crate) fn i32(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        let v = self
            .rest
            .read_i32::<LittleEndian>()
            .map_err(|_| DecodeError::Truncated { field })?;
        self.advance(field, 4);
        Ok(v)
    }

    pub(crate) fn u64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        let v = self
            .rest
            .read_u64::<LittleEndian>()
            .map_err(|_| DecodeError::Truncated { field })?;
        self.advance(field, 8);
        Ok(v)
    }

    pub(crate) fn i64(&mut self, field: &'static str) -> Result<i64, DecodeError> {
        let v = self
            .rest
            .read_i64::<LittleEndian>()
            .map_err(|_| DecodeError::Truncated { field })?;
        self.advance(field, 8);
        Ok(v)
    }

    /// Reads `N` consecutive 64-bit words as one field (reserved arrays).
    pub(crate) fn i64_array<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<[i64; N], DecodeError> {
        let mut words = [0i64; N];
        self.rest
            .read_i64_into::<LittleEndian>(&mut words)
            .map_err(|_| DecodeError::Truncated { field })?;
        self.advance(field, 8 * N);
        Ok(words)
    }

    /// Reads `N` consecutive 32-bit words as one field.
    pub(crate) fn u32_array<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<[u32; N], DecodeError> {
        let mut words = [0u32; N];
        self.rest
            .read_u32_into::<LittleEndian>(&mut words)
            .map_err(|_| DecodeError::Truncated { field })?;
        self.advance(field, 4 * N);
        Ok(words)
    }

    /// Reads a `struct timespec` (`tv_sec: i64`, `tv_nsec: i64`).
    pub(crate) fn timespec(&mut self, field: &'static str) -> Result<TimeValue, DecodeError> {
        let [seconds, nanoseconds] = self.i64_array::<2>(field)?;
        Ok(TimeValue::new(seconds, nanoseconds))
    }

    /// Returns the number of bytes consumed. Debug builds also assert that
    /// the whole schedule was read.
    pub(crate) fn finish(self) -> usize {
        debug_assert_eq!(self.index, self.schedule.len(), "unread schedule fields");
        self.offset
    }
}
