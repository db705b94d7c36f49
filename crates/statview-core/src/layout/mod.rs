//! Native `struct stat` layouts.
//!
//! Each supported platform/ABI has a module that declares the exact field
//! schedule of its status record (name, offset, width, role) and a decoder
//! that reads a raw buffer strictly by that schedule. Padding and reserved
//! words are decoded and kept on the record so every following offset stays
//! correct, but they never reach [`StatView`](crate::StatView).
//!
//! ```text
//!   platform id ──► Layout ──► decode(&[u8]) ──► RawRecord ──► StatView
//! ```

pub mod darwin;
pub mod linux_aarch64;
pub mod linux_x86_64;
mod reader;

use serde::Serialize;
use tracing::debug;

pub use darwin::DarwinStat;
pub use linux_aarch64::LinuxAarch64Stat;
pub use linux_x86_64::LinuxX86_64Stat;

use crate::error::DecodeError;
use crate::time::TimeValue;

/// Meaning of a field within a native record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FieldRole {
    Device,
    Inode,
    LinkCount,
    Mode,
    UserId,
    GroupId,
    SpecialDevice,
    Size,
    BlockSize,
    BlockCount,
    AccessTime,
    ModificationTime,
    ChangeTime,
    BirthTime,
    Flags,
    Generation,
    /// Alignment or ABI padding.
    Padding,
    /// Spare words reserved by the ABI.
    Reserved,
}

/// One entry of a layout's field schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Byte offset from the start of the record.
    pub offset: usize,
    /// Width in bytes. Timestamps are 16 (`tv_sec` + `tv_nsec`).
    pub width: usize,
    pub role: FieldRole,
}

impl FieldSpec {
    pub const fn new(name: &'static str, offset: usize, width: usize, role: FieldRole) -> Self {
        Self {
            name,
            offset,
            width,
            role,
        }
    }

    /// Offset one past the last byte of the field.
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    /// Returns `true` for padding and reserved words.
    pub fn is_hidden(&self) -> bool {
        matches!(self.role, FieldRole::Padding | FieldRole::Reserved)
    }
}

/// A supported native status-record layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Layout {
    /// macOS, 64-bit inode `struct stat` (x86-64 and arm64 share it).
    Darwin,
    /// Linux on x86-64 (glibc / kernel `struct stat`).
    LinuxX86_64,
    /// Linux on AArch64 (asm-generic `struct stat`).
    LinuxAarch64,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Darwin, Layout::LinuxX86_64, Layout::LinuxAarch64];

    /// Canonical platform identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Darwin => darwin::NAME,
            Layout::LinuxX86_64 => linux_x86_64::NAME,
            Layout::LinuxAarch64 => linux_aarch64::NAME,
        }
    }

    /// Size of the native record in bytes.
    pub fn size(&self) -> usize {
        match self {
            Layout::Darwin => darwin::SIZE,
            Layout::LinuxX86_64 => linux_x86_64::SIZE,
            Layout::LinuxAarch64 => linux_aarch64::SIZE,
        }
    }

    /// Ordered field schedule, padding included.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Layout::Darwin => darwin::FIELDS,
            Layout::LinuxX86_64 => linux_x86_64::FIELDS,
            Layout::LinuxAarch64 => linux_aarch64::FIELDS,
        }
    }

    /// Looks up a field of the schedule by its native name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Decodes a raw record.
    ///
    /// The buffer must hold at least [`Layout::size`] bytes. Anything past
    /// the record is ignored.
    pub fn decode(&self, buf: &[u8]) -> Result<RawRecord, DecodeError> {
        let record = match self {
            Layout::Darwin => RawRecord::Darwin(DarwinStat::decode(buf)?),
            Layout::LinuxX86_64 => RawRecord::LinuxX86_64(LinuxX86_64Stat::decode(buf)?),
            Layout::LinuxAarch64 => RawRecord::LinuxAarch64(LinuxAarch64Stat::decode(buf)?),
        };

        if buf.len() > self.size() {
            debug!(
                layout = self.name(),
                trailing = buf.len() - self.size(),
                "ignoring bytes past end of record"
            );
        }
        debug!(layout = self.name(), len = buf.len(), "decoded stat record");

        Ok(record)
    }

    /// Decodes a raw record whose length must equal [`Layout::size`].
    pub fn decode_exact(&self, buf: &[u8]) -> Result<RawRecord, DecodeError> {
        if buf.len() != self.size() {
            return Err(DecodeError::LengthMismatch {
                layout: self.name(),
                expected: self.size(),
                actual: buf.len(),
            });
        }
        self.decode(buf)
    }
}

/// Checks that `buf` can hold a record of `size` bytes.
fn check_len(layout: &'static str, size: usize, buf: &[u8]) -> Result<(), DecodeError> {
    if buf.len() < size {
        return Err(DecodeError::BufferTooShort {
            layout,
            expected: size,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// A decoded native record, one variant per layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RawRecord {
    Darwin(DarwinStat),
    LinuxX86_64(LinuxX86_64Stat),
    LinuxAarch64(LinuxAarch64Stat),
}

impl RawRecord {
    pub fn layout(&self) -> Layout {
        match self {
            RawRecord::Darwin(_) => Layout::Darwin,
            RawRecord::LinuxX86_64(_) => Layout::LinuxX86_64,
            RawRecord::LinuxAarch64(_) => Layout::LinuxAarch64,
        }
    }

    /// `st_mode` widened to 32 bits.
    pub fn mode(&self) -> u32 {
        match self {
            RawRecord::Darwin(s) => u32::from(s.st_mode),
            RawRecord::LinuxX86_64(s) => s.st_mode,
            RawRecord::LinuxAarch64(s) => s.st_mode,
        }
    }

    pub fn uid(&self) -> u32 {
        match self {
            RawRecord::Darwin(s) => s.st_uid,
            RawRecord::LinuxX86_64(s) => s.st_uid,
            RawRecord::LinuxAarch64(s) => s.st_uid,
        }
    }

    pub fn gid(&self) -> u32 {
        match self {
            RawRecord::Darwin(s) => s.st_gid,
            RawRecord::LinuxX86_64(s) => s.st_gid,
            RawRecord::LinuxAarch64(s) => s.st_gid,
        }
    }

    /// `st_size` as stored (`off_t`, signed).
    pub fn size(&self) -> i64 {
        match self {
            RawRecord::Darwin(s) => s.st_size,
            RawRecord::LinuxX86_64(s) => s.st_size,
            RawRecord::LinuxAarch64(s) => s.st_size,
        }
    }

    pub fn access_time(&self) -> TimeValue {
        match self {
            RawRecord::Darwin(s) => s.st_atimespec,
            RawRecord::LinuxX86_64(s) => s.st_atim,
            RawRecord::LinuxAarch64(s) => s.st_atim,
        }
    }

    pub fn modification_time(&self) -> TimeValue {
        match self {
            RawRecord::Darwin(s) => s.st_mtimespec,
            RawRecord::LinuxX86_64(s) => s.st_mtim,
            RawRecord::LinuxAarch64(s) => s.st_mtim,
        }
    }

    pub fn change_time(&self) -> TimeValue {
        match self {
            RawRecord::Darwin(s) => s.st_ctimespec,
            RawRecord::LinuxX86_64(s) => s.st_ctim,
            RawRecord::LinuxAarch64(s) => s.st_ctim,
        }
    }

    /// Creation time, only recorded by Darwin.
    pub fn birth_time(&self) -> Option<TimeValue> {
        match self {
            RawRecord::Darwin(s) => Some(s.st_birthtimespec),
            RawRecord::LinuxX86_64(_) | RawRecord::LinuxAarch64(_) => None,
        }
    }
}
