//! macOS `struct stat` (64-bit inode variant, `_DARWIN_FEATURE_64_BIT_INODE`).
//!
//! Source: `<sys/stat.h>`, `__DARWIN_STRUCT_STAT64`. Intel and Apple Silicon
//! share this layout. `st_rdev` ends at byte 28 and the first `timespec` is
//! 8-byte aligned, so the compiler inserts a 4-byte hole that has no name in
//! the header; it is kept here as `__pad0`.

use serde::Serialize;

use super::reader::FieldReader;
use super::{FieldRole, FieldSpec, check_len};
use crate::error::DecodeError;
use crate::time::TimeValue;

pub const NAME: &str = "darwin";

/// `sizeof(struct stat)`.
pub const SIZE: usize = 144;

pub static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("st_dev", 0, 4, FieldRole::Device),
    FieldSpec::new("st_mode", 4, 2, FieldRole::Mode),
    FieldSpec::new("st_nlink", 6, 2, FieldRole::LinkCount),
    FieldSpec::new("st_ino", 8, 8, FieldRole::Inode),
    FieldSpec::new("st_uid", 16, 4, FieldRole::UserId),
    FieldSpec::new("st_gid", 20, 4, FieldRole::GroupId),
    FieldSpec::new("st_rdev", 24, 4, FieldRole::SpecialDevice),
    FieldSpec::new("__pad0", 28, 4, FieldRole::Padding),
    FieldSpec::new("st_atimespec", 32, 16, FieldRole::AccessTime),
    FieldSpec::new("st_mtimespec", 48, 16, FieldRole::ModificationTime),
    FieldSpec::new("st_ctimespec", 64, 16, FieldRole::ChangeTime),
    FieldSpec::new("st_birthtimespec", 80, 16, FieldRole::BirthTime),
    FieldSpec::new("st_size", 96, 8, FieldRole::Size),
    FieldSpec::new("st_blocks", 104, 8, FieldRole::BlockCount),
    FieldSpec::new("st_blksize", 112, 4, FieldRole::BlockSize),
    FieldSpec::new("st_flags", 116, 4, FieldRole::Flags),
    FieldSpec::new("st_gen", 120, 4, FieldRole::Generation),
    FieldSpec::new("st_lspare", 124, 4, FieldRole::Reserved),
    FieldSpec::new("st_qspare", 128, 16, FieldRole::Reserved),
];

/// Decoded Darwin `struct stat`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DarwinStat {
    /// `dev_t` (int32).
    pub st_dev: i32,
    /// `mode_t` (uint16).
    pub st_mode: u16,
    /// `nlink_t` (uint16).
    pub st_nlink: u16,
    pub st_ino: u64,
    pub st_uid: u32,
    pub st_gid: u32,
    pub st_rdev: i32,
    pub pad0: u32,
    pub st_atimespec: TimeValue,
    pub st_mtimespec: TimeValue,
    pub st_ctimespec: TimeValue,
    pub st_birthtimespec: TimeValue,
    pub st_size: i64,
    pub st_blocks: i64,
    pub st_blksize: i32,
    /// User-defined flags (`chflags(2)`).
    pub st_flags: u32,
    /// File generation number.
    pub st_gen: u32,
    pub st_lspare: i32,
    pub st_qspare: [i64; 2],
}

impl DarwinStat {
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        check_len(NAME, SIZE, buf)?;
        let mut r = FieldReader::new(buf, FIELDS);

        let stat = DarwinStat {
            st_dev: r.i32("st_dev")?,
            st_mode: r.u16("st_mode")?,
            st_nlink: r.u16("st_nlink")?,
            st_ino: r.u64("st_ino")?,
            st_uid: r.u32("st_uid")?,
            st_gid: r.u32("st_gid")?,
            st_rdev: r.i32("st_rdev")?,
            pad0: r.u32("__pad0")?,
            st_atimespec: r.timespec("st_atimespec")?,
            st_mtimespec: r.timespec("st_mtimespec")?,
            st_ctimespec: r.timespec("st_ctimespec")?,
            st_birthtimespec: r.timespec("st_birthtimespec")?,
            st_size: r.i64("st_size")?,
            st_blocks: r.i64("st_blocks")?,
            st_blksize: r.i32("st_blksize")?,
            st_flags: r.u32("st_flags")?,
            st_gen: r.u32("st_gen")?,
            st_lspare: r.i32("st_lspare")?,
            st_qspare: r.i64_array::<2>("st_qspare")?,
        };
        debug_assert_eq!(r.finish(), SIZE);

        Ok(stat)
    }
}
