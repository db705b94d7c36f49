//! Linux AArch64 `struct stat`.
//!
//! Source: `include/uapi/asm-generic/stat.h` (used by arm64) and glibc
//! `sysdeps/unix/sysv/linux/generic/bits/struct_stat.h`. `st_blksize` is a
//! 32-bit `int` followed by an explicit pad word.

use serde::Serialize;

use super::reader::FieldReader;
use super::{FieldRole, FieldSpec, check_len};
use crate::error::DecodeError;
use crate::time::TimeValue;

pub const NAME: &str = "linux-aarch64";

/// `sizeof(struct stat)`.
pub const SIZE: usize = 128;

pub static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("st_dev", 0, 8, FieldRole::Device),
    FieldSpec::new("st_ino", 8, 8, FieldRole::Inode),
    FieldSpec::new("st_mode", 16, 4, FieldRole::Mode),
    FieldSpec::new("st_nlink", 20, 4, FieldRole::LinkCount),
    FieldSpec::new("st_uid", 24, 4, FieldRole::UserId),
    FieldSpec::new("st_gid", 28, 4, FieldRole::GroupId),
    FieldSpec::new("st_rdev", 32, 8, FieldRole::SpecialDevice),
    FieldSpec::new("__pad1", 40, 8, FieldRole::Padding),
    FieldSpec::new("st_size", 48, 8, FieldRole::Size),
    FieldSpec::new("st_blksize", 56, 4, FieldRole::BlockSize),
    FieldSpec::new("__pad2", 60, 4, FieldRole::Padding),
    FieldSpec::new("st_blocks", 64, 8, FieldRole::BlockCount),
    FieldSpec::new("st_atim", 72, 16, FieldRole::AccessTime),
    FieldSpec::new("st_mtim", 88, 16, FieldRole::ModificationTime),
    FieldSpec::new("st_ctim", 104, 16, FieldRole::ChangeTime),
    FieldSpec::new("__unused", 120, 8, FieldRole::Reserved),
];

/// Decoded Linux AArch64 `struct stat`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LinuxAarch64Stat {
    pub st_dev: u64,
    pub st_ino: u64,
    pub st_mode: u32,
    pub st_nlink: u32,
    pub st_uid: u32,
    pub st_gid: u32,
    pub st_rdev: u64,
    pub pad1: u64,
    pub st_size: i64,
    pub st_blksize: i32,
    pub pad2: i32,
    pub st_blocks: i64,
    pub st_atim: TimeValue,
    pub st_mtim: TimeValue,
    pub st_ctim: TimeValue,
    pub unused: [u32; 2],
}

impl LinuxAarch64Stat {
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        check_len(NAME, SIZE, buf)?;
        let mut r = FieldReader::new(buf, FIELDS);

        let stat = LinuxAarch64Stat {
            st_dev: r.u64("st_dev")?,
            st_ino: r.u64("st_ino")?,
            st_mode: r.u32("st_mode")?,
            st_nlink: r.u32("st_nlink")?,
            st_uid: r.u32("st_uid")?,
            st_gid: r.u32("st_gid")?,
            st_rdev: r.u64("st_rdev")?,
            pad1: r.u64("__pad1")?,
            st_size: r.i64("st_size")?,
            st_blksize: r.i32("st_blksize")?,
            pad2: r.i32("__pad2")?,
            st_blocks: r.i64("st_blocks")?,
            st_atim: r.timespec("st_atim")?,
            st_mtim: r.timespec("st_mtim")?,
            st_ctim: r.timespec("st_ctim")?,
            unused: r.u32_array::<2>("__unused")?,
        };
        debug_assert_eq!(r.finish(), SIZE);

        Ok(stat)
    }
}
