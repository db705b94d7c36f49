//! Linux x86-64 `struct stat`.
//!
//! Source: glibc `sysdeps/unix/sysv/linux/x86/bits/struct_stat.h` and the
//! kernel's `arch/x86/include/uapi/asm/stat.h`, which agree on 64-bit.
//! Note `st_nlink` comes before `st_mode` here, unlike the generic layout.

use serde::Serialize;

use super::reader::FieldReader;
use super::{FieldRole, FieldSpec, check_len};
use crate::error::DecodeError;
use crate::time::TimeValue;

pub const NAME: &str = "linux-x86-64";

/// `sizeof(struct stat)`.
pub const SIZE: usize = 144;

pub static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("st_dev", 0, 8, FieldRole::Device),
    FieldSpec::new("st_ino", 8, 8, FieldRole::Inode),
    FieldSpec::new("st_nlink", 16, 8, FieldRole::LinkCount),
    FieldSpec::new("st_mode", 24, 4, FieldRole::Mode),
    FieldSpec::new("st_uid", 28, 4, FieldRole::UserId),
    FieldSpec::new("st_gid", 32, 4, FieldRole::GroupId),
    FieldSpec::new("__pad0", 36, 4, FieldRole::Padding),
    FieldSpec::new("st_rdev", 40, 8, FieldRole::SpecialDevice),
    FieldSpec::new("st_size", 48, 8, FieldRole::Size),
    FieldSpec::new("st_blksize", 56, 8, FieldRole::BlockSize),
    FieldSpec::new("st_blocks", 64, 8, FieldRole::BlockCount),
    FieldSpec::new("st_atim", 72, 16, FieldRole::AccessTime),
    FieldSpec::new("st_mtim", 88, 16, FieldRole::ModificationTime),
    FieldSpec::new("st_ctim", 104, 16, FieldRole::ChangeTime),
    FieldSpec::new("__glibc_reserved", 120, 24, FieldRole::Reserved),
];

/// Decoded Linux x86-64 `struct stat`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LinuxX86_64Stat {
    pub st_dev: u64,
    pub st_ino: u64,
    /// `nlink_t` is 64-bit on this ABI.
    pub st_nlink: u64,
    pub st_mode: u32,
    pub st_uid: u32,
    pub st_gid: u32,
    pub pad0: i32,
    pub st_rdev: u64,
    pub st_size: i64,
    pub st_blksize: i64,
    pub st_blocks: i64,
    pub st_atim: TimeValue,
    pub st_mtim: TimeValue,
    pub st_ctim: TimeValue,
    pub reserved: [i64; 3],
}

impl LinuxX86_64Stat {
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        check_len(NAME, SIZE, buf)?;
        let mut r = FieldReader::new(buf, FIELDS);

        let stat = LinuxX86_64Stat {
            st_dev: r.u64("st_dev")?,
            st_ino: r.u64("st_ino")?,
            st_nlink: r.u64("st_nlink")?,
            st_mode: r.u32("st_mode")?,
            st_uid: r.u32("st_uid")?,
            st_gid: r.u32("st_gid")?,
            pad0: r.i32("__pad0")?,
            st_rdev: r.u64("st_rdev")?,
            st_size: r.i64("st_size")?,
            st_blksize: r.i64("st_blksize")?,
            st_blocks: r.i64("st_blocks")?,
            st_atim: r.timespec("st_atim")?,
            st_mtim: r.timespec("st_mtim")?,
            st_ctim: r.timespec("st_ctim")?,
            reserved: r.i64_array::<3>("__glibc_reserved")?,
        };
        debug_assert_eq!(r.finish(), SIZE);

        Ok(stat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::layout::testutil::RecordBuilder;

    #[test]
    fn test_decode_all_fields() {
        let buf = RecordBuilder::new(Layout::LinuxX86_64)
            .u64("st_dev", 0x803)
            .u64("st_ino", 1_048_577)
            .u64("st_nlink", 2)
            .u32("st_mode", 0o040755)
            .u32("st_uid", 1000)
            .u32("st_gid", 100)
            .fill("__pad0", 0x7f)
            .u64("st_rdev", 0)
            .i64("st_size", 4096)
            .i64("st_blksize", 4096)
            .i64("st_blocks", 8)
            .timespec("st_atim", 1_700_000_000, 500_000_000)
            .timespec("st_mtim", 1_690_000_000, 0)
            .timespec("st_ctim", 1_690_000_000, 123)
            .fill("__glibc_reserved", 0x01)
            .build();

        let stat = LinuxX86_64Stat::decode(&buf).unwrap();
        assert_eq!(stat.st_dev, 0x803);
        assert_eq!(stat.st_ino, 1_048_577);
        assert_eq!(stat.st_nlink, 2);
        assert_eq!(stat.st_mode, 0o040755);
        assert_eq!(stat.st_uid, 1000);
        assert_eq!(stat.st_gid, 100);
        assert_eq!(stat.pad0, 0x7f7f_7f7f);
        assert_eq!(stat.st_rdev, 0);
        assert_eq!(stat.st_size, 4096);
        assert_eq!(stat.st_blksize, 4096);
        assert_eq!(stat.st_blocks, 8);
        assert_eq!(stat.st_atim, TimeValue::new(1_700_000_000, 500_000_000));
        assert_eq!(stat.st_mtim, TimeValue::new(1_690_000_000, 0));
        assert_eq!(stat.st_ctim, TimeValue::new(1_690_000_000, 123));
        assert_eq!(stat.reserved, [0x0101_0101_0101_0101; 3]);
    }

    #[test]
    fn test_uid_gid_do_not_read_padding() {
        let buf = RecordBuilder::new(Layout::LinuxX86_64)
            .u32("st_gid", 5)
            .fill("__pad0", 0xff)
            .build();
        let stat = LinuxX86_64Stat::decode(&buf).unwrap();
        assert_eq!(stat.st_gid, 5);
        assert_eq!(stat.st_rdev, 0);
        assert_eq!(stat.pad0, -1);
    }

    #[test]
    fn test_short_buffer() {
        let buf = vec![0u8; 100];
        assert_eq!(
            LinuxX86_64Stat::decode(&buf),
            Err(DecodeError::BufferTooShort {
                layout: NAME,
                expected: SIZE,
                actual: 100,
            })
        );
    }
}
