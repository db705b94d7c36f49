//! Interpretation of `st_mode` bits.
//!
//! The file-type and permission encodings are shared by every supported
//! platform, so these helpers work on the normalized `u32` mode.

use serde::Serialize;

/// Mask of the file-type bits (`S_IFMT`).
pub const S_IFMT: u32 = 0o170000;
pub const S_IFSOCK: u32 = 0o140000;
pub const S_IFLNK: u32 = 0o120000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFBLK: u32 = 0o060000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFCHR: u32 = 0o020000;
pub const S_IFIFO: u32 = 0o010000;

/// Mask of permission bits including setuid, setgid and sticky.
pub const PERMISSION_MASK: u32 = 0o7777;

/// File type encoded in the `S_IFMT` bits of a mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    CharDevice,
    BlockDevice,
    Fifo,
    Socket,
    /// Type bits that match no known file type.
    Unknown(u32),
}

impl FileKind {
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFREG => FileKind::Regular,
            S_IFDIR => FileKind::Directory,
            S_IFLNK => FileKind::Symlink,
            S_IFCHR => FileKind::CharDevice,
            S_IFBLK => FileKind::BlockDevice,
            S_IFIFO => FileKind::Fifo,
            S_IFSOCK => FileKind::Socket,
            other => FileKind::Unknown(other),
        }
    }

    /// Type letter as printed by `ls -l`.
    pub fn as_char(&self) -> char {
        match self {
            FileKind::Regular => '-',
            FileKind::Directory => 'd',
            FileKind::Symlink => 'l',
            FileKind::CharDevice => 'c',
            FileKind::BlockDevice => 'b',
            FileKind::Fifo => 'p',
            FileKind::Socket => 's',
            FileKind::Unknown(_) => '?',
        }
    }
}

/// Returns the permission bits (`mode & 0o7777`).
pub fn permission_bits(mode: u32) -> u32 {
    mode & PERMISSION_MASK
}

/// Formats a mode the way `ls -l` does, e.g. `-rw-r--r--` or `drwxrwxrwt`.
pub fn format_mode(mode: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(FileKind::from_mode(mode).as_char());

    // (read bit, write bit, exec bit, special bit, special char)
    let triads = [
        (0o400, 0o200, 0o100, 0o4000, 's'),
        (0o040, 0o020, 0o010, 0o2000, 's'),
        (0o004, 0o002, 0o001, 0o1000, 't'),
    ];

    for (r, w, x, special, ch) in triads {
        out.push(if mode & r != 0 { 'r' } else { '-' });
        out.push(if mode & w != 0 { 'w' } else { '-' });
        let exec = mode & x != 0;
        out.push(match (mode & special != 0, exec) {
            (true, true) => ch,
            (true, false) => ch.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }

    out
}
