//! Platform-independent view over a decoded status record.

use serde::Serialize;
use tracing::warn;

use crate::error::{DecodeError, Result};
use crate::layout::{Layout, RawRecord};
use crate::mode::{self, FileKind};
use crate::platform;
use crate::time::TimeValue;

/// Read-only file status, identical in shape on every platform.
///
/// Built once from a decoded [`RawRecord`]; there are no setters. The
/// record stays available through [`StatView::raw`] for platform-specific
/// fields (inode, device, Darwin birth time, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StatView {
    access_time: TimeValue,
    change_time: TimeValue,
    modification_time: TimeValue,
    size: u64,
    user_id: u32,
    group_id: u32,
    mode: u32,
    #[serde(skip)]
    raw: RawRecord,
}

impl StatView {
    /// Resolves `platform`, decodes `buf` with its layout and builds the view.
    ///
    /// # Arguments
    /// * `platform` - Platform identifier, e.g. `"linux-x86-64"`
    /// * `buf` - Raw record as filled by the native `stat` call
    pub fn decode(platform: &str, buf: &[u8]) -> Result<Self> {
        let layout = platform::resolve(platform)?;
        Self::from_record(layout.decode(buf)?)
    }

    /// Builds the view from an already decoded record.
    pub fn from_record(raw: RawRecord) -> Result<Self> {
        let size = u64::try_from(raw.size()).map_err(|_| DecodeError::InvalidField {
            field: "st_size",
            reason: format!("negative size {}", raw.size()),
        })?;

        let view = StatView {
            access_time: raw.access_time(),
            change_time: raw.change_time(),
            modification_time: raw.modification_time(),
            size,
            user_id: raw.uid(),
            group_id: raw.gid(),
            mode: raw.mode(),
            raw,
        };

        for (field, tv) in [
            ("atime", view.access_time),
            ("ctime", view.change_time),
            ("mtime", view.modification_time),
        ] {
            if !tv.is_normalized() {
                warn!(
                    layout = raw.layout().name(),
                    field,
                    seconds = tv.seconds(),
                    nanoseconds = tv.nanoseconds(),
                    "timestamp nanoseconds out of range"
                );
            }
        }

        Ok(view)
    }

    /// Last access time (`st_atime`).
    pub fn access_time(&self) -> TimeValue {
        self.access_time
    }

    /// Last status change time (`st_ctime`).
    pub fn change_time(&self) -> TimeValue {
        self.change_time
    }

    /// Last modification time (`st_mtime`).
    pub fn modification_time(&self) -> TimeValue {
        self.modification_time
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn user_id(&self) -> u32 {
        self.user_id
    }

    pub fn group_id(&self) -> u32 {
        self.group_id
    }

    /// File type and permission bits, widened to 32 bits whatever the
    /// native storage width.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn file_kind(&self) -> FileKind {
        FileKind::from_mode(self.mode)
    }

    /// Permission bits including setuid, setgid and sticky.
    pub fn permissions(&self) -> u32 {
        mode::permission_bits(self.mode)
    }

    /// Creation time where the platform records one (Darwin).
    pub fn birth_time(&self) -> Option<TimeValue> {
        self.raw.birth_time()
    }

    pub fn layout(&self) -> Layout {
        self.raw.layout()
    }

    /// The full native record, padding included.
    pub fn raw(&self) -> &RawRecord {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatError;
    use crate::layout::testutil::RecordBuilder;

    fn darwin_buf() -> Vec<u8> {
        RecordBuilder::new(Layout::Darwin)
            .u16("st_mode", 0o100644)
            .u32("st_uid", 501)
            .u32("st_gid", 20)
            .timespec("st_atimespec", 1_700_000_000, 500_000_000)
            .timespec("st_mtimespec", 1_699_999_000, 0)
            .timespec("st_ctimespec", 1_699_999_500, 42)
            .timespec("st_birthtimespec", 1_600_000_000, 0)
            .i64("st_size", 1_234_567)
            .build()
    }

    fn linux_x86_64_buf() -> Vec<u8> {
        RecordBuilder::new(Layout::LinuxX86_64)
            .u32("st_mode", 0o100644)
            .u32("st_uid", 501)
            .u32("st_gid", 20)
            .fill("__pad0", 0xff)
            .timespec("st_atim", 1_700_000_000, 500_000_000)
            .timespec("st_mtim", 1_699_999_000, 0)
            .timespec("st_ctim", 1_699_999_500, 42)
            .i64("st_size", 1_234_567)
            .build()
    }

    fn linux_aarch64_buf() -> Vec<u8> {
        RecordBuilder::new(Layout::LinuxAarch64)
            .u32("st_mode", 0o100644)
            .u32("st_uid", 501)
            .u32("st_gid", 20)
            .fill("__pad1", 0xff)
            .fill("__pad2", 0xff)
            .timespec("st_atim", 1_700_000_000, 500_000_000)
            .timespec("st_mtim", 1_699_999_000, 0)
            .timespec("st_ctim", 1_699_999_500, 42)
            .i64("st_size", 1_234_567)
            .build()
    }

    fn assert_common(view: &StatView) {
        assert_eq!(
            view.access_time(),
            TimeValue::new(1_700_000_000, 500_000_000)
        );
        assert_eq!(view.modification_time(), TimeValue::new(1_699_999_000, 0));
        assert_eq!(view.change_time(), TimeValue::new(1_699_999_500, 42));
        assert_eq!(view.size(), 1_234_567);
        assert_eq!(view.user_id(), 501);
        assert_eq!(view.group_id(), 20);
        assert_eq!(view.mode(), 33188);
        assert_eq!(view.file_kind(), FileKind::Regular);
        assert_eq!(view.permissions(), 0o644);
    }

    #[test]
    fn test_same_values_on_every_platform() {
        let darwin = StatView::decode("darwin", &darwin_buf()).unwrap();
        let x86 = StatView::decode("linux-x86-64", &linux_x86_64_buf()).unwrap();
        let arm = StatView::decode("linux-aarch64", &linux_aarch64_buf()).unwrap();

        for view in [&darwin, &x86, &arm] {
            assert_common(view);
        }
        assert_eq!(darwin.layout(), Layout::Darwin);
        assert_eq!(x86.layout(), Layout::LinuxX86_64);
        assert_eq!(arm.layout(), Layout::LinuxAarch64);
        assert_eq!(darwin.birth_time(), Some(TimeValue::new(1_600_000_000, 0)));
        assert_eq!(x86.birth_time(), None);
        assert!(matches!(x86.raw(), RawRecord::LinuxX86_64(s) if s.pad0 == -1));
    }

    #[test]
    fn test_mode_33188_on_narrow_and_wide_fields() {
        let narrow = RecordBuilder::new(Layout::Darwin)
            .u16("st_mode", 33188)
            .build();
        let wide = RecordBuilder::new(Layout::LinuxX86_64)
            .u32("st_mode", 33188)
            .build();

        let narrow = StatView::decode("darwin", &narrow).unwrap();
        let wide = StatView::decode("linux-x86-64", &wide).unwrap();
        assert_eq!(narrow.mode(), 33188);
        assert_eq!(wide.mode(), 33188);
        assert_eq!(narrow.mode(), wide.mode());
    }

    #[test]
    fn test_unsupported_platform_builds_nothing() {
        let err = StatView::decode("win32-x86-64", &linux_x86_64_buf()).unwrap_err();
        assert_eq!(err, StatError::UnsupportedPlatform("win32-x86-64".into()));
    }

    #[test]
    fn test_short_buffer_builds_nothing() {
        let buf = linux_x86_64_buf();
        let err = StatView::decode("linux-x86-64", &buf[..143]).unwrap_err();
        assert_eq!(
            err,
            StatError::Decode(DecodeError::BufferTooShort {
                layout: "linux-x86-64",
                expected: 144,
                actual: 143,
            })
        );
        assert!(StatView::decode("darwin", &[]).is_err());
    }

    #[test]
    fn test_negative_size_is_rejected() {
        let buf = RecordBuilder::new(Layout::LinuxAarch64)
            .i64("st_size", -1)
            .build();
        let err = StatView::decode("linux-aarch64", &buf).unwrap_err();
        assert!(matches!(
            err,
            StatError::Decode(DecodeError::InvalidField {
                field: "st_size",
                ..
            })
        ));
    }

    #[test]
    fn test_unnormalized_nanoseconds_are_kept() {
        let buf = RecordBuilder::new(Layout::LinuxX86_64)
            .timespec("st_mtim", 10, 2_000_000_000)
            .build();
        let view = StatView::decode("linux-x86-64", &buf).unwrap();
        assert_eq!(view.modification_time(), TimeValue::new(10, 2_000_000_000));
        assert_eq!(
            view.modification_time().to_datetime().unwrap().timestamp(),
            12
        );
    }

    #[test]
    fn test_full_width_ids_and_size() {
        let buf = RecordBuilder::new(Layout::LinuxX86_64)
            .u32("st_uid", u32::MAX)
            .u32("st_gid", 65534)
            .i64("st_size", i64::MAX)
            .build();
        let view = StatView::decode("linux-x86-64", &buf).unwrap();
        assert_eq!(view.user_id(), u32::MAX);
        assert_eq!(view.group_id(), 65534);
        assert_eq!(view.size(), i64::MAX as u64);
    }

    #[test]
    fn test_serialize_unified_fields() {
        let view = StatView::decode("darwin", &darwin_buf()).unwrap();
        let json = serde_json::to_value(view).unwrap();

        assert_eq!(json["size"], 1_234_567);
        assert_eq!(json["user_id"], 501);
        assert_eq!(json["mode"], 33188);
        assert_eq!(json["access_time"]["seconds"], 1_700_000_000);
        assert_eq!(json["access_time"]["nanoseconds"], 500_000_000);
        assert!(json.get("raw").is_none());
    }

    #[test]
    fn test_view_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StatView>();
        assert_send_sync::<RawRecord>();

        let view = StatView::decode("darwin", &darwin_buf()).unwrap();
        let view = std::sync::Arc::new(view);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let view = view.clone();
                std::thread::spawn(move || view.size())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 1_234_567);
        }
    }

    #[cfg(any(
        target_os = "macos",
        all(
            target_os = "linux",
            any(target_arch = "x86_64", target_arch = "aarch64")
        )
    ))]
    #[test]
    fn test_decodes_host_stat_record() {
        use std::ffi::CString;
        use std::io::Write;
        use std::mem::MaybeUninit;
        use std::os::unix::ffi::OsStrExt;
        use std::os::unix::fs::MetadataExt;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"statview host record").unwrap();
        file.flush().unwrap();
        let path = CString::new(file.path().as_os_str().as_bytes()).unwrap();

        let mut st = MaybeUninit::<libc::stat>::zeroed();
        let rc = unsafe { libc::stat(path.as_ptr(), st.as_mut_ptr()) };
        assert_eq!(rc, 0);
        let bytes =
            unsafe { std::slice::from_raw_parts(st.as_ptr().cast::<u8>(), size_of::<libc::stat>()) };

        let platform = platform::host_platform().unwrap();
        assert_eq!(bytes.len(), platform::resolve(platform).unwrap().size());

        let view = StatView::decode(platform, bytes).unwrap();
        let meta = std::fs::metadata(file.path()).unwrap();
        assert_eq!(view.size(), 20);
        assert_eq!(view.size(), meta.size());
        assert_eq!(view.user_id(), meta.uid());
        assert_eq!(view.group_id(), meta.gid());
        assert_eq!(view.mode(), meta.mode());
        assert_eq!(view.file_kind(), FileKind::Regular);
        assert_eq!(
            view.modification_time(),
            TimeValue::new(meta.mtime(), meta.mtime_nsec())
        );
        assert_eq!(
            view.change_time(),
            TimeValue::new(meta.ctime(), meta.ctime_nsec())
        );
    }
}
