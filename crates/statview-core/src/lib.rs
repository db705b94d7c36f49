//! statview-core: decode native file-status records.
//!
//! Turns the raw bytes of an operating system's `struct stat` into a
//! platform-independent [`StatView`]. The caller performs the native status
//! call and passes the filled buffer together with a platform identifier.
//!
//! Provides:
//! - `platform` — platform identifier to layout resolution
//! - `layout` — per-ABI field schedules and decoders (`RawRecord`)
//! - `view` — `StatView`, the unified read-only accessor set
//! - `time` — `TimeValue` timestamps and their conversion to `chrono`
//! - `mode` — file-type and permission helpers for `st_mode`
//!
//! ```
//! use statview_core::{Layout, StatView};
//!
//! let buf = vec![0u8; Layout::LinuxX86_64.size()];
//! let view = StatView::decode("linux-x86-64", &buf).unwrap();
//! assert_eq!(view.size(), 0);
//! assert!(StatView::decode("plan9-mips", &buf).is_err());
//! ```

pub mod error;
pub mod layout;
pub mod mode;
pub mod platform;
pub mod time;
pub mod view;

pub use error::{DecodeError, Result, StatError};
pub use layout::{FieldRole, FieldSpec, Layout, RawRecord};
pub use mode::FileKind;
pub use platform::{host_platform, resolve, supported_platforms};
pub use time::TimeValue;
pub use view::StatView;
