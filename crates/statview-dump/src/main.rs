use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

use statview_core::mode::format_mode;
use statview_core::{FileKind, Layout, RawRecord, StatView, TimeValue};

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "statview-dump",
    about = "Decode a captured native stat record",
    version
)]
struct Cli {
    /// File holding the raw record. Reads stdin when absent or `-`.
    path: Option<PathBuf>,

    /// Platform identifier of the record, e.g. linux-x86-64.
    /// Defaults to the platform this tool was built for.
    #[arg(short, long, env = "STATVIEW_PLATFORM")]
    platform: Option<String>,

    /// Reject input whose length differs from the native record size.
    #[arg(long)]
    exact: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Show every field of the native layout with its raw bytes
    #[arg(long, conflicts_with = "json")]
    fields: bool,

    /// List supported platform identifiers and exit
    #[arg(long)]
    list_platforms: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is warn level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if cli.list_platforms {
        print!("{}", render_platforms());
        return;
    }

    let Some(platform) = cli
        .platform
        .clone()
        .or_else(|| statview_core::host_platform().map(str::to_string))
    else {
        fail("no --platform given and the host platform has no known stat layout");
    };

    let buf = read_input(cli.path.as_deref()).unwrap_or_else(|e| {
        fail(&format!("error reading input: {e}"));
    });
    debug!(platform = %platform, len = buf.len(), "read raw record");

    let view = decode(&platform, &buf, cli.exact).unwrap_or_else(|e| {
        fail(&format!("error decoding record: {e}"));
    });

    if cli.json {
        let json = DumpJson::new(&platform, &view);
        match serde_json::to_string_pretty(&json) {
            Ok(s) => println!("{s}"),
            Err(e) => fail(&format!("error encoding JSON: {e}")),
        }
    } else {
        print!("{}", render_text(&platform, &view));
        if cli.fields {
            print!("{}", render_fields(view.layout(), &buf));
        }
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

/// Initializes the tracing subscriber on stderr.
/// Default level is WARN. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["statview_core", "statview_dump"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

// ── Input / decoding ─────────────────────────────────────────────────────────

fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(p) if p != Path::new("-") => fs::read(p),
        _ => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn decode(platform: &str, buf: &[u8], exact: bool) -> statview_core::Result<StatView> {
    let layout = statview_core::resolve(platform)?;
    let record = if exact {
        layout.decode_exact(buf)?
    } else {
        layout.decode(buf)?
    };
    StatView::from_record(record)
}

// ── Formatting helpers ───────────────────────────────────────────────────────

fn human_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = "KiB";
    for next in ["MiB", "GiB", "TiB"] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}

fn kind_name(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Regular => "regular file",
        FileKind::Directory => "directory",
        FileKind::Symlink => "symbolic link",
        FileKind::CharDevice => "character device",
        FileKind::BlockDevice => "block device",
        FileKind::Fifo => "fifo",
        FileKind::Socket => "socket",
        FileKind::Unknown(_) => "unknown",
    }
}

fn fmt_time(tv: TimeValue) -> String {
    if tv.is_normalized() {
        tv.to_string()
    } else {
        format!("{tv} (raw {}s {}ns)", tv.seconds(), tv.nanoseconds())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Renderers ────────────────────────────────────────────────────────────────

fn render_platforms() -> String {
    let mut out = String::new();
    for id in statview_core::supported_platforms() {
        if let Ok(layout) = statview_core::resolve(id) {
            let _ = writeln!(out, "{id:<16} {:>4} B  ({})", layout.size(), layout.name());
        }
    }
    out
}

fn render_text(platform: &str, view: &StatView) -> String {
    let layout = view.layout();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Platform: {platform} (layout {}, {} B)",
        layout.name(),
        layout.size()
    );
    let _ = writeln!(
        out,
        "Type:     {}  {} (0o{:o})",
        kind_name(view.file_kind()),
        format_mode(view.mode()),
        view.mode()
    );
    let _ = writeln!(
        out,
        "Size:     {} ({})",
        view.size(),
        human_bytes(view.size())
    );
    let _ = writeln!(out, "Uid/Gid:  {}/{}", view.user_id(), view.group_id());
    let _ = writeln!(out, "Access:   {}", fmt_time(view.access_time()));
    let _ = writeln!(out, "Modify:   {}", fmt_time(view.modification_time()));
    let _ = writeln!(out, "Change:   {}", fmt_time(view.change_time()));
    if let Some(birth) = view.birth_time() {
        let _ = writeln!(out, "Birth:    {}", fmt_time(birth));
    }
    out
}

/// Lists the layout's schedule with the bytes found at each field.
/// `buf` must be at least `layout.size()` bytes.
fn render_fields(layout: Layout, buf: &[u8]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{:>5} {:>5}  {:<18} {:<17} bytes",
        "off", "width", "field", "role"
    );
    for f in layout.fields() {
        let Some(bytes) = buf.get(f.offset..f.end()) else {
            break;
        };
        let marker = if f.is_hidden() { "*" } else { " " };
        let _ = writeln!(
            out,
            "{:>5} {:>5} {marker}{:<18} {:<17} {}",
            f.offset,
            f.width,
            f.name,
            format!("{:?}", f.role),
            hex(bytes)
        );
    }
    let _ = writeln!(out, "(* padding/reserved, not part of the unified view)");
    out
}

#[derive(Serialize)]
struct DumpJson<'a> {
    platform: &'a str,
    layout: &'static str,
    record_size: usize,
    file_kind: FileKind,
    mode_string: String,
    view: StatView,
    record: RawRecord,
}

impl<'a> DumpJson<'a> {
    fn new(platform: &'a str, view: &StatView) -> Self {
        Self {
            platform,
            layout: view.layout().name(),
            record_size: view.layout().size(),
            file_kind: view.file_kind(),
            mode_string: format_mode(view.mode()),
            view: *view,
            record: *view.raw(),
        }
    }
}
