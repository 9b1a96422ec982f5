use std::cmp;
use std::fs;
use std::os::unix::fs::{FileTypeExt, MetadataExt};

use chrono::{Local, TimeZone};
use libc;
use users;

use cli::LsOptions;

/// Seconds in an average Gregorian year (365.2425 days). Timestamps older
/// than this, or in the future, are rendered with the year instead of the
/// time of day.
const YEAR_SECS: i64 = 31_556_952;

#[derive(Debug, Default)]
pub struct ColumnWidths {
    pub user: usize,
    pub group: usize,
    pub size: usize,
}

impl ColumnWidths {
    pub fn new() -> ColumnWidths {
        ColumnWidths::default()
    }

    /// Widen each column to fit one more entry's fields.
    pub fn record(&mut self, meta: &fs::Metadata, human_readable: bool) {
        self.user = cmp::max(self.user, user_name(meta.uid()).len());
        self.group = cmp::max(self.group, group_name(meta.gid()).len());
        self.size = cmp::max(self.size, size_string(meta.len(), human_readable).len());
    }

    pub fn of_entry(meta: &fs::Metadata, human_readable: bool) -> ColumnWidths {
        let mut widths = ColumnWidths::new();
        widths.record(meta, human_readable);
        widths
    }
}

fn file_type_str(file_type: fs::FileType) -> &'static str {
    if file_type.is_dir() {
        "d"
    } else if file_type.is_symlink() {
        "l"
    } else if file_type.is_file() {
        "-"
    } else if file_type.is_block_device() {
        "b"
    } else if file_type.is_char_device() {
        "c"
    } else if file_type.is_fifo() {
        "p"
    } else if file_type.is_socket() {
        "s"
    } else {
        "?"
    }
}

fn perm_char(mode: u32, mask: u32, ch: char) -> char {
    if mode & mask != 0 {
        ch
    } else {
        '-'
    }
}

fn perm_bits(mode: u32) -> String {
    let mut acc = String::with_capacity(9);

    acc.push(perm_char(mode, libc::S_IRUSR as u32, 'r'));
    acc.push(perm_char(mode, libc::S_IWUSR as u32, 'w'));
    acc.push(perm_char(mode, libc::S_IXUSR as u32, 'x'));
    acc.push(perm_char(mode, libc::S_IRGRP as u32, 'r'));
    acc.push(perm_char(mode, libc::S_IWGRP as u32, 'w'));
    acc.push(perm_char(mode, libc::S_IXGRP as u32, 'x'));
    acc.push(perm_char(mode, libc::S_IROTH as u32, 'r'));
    acc.push(perm_char(mode, libc::S_IWOTH as u32, 'w'));
    acc.push(perm_char(mode, libc::S_IXOTH as u32, 'x'));

    acc
}

/// The 10-character mode column: type char plus owner/group/other rwx.
pub fn permissions_string(meta: &fs::Metadata) -> String {
    let mut acc = String::with_capacity(10);

    acc.push_str(file_type_str(meta.file_type()));
    acc.push_str(&perm_bits(meta.mode()));

    acc
}

/// Exact mode is the plain byte count. Human mode divides by 1024 until the
/// value fits, then prints one fractional digit plus the unit letter; below
/// the first threshold there is no unit and no fraction.
pub fn size_string(len: u64, human_readable: bool) -> String {
    if !human_readable {
        return len.to_string();
    }

    let units = ['K', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y'];
    let mut size = len as f64;
    let mut scaled = 0;
    while size >= 1024.0 {
        size /= 1024.0;
        scaled += 1;
    }

    if scaled == 0 {
        len.to_string()
    } else {
        format!("{:.1}{}", size, units[scaled - 1])
    }
}

pub fn user_name(uid: u32) -> String {
    match users::get_user_by_uid(uid) {
        Some(user) => user.name().to_owned(),
        None => uid.to_string(),
    }
}

pub fn group_name(gid: u32) -> String {
    match users::get_group_by_gid(gid) {
        Some(group) => group.name().to_owned(),
        None => gid.to_string(),
    }
}

/// Modification time, local clock. Recent entries show the time of day,
/// everything older than about a year (or from the future) the year.
pub fn timestamp(mtime: i64) -> String {
    let dt = match Local.timestamp_opt(mtime, 0).single() {
        Some(dt) => dt,
        None => return mtime.to_string(),
    };
    let now = Local::now().timestamp();

    if mtime > now || now - mtime >= YEAR_SECS {
        dt.format("%b %e %Y").to_string()
    } else {
        dt.format("%b %e %H:%M").to_string()
    }
}

pub fn long_form(
    meta: &fs::Metadata,
    name: &str,
    link_target: Option<&str>,
    opts: &LsOptions,
    widths: &ColumnWidths,
) -> String {
    let mut line = format!(
        "{} {} {:>uw$} {:>gw$} {:>sw$} {} {}",
        permissions_string(meta),
        meta.nlink(),
        user_name(meta.uid()),
        group_name(meta.gid()),
        size_string(meta.len(), opts.human_readable),
        timestamp(meta.mtime()),
        name,
        uw = widths.user,
        gw = widths.group,
        sw = widths.size
    );

    if let Some(target) = link_target {
        line.push_str(" -> ");
        line.push_str(target);
    }

    line
}

pub fn short_form(name: &str) -> String {
    name.to_string()
}
