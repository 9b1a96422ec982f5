use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use cli::LsOptions;
use error::{ErrorReporter, LsError};
use format::{self, ColumnWidths};

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn is_self_or_parent(name: &str) -> bool {
    name == "." || name == ".."
}

/// Non-follow directory test: a symlink pointing at a directory is not a
/// directory here, so recursion never descends through symlinks and
/// symlink cycles cannot loop the traversal.
fn is_dir(path: &str) -> bool {
    match fs::symlink_metadata(path) {
        Ok(meta) => meta.is_dir(),
        Err(_) => false,
    }
}

fn entry_path(dir: &str, name: &str) -> String {
    format!("{}/{}", dir, name)
}

fn strip_trailing_slash(path: &str) -> &str {
    if path.len() > 1 && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

/// One directory's entry names, in OS order. `read_dir` omits the `.` and
/// `..` entries that readdir(3) reports, so they are put back at the head.
/// The returned list is walked up to three times per directory: the width
/// pass, the render pass, and the recursion pass.
fn scan_entries(dir: &str) -> io::Result<Vec<String>> {
    let mut names = vec![String::from("."), String::from("..")];

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    Ok(names)
}

/// Pass 1: size up the user, group, and size columns over the full entry
/// set. Hidden entries count even when they will not be rendered, so the
/// same tree aligns identically with and without -a. Entries that cannot
/// be statted contribute nothing; in long mode the render pass re-queries
/// them and reports there, so reporting here too would print two lines
/// for one bad entry. Short mode never stats again, so this pass reports.
fn column_widths(
    dir: &str,
    names: &[String],
    opts: &LsOptions,
    reporter: &mut ErrorReporter,
) -> ColumnWidths {
    let mut widths = ColumnWidths::new();

    for name in names {
        let full = entry_path(dir, name);
        match fs::symlink_metadata(&full) {
            Ok(meta) => widths.record(&meta, opts.human_readable),
            Err(e) => {
                if !opts.long_format {
                    reporter.report(&LsError::access(PathBuf::from(full), e));
                }
            }
        }
    }

    widths
}

/// Render one entry. A metadata failure abandons this line only; the rest
/// of the directory keeps going. An unreadable symlink target drops the
/// " -> target" suffix only.
fn list_file<W: Write>(
    out: &mut W,
    full_path: &str,
    name: &str,
    opts: &LsOptions,
    widths: &ColumnWidths,
    reporter: &mut ErrorReporter,
) -> io::Result<()> {
    if !opts.long_format {
        return writeln!(out, "{}", format::short_form(name));
    }

    let meta = match fs::symlink_metadata(full_path) {
        Ok(meta) => meta,
        Err(e) => {
            reporter.report(&LsError::access(PathBuf::from(full_path), e));
            return Ok(());
        }
    };

    let target = if meta.file_type().is_symlink() {
        match fs::read_link(full_path) {
            Ok(target) => Some(target.to_string_lossy().into_owned()),
            Err(e) => {
                reporter.report(&LsError::link_read(PathBuf::from(full_path), e));
                None
            }
        }
    } else {
        None
    };

    let target_ref = target.as_ref().map(|t| t.as_str());
    writeln!(out, "{}", format::long_form(&meta, name, target_ref, opts, widths))
}

fn list_dir<W: Write>(
    out: &mut W,
    dirname: &str,
    opts: &LsOptions,
    reporter: &mut ErrorReporter,
) -> io::Result<()> {
    let names = match scan_entries(dirname) {
        Ok(names) => names,
        Err(e) => {
            // Abandons this subtree; sibling paths still get listed.
            reporter.report(&LsError::dir_open(PathBuf::from(dirname), e));
            return Ok(());
        }
    };

    let dirname = strip_trailing_slash(dirname);
    let widths = column_widths(dirname, &names, opts, reporter);

    if opts.recursive {
        writeln!(out, "{}:", dirname)?;
    }

    for name in &names {
        if is_hidden(name) && !opts.show_hidden {
            continue;
        }
        let full = entry_path(dirname, name);
        list_file(out, &full, name, opts, &widths, reporter)?;
    }
    writeln!(out)?;

    if !opts.recursive {
        return Ok(());
    }

    for name in &names {
        if is_self_or_parent(name) {
            continue;
        }
        if is_hidden(name) && !opts.show_hidden {
            continue;
        }
        let full = entry_path(dirname, name);
        if is_dir(&full) {
            list_dir(out, &full, opts, reporter)?;
        }
    }

    Ok(())
}

/// List one command-line operand. Directories get the two-pass listing;
/// anything else (including a symlink to a directory) is rendered as a
/// single entry with widths computed from itself.
pub fn list_path<W: Write>(
    out: &mut W,
    path: &str,
    opts: &LsOptions,
    reporter: &mut ErrorReporter,
) -> io::Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            reporter.report(&LsError::access(PathBuf::from(path), e));
            return Ok(());
        }
    };

    if meta.is_dir() {
        list_dir(out, path, opts, reporter)
    } else {
        let widths = ColumnWidths::of_entry(&meta, opts.human_readable);
        list_file(out, path, path, opts, &widths, reporter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_names_start_with_a_dot() {
        assert!(is_hidden(".secret"));
        assert!(is_hidden("."));
        assert!(is_hidden(".."));
        assert!(!is_hidden("visible"));
        assert!(!is_hidden("dotted.name"));
    }

    #[test]
    fn pseudo_entries_are_recognized() {
        assert!(is_self_or_parent("."));
        assert!(is_self_or_parent(".."));
        assert!(!is_self_or_parent(".hidden"));
        assert!(!is_self_or_parent("..."));
    }

    #[test]
    fn one_trailing_slash_is_stripped() {
        assert_eq!(strip_trailing_slash("some/dir/"), "some/dir");
        assert_eq!(strip_trailing_slash("some/dir"), "some/dir");
        assert_eq!(strip_trailing_slash("/"), "/");
    }

    #[test]
    fn entry_paths_join_with_a_separator() {
        assert_eq!(entry_path("dir", "file"), "dir/file");
        assert_eq!(entry_path(".", "a.txt"), "./a.txt");
    }
}
