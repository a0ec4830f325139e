//! Capture files in a log directory.
//!
//! Devices name each log `wp<YYYYMMDDHHMMSS>.<status>`: the stem carries the
//! capture start time in UTC, the extension carries the capture status
//! (for example `done` while a capture is finished, `tmp` while writing).
//! The codec never looks at names; this module does.
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::bounded;
use log::{debug, warn};
use serde::Serialize;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::codec::decode;
use crate::record::{Entry, Header, Revision};

/// File name prefix shared by every capture.
pub const CAPTURE_PREFIX: &str = "wp";

/// A capture located on disk, described by its name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureFile {
    pub path: PathBuf,
    pub name: String,
    /// Start time encoded in the file name, UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    /// File extension without the dot; empty when there is none.
    pub status: String,
}

impl CaptureFile {
    /// Describe `path` if its name follows the capture naming scheme.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        let stem = path.file_stem()?.to_str()?;
        let started_at = parse_start_time(stem.strip_prefix(CAPTURE_PREFIX)?)?;
        let status = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_string();
        Some(Self { path: path.to_path_buf(), name, started_at, status })
    }
}

fn parse_start_time(digits: &str) -> Option<OffsetDateTime> {
    let fmt = format_description!("[year][month][day][hour][minute][second]");
    PrimitiveDateTime::parse(digits, fmt).ok().map(PrimitiveDateTime::assume_utc)
}

/// A capture together with its decoded contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedCapture {
    pub file: CaptureFile,
    pub header: Header,
    pub entries: Vec<Entry>,
}

/// List the captures directly inside `dir`, oldest first.
pub fn list_captures(dir: &Path) -> Result<Vec<CaptureFile>> {
    let rd = fs::read_dir(dir).with_context(|| format!("reading log directory {}", dir.display()))?;
    let mut out = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let path = entry.path();
        let is_candidate = entry.file_name().to_str().is_some_and(|n| n.starts_with(CAPTURE_PREFIX));
        if !is_candidate {
            continue;
        }
        // follows symlinks; a dangling link is skipped, not fatal
        match fs::metadata(&path).with_context(|| format!("reading metadata of {}", path.display())) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                debug!("skipping {e:#}");
                continue;
            }
        }
        match CaptureFile::from_path(&path) {
            Some(c) => out.push(c),
            None => debug!("skipping {}: name does not encode a start time", path.display()),
        }
    }
    out.sort_by(|a, b| a.started_at.cmp(&b.started_at).then_with(|| a.name.cmp(&b.name)));
    Ok(out)
}

/// Read a capture into memory and decode it with the layout of `revision`.
pub fn load_capture(file: &CaptureFile, revision: Revision) -> Result<DecodedCapture> {
    let buf = fs::read(&file.path).with_context(|| format!("reading {}", file.path.display()))?;
    let (header, entries) =
        decode(&buf, revision).with_context(|| format!("decoding {} as {}", file.name, revision))?;
    Ok(DecodedCapture { file: file.clone(), header, entries })
}

/// Outcome of decoding one capture during [`check_captures`].
#[derive(Debug)]
pub struct CheckReport {
    pub file: CaptureFile,
    /// Entry count on success.
    pub result: Result<usize>,
}

/// Decode every capture on `jobs` worker threads. Reports come back in the
/// order of `files`.
pub fn check_captures(files: &[CaptureFile], revision: Revision, jobs: usize) -> Vec<CheckReport> {
    let jobs = jobs.clamp(1, files.len().max(1));
    let (work_tx, work_rx) = bounded::<(usize, CaptureFile)>(jobs * 2);
    let (done_tx, done_rx) = bounded::<(usize, CheckReport)>(jobs * 2);

    let mut reports: Vec<(usize, CheckReport)> = thread::scope(|s| {
        for _ in 0..jobs {
            let rx = work_rx.clone();
            let tx = done_tx.clone();
            s.spawn(move || {
                for (idx, file) in rx {
                    let result = load_capture(&file, revision).map(|c| c.entries.len());
                    if let Err(e) = &result {
                        warn!("{}: {e:#}", file.name);
                    }
                    if tx.send((idx, CheckReport { file, result })).is_err() {
                        break;
                    }
                }
            });
        }
        drop(work_rx);
        drop(done_tx);

        s.spawn(move || {
            for (idx, f) in files.iter().enumerate() {
                if work_tx.send((idx, f.clone())).is_err() {
                    break;
                }
            }
        });
        done_rx.iter().collect()
    });

    reports.sort_by_key(|(idx, _)| *idx);
    reports.into_iter().map(|(_, r)| r).collect()
}
