use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::info;
use time::format_description::well_known::Rfc3339;
use wisebox_log::catalog::{CaptureFile, DecodedCapture, check_captures, list_captures, load_capture};
use wisebox_log::{Entry, Revision};

#[derive(Debug, Parser)]
#[command(version, about = "Read WISEBox scan log files")]
struct Args {
    /// Directory the device writes its wp* logs to
    #[arg(long, env = "WISEBOX_LOG_DIR", default_value = "logs", global = true)]
    log_dir: PathBuf,

    /// Wire layout of the logs (v1, v2 or v3); older files carry no marker
    #[arg(long, env = "WISEBOX_LOG_REVISION", default_value = "v3", global = true)]
    revision: Revision,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List captures with their start time and status
    List,
    /// Decode one capture and print its header and entries
    Show {
        /// File name inside the log directory, e.g. wp20200101120000.done
        name: String,

        /// Print the decoded capture as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Only print the first N entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Decode every capture and report the ones that fail
    Check {
        /// Number of decoding threads
        #[arg(long, short = 'j', default_value_t = 4)]
        jobs: usize,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match args.command {
        Command::List => cmd_list(&mut out, &args.log_dir)?,
        Command::Show { name, json, limit } => {
            let path = args.log_dir.join(&name);
            let Some(file) = CaptureFile::from_path(&path) else {
                bail!("{name} is not a capture name (expected wp<YYYYMMDDHHMMSS>.<status>)");
            };
            let capture = load_capture(&file, args.revision)?;
            if json {
                serde_json::to_writer_pretty(&mut out, &capture).context("encoding JSON")?;
                writeln!(out)?;
            } else {
                print_capture(&mut out, &capture, limit)?;
            }
        }
        Command::Check { jobs } => {
            let files = list_captures(&args.log_dir)?;
            let reports = check_captures(&files, args.revision, jobs);
            let mut failed = 0usize;
            for r in &reports {
                match &r.result {
                    Ok(n) => writeln!(out, "ok   {} ({} entries)", r.file.name, n)?,
                    Err(e) => {
                        failed += 1;
                        writeln!(out, "FAIL {}: {:#}", r.file.name, e)?;
                    }
                }
            }
            out.flush()?;
            info!("checked {} captures as {}, {} failed", reports.len(), args.revision, failed);
            if failed > 0 {
                bail!("{failed} of {} captures failed to decode", reports.len());
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn cmd_list<W: Write>(out: &mut W, dir: &std::path::Path) -> Result<()> {
    let files = list_captures(dir)?;
    for f in &files {
        writeln!(out, "{:<24} {} {}", f.name, f.started_at.format(&Rfc3339)?, f.status)?;
    }
    info!("{} captures in {}", files.len(), dir.display());
    Ok(())
}

fn print_capture<W: Write>(out: &mut W, c: &DecodedCapture, limit: Option<usize>) -> Result<()> {
    let h = &c.header;
    writeln!(out, "file:      {} (started {}, status {})", c.file.name, c.file.started_at.format(&Rfc3339)?, c.file.status)?;
    writeln!(out, "revision:  {}", h.revision)?;
    if let Some(v) = h.format_version {
        writeln!(out, "version:   {}", v)?;
    }
    writeln!(out, "device:    {}", h.device_mac)?;
    if let Some(ch) = h.channel {
        writeln!(out, "channel:   {}", ch)?;
    }
    writeln!(out, "interval:  {}s", h.scan_interval_seconds)?;
    writeln!(out, "timezone:  {}", h.timezone_name)?;
    writeln!(out, "metadata:  {}", h.metadata)?;
    writeln!(out, "entries:   {}", c.entries.len())?;
    writeln!(out, "---")?;
    for e in c.entries.iter().take(limit.unwrap_or(usize::MAX)) {
        writeln!(out, "{}", entry_line(e)?)?;
    }
    Ok(())
}

fn entry_line(e: &Entry) -> Result<String> {
    let ts = e.recorded_at().format(&Rfc3339)?;
    let samples = e.samples.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ");
    Ok(match e.channel_number {
        Some(ch) => format!("{ts} ch={ch:<3} n={:<4} {samples}", e.sample_count()),
        None => format!("{ts} n={:<4} {samples}", e.sample_count()),
    })
}
