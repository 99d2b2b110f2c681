//! External tool invocation: pdflatex and diff-pdf.
//!
//! Both tools run as blocking subprocesses under a wall-clock limit; a hung
//! engine would otherwise hang the whole pipeline. Nonzero exits are fatal
//! and surface the tool's captured output verbatim.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::info;

use crate::error::{EditError, Result};
use crate::tex::params::SegmentParams;

/// Captured output of a finished tool run.
#[derive(Debug)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Writes `tex` to `out_dir/basename` and typesets it with
/// `pdflatex -interaction=nonstopmode`, running the configured number of
/// passes so cross-references converge.
pub fn run_pdflatex(
    tex: &str,
    basename: &str,
    out_dir: &Path,
    params: &SegmentParams,
) -> Result<ToolOutput> {
    std::fs::write(out_dir.join(basename), tex)?;

    let passes = params.typeset_passes.max(1);
    let mut last = run_pass(basename, out_dir, 1, passes, params)?;
    for pass in 2..=passes {
        last = run_pass(basename, out_dir, pass, passes, params)?;
    }
    Ok(last)
}

fn run_pass(
    basename: &str,
    out_dir: &Path,
    pass: u32,
    total: u32,
    params: &SegmentParams,
) -> Result<ToolOutput> {
    info!(basename, pass, total, "running pdflatex");
    let mut cmd = Command::new("pdflatex");
    cmd.arg("-interaction=nonstopmode")
        .arg(basename)
        .current_dir(out_dir);
    run_with_timeout(cmd, params.tool_timeout, "pdflatex")
}

/// Diffs two rendered PDFs page by page, grayscale, at the configured
/// resolution and per-page pixel tolerance. A nonzero exit means the
/// instrumentation visibly altered the layout and the run must not proceed.
pub fn run_diff_pdf(
    first: &str,
    second: &str,
    out_dir: &Path,
    params: &SegmentParams,
) -> Result<ToolOutput> {
    let diff_name = format!(
        "diff_{}_{}.pdf",
        Path::new(first).file_stem().unwrap_or_default().to_string_lossy(),
        Path::new(second).file_stem().unwrap_or_default().to_string_lossy(),
    );

    let mut cmd = Command::new("diff-pdf");
    cmd.arg(format!("--per-page-pixel-tolerance={}", params.pixel_tolerance))
        .arg(format!("--dpi={}", params.dpi))
        .arg("--skip-identical")
        .arg("--grayscale")
        .arg("--mark-differences")
        .arg("--verbose")
        .arg(format!("--output-diff={diff_name}"))
        .arg(first)
        .arg(second)
        .current_dir(out_dir);

    info!(first, second, diff = %diff_name, "running diff-pdf");
    let output = run_with_timeout(cmd, params.tool_timeout, "diff-pdf")?;
    info!("PDFs are identical according to diff-pdf");
    Ok(output)
}

/// Runs a command to completion under a deadline.
///
/// stdout/stderr are drained on threads so a chatty tool cannot deadlock on
/// a full pipe. On expiry the child is killed and the run fails; on nonzero
/// exit the captured output is surfaced in the error.
fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    tool: &'static str,
) -> Result<ToolOutput> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn()?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let out_handle = std::thread::spawn(move || drain(stdout));
    let err_handle = std::thread::spawn(move || drain(stderr));

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            child.kill()?;
            child.wait()?;
            return Err(EditError::ToolTimeout {
                tool,
                seconds: timeout.as_secs(),
            });
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    let stdout = out_handle.join().unwrap_or_default();
    let stderr = err_handle.join().unwrap_or_default();

    if !status.success() {
        return Err(EditError::ToolFailure {
            tool,
            status: status.code().unwrap_or(-1),
            detail: format!("{stderr}{stdout}"),
        });
    }
    Ok(ToolOutput { stdout, stderr })
}

fn drain(pipe: Option<impl Read>) -> String {
    let mut buf = String::new();
    if let Some(mut pipe) = pipe {
        // Engine logs are latin-1-ish; replace what is not UTF-8.
        let mut bytes = Vec::new();
        if pipe.read_to_end(&mut bytes).is_ok() {
            buf = String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    buf
}
