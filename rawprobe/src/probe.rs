//! Contains the [`Probe`]: open a file, write to it and stat it, all through
//! raw system calls, and report what the kernel returned for each step.

use std::{
    ffi::{
        CStr,
        CString,
    },
    fmt,
    io::Write,
    os::unix::ffi::OsStrExt,
    path::PathBuf,
};

use thiserror::Error;

use crate::{
    kernel::{
        fd::FileHandle,
        linux::{
            sys_fstat,
            sys_open,
            sys_write,
        },
        structs::Stat,
    },
    raw::{
        Errno,
        RawResult,
    },
    Logger,
};

pub const DEFAULT_PATH: &str = "/tmp/test.txt";
pub const DEFAULT_PAYLOAD: &[u8] = b"Hello world";
pub const DEFAULT_MODE: u32 = 0o644;

/// Create if absent, open for reading and writing. Neither truncates nor appends.
pub const OPEN_FLAGS: i32 = libc::O_CREAT | libc::O_RDWR;

/// The steps of a probe in the order they are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Open,
    Write,
    Fstat,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Open => write!(f, "opening"),
            Step::Write => write!(f, "writing to"),
            Step::Fstat => write!(f, "stating"),
        }
    }
}

impl Step {
    /// Short name of the syscall behind the step
    pub fn name(&self) -> &'static str {
        match self {
            Step::Open => "open",
            Step::Write => "write",
            Step::Fstat => "fstat",
        }
    }
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Failed {step} the file: {errno}")]
    StepFailed {
        step: Step,
        errno: Errno,
    },

    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}

/// The ProbeBuilder configures a [`Probe`].
/// Use the [`Probe::builder`] method to create this builder.
pub struct ProbeBuilder {
    path: PathBuf,
    payload: Vec<u8>,
    mode: u32,
    continue_on_error: bool,
    leak_handle: bool,
}

impl ProbeBuilder {
    /// The file to create or open (default: `/tmp/test.txt`)
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }

    /// The bytes to write into the file (default: `Hello world`)
    pub fn payload<B: Into<Vec<u8>>>(mut self, payload: B) -> Self {
        self.payload = payload.into();
        self
    }

    /// Permission bits used if the file gets created (default: `0o644`)
    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// If this is set to true, a failing step or an unwritable report line gets reported
    /// and the probe carries on with the next step. Otherwise [`Probe::run`] stops at the
    /// first failure and returns [`ProbeError::StepFailed`] or [`ProbeError::IOError`]
    /// (default: `true`)
    pub fn continue_on_error(mut self, flag: bool) -> Self {
        self.continue_on_error = flag;
        self
    }

    /// If this is set to true, the file descriptor stays open until the process exits.
    /// Otherwise it is closed when the probe is done (default: `true`)
    pub fn leak_handle(mut self, flag: bool) -> Self {
        self.leak_handle = flag;
        self
    }

    /// Create the [`Probe`]
    pub fn build(self) -> Result<Probe, ProbeError> {
        let display_path = self.path.display().to_string();
        let path = CString::new(self.path.as_os_str().as_bytes()).map_err(|_| ProbeError::InvalidPath(display_path.clone()))?;

        Ok(Probe {
            path,
            display_path,
            payload: self.payload,
            mode: self.mode,
            continue_on_error: self.continue_on_error,
            leak_handle: self.leak_handle,
        })
    }
}

/// What the kernel returned during one run of a [`Probe`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    pub open: RawResult,
    pub write: RawResult,
    pub fstat: RawResult,
    pub stat: Stat,
    /// Report lines that could not be written to the output
    pub lost_lines: usize,
}

impl ProbeReport {
    /// The descriptor the open step produced, possibly `-1`
    pub fn fd(&self) -> usize {
        self.open.r1
    }

    /// Did every step succeed?
    pub fn is_ok(&self) -> bool {
        !self.open.is_err() && !self.write.is_err() && !self.fstat.is_err()
    }

    /// The console lines of the report: one per step and the metadata dump
    pub fn lines(&self) -> Vec<String> {
        vec![
            format_result("fd", &self.open),
            format_result("r1", &self.write),
            format_result("r1", &self.fstat),
            format_stat(&self.stat),
        ]
    }
}

fn format_result(label: &str, result: &RawResult) -> String {
    format!("{}: {} r2: {} errNo: {}", label, result.r1, result.r2, result.errno)
}

fn format_stat(stat: &Stat) -> String {
    format!("{:?}", stat)
}

/// Opens (creating if necessary) a file, writes a payload to it and queries its
/// metadata via raw system calls.
pub struct Probe {
    path: CString,
    display_path: String,
    payload: Vec<u8>,
    mode: u32,
    continue_on_error: bool,
    leak_handle: bool,
}

impl Probe {
    /// Create a [`ProbeBuilder`] that can configure a probe.
    pub fn builder() -> ProbeBuilder {
        ProbeBuilder {
            path: PathBuf::from(DEFAULT_PATH),
            payload: DEFAULT_PAYLOAD.to_vec(),
            mode: DEFAULT_MODE,
            continue_on_error: true,
            leak_handle: true,
        }
    }

    pub fn path(&self) -> &CStr {
        &self.path
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Execute the three steps and write a report line to `out` after each of them,
    /// followed by the metadata dump.
    pub fn run<W: Write>(&self, out: &mut W, logger: &mut Logger) -> Result<ProbeReport, ProbeError> {
        logger.set_title(format!("Probing {}", self.display_path));

        let mut report = ProbeReport::default();

        /* Open */
        report.open = sys_open(&self.path, OPEN_FLAGS, self.mode);
        let handle = FileHandle::new(report.open.r1, self.leak_handle);
        self.observe(Step::Open, report.open, &mut report, out, logger)?;

        /* Write */
        report.write = sys_write(handle.raw(), &self.payload);
        self.observe(Step::Write, report.write, &mut report, out, logger)?;

        /* Stat */
        report.fstat = sys_fstat(handle.raw(), &mut report.stat);
        self.observe(Step::Fstat, report.fstat, &mut report, out, logger)?;

        let dump = format_stat(&report.stat);
        self.emit(dump, &mut report, out, logger)?;

        if handle.is_leaked() {
            logger.debug(format!("Leaving fd {} open until exit", handle.raw() as isize));
        } else if let Some(ret) = handle.close() {
            if ret.is_err() {
                logger.warning(format!("Could not close fd {}: {}", report.fd(), ret.errno));
            } else {
                logger.info(format!("Closed fd {}", report.fd()));
            }
        }

        Ok(report)
    }

    /// Report the outcome of `step`: diagnostic first, then the result line.
    fn observe<W: Write>(&self, step: Step, result: RawResult, report: &mut ProbeReport, out: &mut W, logger: &mut Logger) -> Result<(), ProbeError> {
        if result.is_err() {
            logger.set_prefix(step.name());
            logger.error(format!("error when {} the file: {}", step, result.errno));
            logger.clear_prefix();
        }

        let label = if step == Step::Open { "fd" } else { "r1" };
        self.emit(format_result(label, &result), report, out, logger)?;

        if result.is_err() && !self.continue_on_error {
            return Err(ProbeError::StepFailed {
                step,
                errno: result.errno,
            });
        }

        Ok(())
    }

    /// Write one report line. Unless the probe stops on errors, a line that
    /// cannot be written is logged and counted, and the steps carry on.
    fn emit<W: Write>(&self, line: String, report: &mut ProbeReport, out: &mut W, logger: &Logger) -> Result<(), ProbeError> {
        if let Err(err) = logger.suspend(|| writeln!(out, "{}", line)) {
            if !self.continue_on_error {
                return Err(ProbeError::IOError(err));
            }

            logger.warning(format!("Could not print report line: {}", err));
            report.lost_lines += 1;
        }

        Ok(())
    }
}
