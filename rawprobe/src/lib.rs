//! Open a file, write to it and query its metadata by talking to the Linux
//! kernel directly, bypassing `std::fs`.
//!
//! ```no_run
//! use rawprobe::{Logger, Probe};
//!
//! let probe = Probe::builder().path("/tmp/test.txt").build().unwrap();
//! let report = probe.run(&mut std::io::stdout(), &mut Logger::spinner()).unwrap();
//! assert_eq!(report.stat.st_size, 11);
//! ```

#[cfg(not(all(target_os = "linux", any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "riscv64"))))]
compile_error!("rawprobe only knows the syscall ABI and struct stat layout of x86_64, aarch64 and riscv64 Linux");

mod logger;

pub mod kernel;
pub mod probe;
pub mod raw;
pub mod syscalls;

pub use logger::Logger;
pub use probe::{
    Probe,
    ProbeBuilder,
    ProbeError,
    ProbeReport,
    Step,
};
