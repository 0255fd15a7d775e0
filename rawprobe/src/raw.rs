//! The trampoline into the kernel.
//!
//! Every call hands back the raw contents of the two return registers
//! together with the decoded error number, without interpreting them further.

use std::fmt;

/// An error number as reported by the kernel. Zero means success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Errno(pub i32);

impl Errno {
    pub const SUCCESS: Errno = Errno(0);

    #[inline]
    pub fn is_err(self) -> bool {
        self.0 != 0
    }
}

/// Renders the bare strerror text with a lowercase initial, e.g. `no such file or directory`.
/// Zero has no message and renders as `errno 0`.
impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "errno 0");
        }

        let msg = std::io::Error::from_raw_os_error(self.0).to_string();
        let suffix = format!(" (os error {})", self.0);
        let msg = msg.strip_suffix(suffix.as_str()).unwrap_or(&msg);

        let mut chars = msg.chars();
        match chars.next() {
            Some(first) => write!(f, "{}{}", first.to_lowercase(), chars.as_str()),
            None => write!(f, "errno {}", self.0),
        }
    }
}

/// The result triple of a single system call: primary return register,
/// secondary return register and error number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawResult {
    pub r1: usize,
    pub r2: usize,
    pub errno: Errno,
}

/// Return values in `[-4095, -1]` are negated error numbers
const MAX_ERRNO: usize = 4095;

impl RawResult {
    pub(crate) fn from_registers(r1: usize, r2: usize) -> Self {
        if r1 > usize::MAX - MAX_ERRNO {
            Self {
                r1: usize::MAX,
                r2: 0,
                errno: Errno(r1.wrapping_neg() as i32),
            }
        } else {
            Self {
                r1,
                r2,
                errno: Errno::SUCCESS,
            }
        }
    }

    #[inline]
    pub fn is_err(&self) -> bool {
        self.errno.is_err()
    }

    /// The primary result interpreted as a signed value, so that failures read as `-1`
    #[inline]
    pub fn signed(&self) -> isize {
        self.r1 as isize
    }
}

/// Issue the system call `nr` with three arguments.
///
/// # Safety
/// The arguments are passed to the kernel as-is. Pointer arguments must be
/// valid for whatever the kernel does with them for the given syscall.
#[cfg(target_arch = "x86_64")]
pub unsafe fn syscall3(nr: usize, a0: usize, a1: usize, a2: usize) -> RawResult {
    let r1: usize;
    let r2: usize;

    core::arch::asm!(
        "syscall",
        inlateout("rax") nr => r1,
        in("rdi") a0,
        in("rsi") a1,
        inlateout("rdx") a2 => r2,
        lateout("rcx") _,
        lateout("r11") _,
        options(nostack),
    );

    RawResult::from_registers(r1, r2)
}

/// Issue the system call `nr` with four arguments.
///
/// # Safety
/// See [`syscall3`].
#[cfg(target_arch = "aarch64")]
pub unsafe fn syscall4(nr: usize, a0: usize, a1: usize, a2: usize, a3: usize) -> RawResult {
    let r1: usize;
    let r2: usize;

    core::arch::asm!(
        "svc 0",
        in("x8") nr,
        inlateout("x0") a0 => r1,
        inlateout("x1") a1 => r2,
        in("x2") a2,
        in("x3") a3,
        options(nostack),
    );

    RawResult::from_registers(r1, r2)
}

/// Issue the system call `nr` with four arguments.
///
/// # Safety
/// See [`syscall3`].
#[cfg(target_arch = "riscv64")]
pub unsafe fn syscall4(nr: usize, a0: usize, a1: usize, a2: usize, a3: usize) -> RawResult {
    let r1: usize;
    let r2: usize;

    core::arch::asm!(
        "ecall",
        in("a7") nr,
        inlateout("a0") a0 => r1,
        inlateout("a1") a1 => r2,
        in("a2") a2,
        in("a3") a3,
        options(nostack),
    );

    RawResult::from_registers(r1, r2)
}

/// Issue the system call `nr` with three arguments.
///
/// # Safety
/// The arguments are passed to the kernel as-is. Pointer arguments must be
/// valid for whatever the kernel does with them for the given syscall.
#[cfg(any(target_arch = "aarch64", target_arch = "riscv64"))]
#[inline]
pub unsafe fn syscall3(nr: usize, a0: usize, a1: usize, a2: usize) -> RawResult {
    syscall4(nr, a0, a1, a2, 0)
}
