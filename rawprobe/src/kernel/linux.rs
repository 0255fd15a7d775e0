use std::ffi::CStr;

#[cfg(any(target_arch = "aarch64", target_arch = "riscv64"))]
use crate::raw::syscall4;
use crate::{
    kernel::structs::Stat,
    raw::{
        syscall3,
        RawResult,
    },
    syscalls,
};

/// Open `pathname` relative to the current working directory.
#[cfg(target_arch = "x86_64")]
pub fn sys_open(pathname: &CStr, flags: i32, mode: u32) -> RawResult {
    unsafe { syscall3(syscalls::open, pathname.as_ptr() as usize, flags as usize, mode as usize) }
}

/// Open `pathname` relative to the current working directory.
/// There is no legacy `open` here, so this goes through `openat(AT_FDCWD, ...)`.
#[cfg(any(target_arch = "aarch64", target_arch = "riscv64"))]
pub fn sys_open(pathname: &CStr, flags: i32, mode: u32) -> RawResult {
    unsafe {
        syscall4(
            syscalls::openat,
            libc::AT_FDCWD as usize,
            pathname.as_ptr() as usize,
            flags as usize,
            mode as usize,
        )
    }
}

/// Write `buf` at the current position of `fd`. `r1` holds the number of bytes written.
pub fn sys_write(fd: usize, buf: &[u8]) -> RawResult {
    unsafe { syscall3(syscalls::write, fd, buf.as_ptr() as usize, buf.len()) }
}

/// Let the kernel fill `stat` with the metadata of `fd`.
/// If the call fails, `stat` is left as it was.
pub fn sys_fstat(fd: usize, stat: &mut Stat) -> RawResult {
    unsafe { syscall3(syscalls::fstat, fd, stat as *mut Stat as usize, 0) }
}

pub fn sys_close(fd: usize) -> RawResult {
    unsafe { syscall3(syscalls::close, fd, 0, 0) }
}
