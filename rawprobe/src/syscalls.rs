//! Numbers of the system calls the probe issues on the current architecture.
#![allow(non_upper_case_globals)]

#[cfg(target_arch = "x86_64")]
mod numbers {
    /// `long sys_write(unsigned int fd, const char __user *buf, size_t count);`
    pub const write: usize = 1;
    /// `long sys_open(const char __user *filename, int flags, umode_t mode);`
    pub const open: usize = 2;
    /// `long sys_close(unsigned int fd);`
    pub const close: usize = 3;
    /// `long sys_newfstat(unsigned int fd, struct stat __user *statbuf);`
    pub const fstat: usize = 5;
    /// `long sys_openat(int dfd, const char __user *filename, int flags, umode_t mode);`
    pub const openat: usize = 257;
}

// asm-generic table
#[cfg(any(target_arch = "aarch64", target_arch = "riscv64"))]
mod numbers {
    /// `long sys_openat(int dfd, const char __user *filename, int flags, umode_t mode);`
    pub const openat: usize = 56;
    /// `long sys_close(unsigned int fd);`
    pub const close: usize = 57;
    /// `long sys_write(unsigned int fd, const char __user *buf, size_t count);`
    pub const write: usize = 64;
    /// `long sys_newfstat(unsigned int fd, struct stat __user *statbuf);`
    pub const fstat: usize = 80;
}

pub use numbers::*;
