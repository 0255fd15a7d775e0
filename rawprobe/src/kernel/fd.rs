use crate::{
    kernel::linux::sys_close,
    raw::RawResult,
};

/// A file descriptor as it came out of the open syscall.
///
/// The descriptor is kept even when opening failed, in which case it holds
/// the raw `-1` and every operation on it fails with `EBADF`.
/// Unless the handle is leaked, it is closed once dropped.
#[derive(Debug)]
pub struct FileHandle {
    raw: usize,
    leak: bool,
}

impl FileHandle {
    pub fn new(raw: usize, leak: bool) -> Self {
        Self {
            raw,
            leak,
        }
    }

    #[inline]
    pub fn raw(&self) -> usize {
        self.raw
    }

    /// Whether the kernel handed out a real descriptor
    #[inline]
    pub fn is_valid(&self) -> bool {
        (self.raw as isize) >= 0
    }

    #[inline]
    pub fn is_leaked(&self) -> bool {
        self.leak
    }

    /// Close the descriptor right away and return the close result.
    /// Invalid descriptors are not handed to the kernel.
    pub fn close(mut self) -> Option<RawResult> {
        self.leak = true;

        if self.is_valid() {
            Some(sys_close(self.raw))
        } else {
            None
        }
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        if !self.leak && self.is_valid() {
            sys_close(self.raw);
        }
    }
}
