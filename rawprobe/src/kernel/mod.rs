//! Typed access to the handful of Linux system calls the probe needs.

pub mod fd;
pub mod linux;
pub mod structs;
