//! Memory-mapped I/O over `/dev/mem`
//!
//! The accelerator register file sits behind an AXI GP port at a fixed
//! physical address. On a Linux target we reach it by mapping one page of
//! `/dev/mem` at that address; rustix provides the mmap/munmap wrappers.

// MMIO registers are naturally aligned by hardware, so pointer casts are safe
#![allow(clippy::cast_ptr_alignment)]

use crate::bus::RegisterBus;
use crate::error::{Result, ZynnError};
use rustix::fs::OFlags;
use rustix::mm::{mmap, munmap, MapFlags, ProtFlags};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsFd;
use std::path::Path;
use std::ptr::NonNull;

/// One page covers the whole 0x18-byte register window.
const MAP_LEN: usize = 4096;

/// Register bus backed by a `/dev/mem` mapping of the physical register window.
///
/// Requires root (or `CAP_SYS_RAWIO`) and a kernel without
/// `CONFIG_STRICT_DEVMEM` restrictions on the FPGA address range.
pub struct DevMemBus {
    ptr: NonNull<u8>,
    base: u64,
    _file: File,
}

impl std::fmt::Debug for DevMemBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevMemBus")
            .field("base", &format_args!("{:#x}", self.base))
            .field("ptr", &format_args!("{:p}", self.ptr))
            .finish()
    }
}

// SAFETY: DevMemBus owns the mapping exclusively; moving it between threads
// does not invalidate the mapping (mmap'd memory is process-wide).
unsafe impl Send for DevMemBus {}

impl DevMemBus {
    /// Map the register window at `base` (physical address, page-aligned).
    ///
    /// Opens `/dev/mem` with `O_SYNC` so accesses are uncached.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not page-aligned, `/dev/mem` cannot be
    /// opened (permissions, missing node), or the mapping fails.
    pub fn map(base: u64) -> Result<Self> {
        if base % MAP_LEN as u64 != 0 {
            return Err(ZynnError::map_failed(format!(
                "base address {base:#x} is not page-aligned"
            )));
        }

        let path = Path::new("/dev/mem");
        if !path.exists() {
            return Err(ZynnError::device_not_found(path));
        }

        // O_SYNC flag bits are small positive values, the cast cannot wrap
        #[allow(clippy::cast_possible_wrap)]
        let sync_flag = OFlags::SYNC.bits() as i32;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(sync_flag)
            .open(path)?;

        // SAFETY: mmap is required to reach the physical register window.
        // Invariants: (1) file is a freshly opened /dev/mem fd; (2) base is
        // page-aligned (checked above); (3) MAP_SHARED so writes reach the
        // device; (4) rustix returns Err or a valid non-null mapping of
        // MAP_LEN bytes; (5) the mapping is released in Drop.
        let ptr = unsafe {
            let addr = mmap(
                std::ptr::null_mut(),
                MAP_LEN,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                file.as_fd(),
                base,
            )
            .map_err(|e| ZynnError::map_failed(format!("mmap of {base:#x} failed: {e}")))?;

            NonNull::new(addr.cast::<u8>())
                .expect("rustix mmap returns non-null pointer on success")
        };

        tracing::info!("Mapped register window at {base:#x} ({ptr:p})");

        Ok(Self {
            ptr,
            base,
            _file: file,
        })
    }

    /// Physical base address of the mapped window.
    #[must_use]
    pub const fn base(&self) -> u64 {
        self.base
    }
}

impl RegisterBus for DevMemBus {
    /// Read a 32-bit register.
    ///
    /// # Panics
    ///
    /// Panics if `offset + 4` exceeds the mapped window.
    fn read32(&self, offset: usize) -> u32 {
        assert!(offset + 4 <= MAP_LEN, "register offset out of window");
        // SAFETY: read_volatile is required for MMIO — the device changes
        // register contents and the read must not be reordered or elided.
        // Invariants: (1) ptr from mmap in map(), valid for MAP_LEN bytes;
        // (2) offset + 4 <= MAP_LEN; (3) registers are 4-byte aligned.
        let value = unsafe { self.ptr.as_ptr().add(offset).cast::<u32>().read_volatile() };
        tracing::trace!("read32  {offset:#04x} -> {value:#010x}");
        value
    }

    /// Write a 32-bit register.
    ///
    /// # Panics
    ///
    /// Panics if `offset + 4` exceeds the mapped window.
    fn write32(&mut self, offset: usize, value: u32) {
        assert!(offset + 4 <= MAP_LEN, "register offset out of window");
        tracing::trace!("write32 {offset:#04x} <- {value:#010x}");
        // SAFETY: write_volatile is required for MMIO — writes trigger
        // hardware side effects and must not be reordered or elided.
        // Invariants: (1) ptr from mmap in map(), valid for MAP_LEN bytes;
        // (2) offset + 4 <= MAP_LEN; (3) registers are 4-byte aligned.
        unsafe {
            self.ptr
                .as_ptr()
                .add(offset)
                .cast::<u32>()
                .write_volatile(value);
        }
    }
}

impl Drop for DevMemBus {
    fn drop(&mut self) {
        // SAFETY: ptr/MAP_LEN are exactly what mmap returned in map(); Drop
        // runs at most once and no references outlive the bus.
        unsafe {
            if let Err(e) = munmap(self.ptr.as_ptr().cast(), MAP_LEN) {
                tracing::error!("munmap failed during drop: {e}");
            }
        }
        tracing::debug!("Unmapped register window at {:#x}", self.base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unaligned_base_is_rejected() {
        let err = DevMemBus::map(zynn_chip::regs::DEFAULT_BASE_ADDR + 4).unwrap_err();
        assert!(matches!(err, ZynnError::MapFailed { .. }));
    }
}
