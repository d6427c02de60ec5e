// The terminal state of the machine. Once the panic screen is up there is
// nothing left to schedule, so the CPU is parked in the cheapest wait state
// the target architecture offers. Which wait that is gets decided at build
// time, one variant per architecture family.

/// Parks the CPU forever. Control never returns to the caller; the `!`
/// return type makes the compiler hold us to that.
///
/// `hlt` stops execution until the next interrupt. Nothing is set up to
/// handle one at this point, so the loop just re-enters the wait if the CPU
/// ever wakes.
#[cfg(target_arch = "x86_64")]
pub fn halt_loop() -> ! {
    loop {
        x86_64::instructions::hlt();
    }
}

/// Same contract as the x86_64 variant, via a raw `hlt` since the 32-bit
/// target has no instruction wrapper crate in our stack.
#[cfg(target_arch = "x86")]
pub fn halt_loop() -> ! {
    loop {
        unsafe { core::arch::asm!("hlt", options(nomem, nostack, preserves_flags)) };
    }
}

/// ARM's wait-for-interrupt is the moral equivalent of `hlt`.
#[cfg(any(target_arch = "aarch64", target_arch = "arm"))]
pub fn halt_loop() -> ! {
    loop {
        unsafe { core::arch::asm!("wfi", options(nomem, nostack, preserves_flags)) };
    }
}

/// Portable fallback for targets without a halt-until-interrupt instruction:
/// spin, hinting the core that it is in a busy-wait.
#[cfg(not(any(
    target_arch = "x86_64",
    target_arch = "x86",
    target_arch = "aarch64",
    target_arch = "arm"
)))]
pub fn halt_loop() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
