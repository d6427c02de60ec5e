#![no_std]
#![cfg_attr(test, no_main)]
#![feature(custom_test_frameworks)]
#![test_runner(crate::test_runner)]
#![reexport_test_harness_main = "test_main"]

use core::panic::PanicInfo;

pub mod halt;
pub mod serial;
pub mod vga;

/// The fixed diagnostic text. Nothing about the failure is known at this
/// point, or passed in by the caller, so the message carries no detail.
///
/// The embedded `\n` reaches the screen as a literal glyph, not a row break;
/// see `vga` for that contract.
pub const MESSAGE: &str = "!!! KERNEL PANIC !!!\nSystem halted.\n";

/// The whole panic path: paint [`MESSAGE`] onto the screen, then park the
/// CPU forever. Called by whatever fault dispatch decided the machine is
/// beyond saving; it takes no arguments and never returns.
pub fn display() -> ! {
    vga::WRITER.lock().write_message(MESSAGE);
    halt::halt_loop()
}

pub trait Testable {
    fn run(&self) -> ();
}

impl<T> Testable for T
where
    T: Fn(),
{
    fn run(&self) {
        serial_print!("{}...\t", core::any::type_name::<T>());
        self();
        serial_println!("[ok]");
    }
}

pub fn test_runner(tests: &[&dyn Testable]) {
    serial_println!("Running {} tests", tests.len());
    for test in tests {
        test.run();
    }
    exit_qemu(QemuExitCode::Success)
}

pub fn test_panic_handler(info: &PanicInfo) -> ! {
    serial_println!("[failed]\n");
    serial_println!("Error: {}\n", info);
    exit_qemu(QemuExitCode::Failed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum QemuExitCode {
    Success = 0x10,
    Failed = 0x11,
}

/// Leaves QEMU through the isa-debug-exit device (iobase 0xf4, see the
/// bootimage test-args). On hardware without that device the write is a
/// no-op and the machine halts instead.
pub fn exit_qemu(exit_code: QemuExitCode) -> ! {
    use x86_64::instructions::port::Port;

    unsafe {
        let mut port = Port::new(0xf4);
        port.write(exit_code as u32);
    }
    halt::halt_loop()
}

// Entry point for `cargo test` on the library target
#[cfg(test)]
use bootloader::{entry_point, BootInfo};

#[cfg(test)]
entry_point!(test_kernel_main);

#[cfg(test)]
fn test_kernel_main(_boot_info: &'static BootInfo) -> ! {
    test_main();
    halt::halt_loop()
}

#[cfg(test)]
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    test_panic_handler(info)
}
