#![no_std]
#![no_main]
#![feature(custom_test_frameworks)]
#![test_runner(panic_screen::test_runner)]
#![reexport_test_harness_main = "test_main"]

use bootloader::{entry_point, BootInfo};
use core::panic::PanicInfo;

entry_point!(kernel_main);

// This binary exists to run the panic path end to end: boot, paint the
// screen, halt. A real kernel links the library instead and calls
// `panic_screen::display()` from its own fault dispatch.
fn kernel_main(_boot_info: &'static BootInfo) -> ! {
    #[cfg(test)]
    test_main();

    panic_screen::display()
}

// A panic inside the panic path has nowhere better to go than the path
// itself: the message is constant, so re-entering it is harmless.
#[cfg(not(test))]
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    panic_screen::display()
}

#[cfg(test)]
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    panic_screen::test_panic_handler(info)
}

#[test_case]
fn message_fits_the_buffer() {
    assert!(panic_screen::MESSAGE.len() <= panic_screen::vga::BUFFER_CELLS);
}
