// Drives the panic screen's write path under QEMU and checks every cell that
// reached the buffer. Runs without the test harness so the whole boot is the
// one test; `display()` itself can't be driven here because it never returns,
// which is exactly the property its `!` type already pins down.

#![no_std]
#![no_main]

use bootloader::{entry_point, BootInfo};
use core::panic::PanicInfo;
use panic_screen::vga::{BUFFER_CELLS, PANIC_ATTRIBUTE, WRITER};
use panic_screen::{exit_qemu, serial_print, serial_println, QemuExitCode, MESSAGE};

entry_point!(main);

fn main(_boot_info: &'static BootInfo) -> ! {
    serial_print!("panic_display::message_reaches_the_screen...\t");

    WRITER.lock().write_message(MESSAGE);

    let writer = WRITER.lock();
    for (i, byte) in MESSAGE.bytes().enumerate() {
        let cell = writer.read_cell(i).expect("message exceeds the buffer");
        assert_eq!(cell.character, byte);
        assert_eq!(cell.attribute, PANIC_ATTRIBUTE);
    }
    // The message is nowhere near 2000 cells, so the tail must be reachable
    // and not ours to have touched.
    assert!(MESSAGE.len() < BUFFER_CELLS);

    serial_println!("[ok]");
    exit_qemu(QemuExitCode::Success)
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    serial_println!("[failed]\n");
    serial_println!("Error: {}\n", info);
    exit_qemu(QemuExitCode::Failed)
}
