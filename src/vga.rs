// VGA text mode, as used by the panic path:
//
// On x86 machines the display controller reads character cells straight out of
// a memory-mapped buffer at physical address 0xB8000, laid out as 25 rows of
// 80 cells. Each cell is 16 bits wide: the low byte holds the character code
// and the high byte holds the display attribute (lower 4 bits foreground
// color, next 3 bits background color, top bit blink). Writing a cell changes
// the screen immediately, with no graphics pipeline in between.
//
// This module is deliberately not a console driver. The panic screen writes
// one message once, always from cell 0, always with the same attribute. There
// is no scrolling, no cursor, and no newline handling: a `\n` in the message
// lands in its cell as the literal code point 0x0A and renders as whatever
// glyph the card maps it to. That matches how the message has always been
// displayed, so it stays.

use lazy_static::lazy_static;
use spin::Mutex;
use volatile::Volatile; // Keeps the compiler from optimizing away buffer writes it thinks nobody reads

/// Geometry of the text buffer. Together with `BUFFER_ADDR` below this is an
/// ABI contract with the platform: it must match what the display hardware
/// (or the emulator) actually scans out.
pub const BUFFER_COLS: usize = 80;
pub const BUFFER_ROWS: usize = 25;
pub const BUFFER_CELLS: usize = BUFFER_COLS * BUFFER_ROWS;

// The single per-target configuration point. Only x86 text mode is wired up
// today; a port to another platform supplies its own address and geometry
// here instead of scattering literals through the code.
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
const BUFFER_ADDR: usize = 0xb8000;

#[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
compile_error!("no text-mode buffer layout is configured for this target");

// The standard 16-color VGA palette.
#[allow(dead_code)] // The panic screen only ever uses White and Black
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGray = 7,
    DarkGray = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    Pink = 13,
    Yellow = 14,
    White = 15,
}

/// A full attribute byte: background color in the upper 4 bits, foreground in
/// the lower 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorCode(u8);

impl ColorCode {
    pub const fn new(foreground: Color, background: Color) -> ColorCode {
        ColorCode((background as u8) << 4 | (foreground as u8))
    }
}

/// The one attribute the panic screen uses: bright white on black (0x0F).
pub const PANIC_ATTRIBUTE: ColorCode = ColorCode::new(Color::White, Color::Black);

/// One cell of the text buffer: character code plus attribute byte, in the
/// exact layout the hardware expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ScreenCell {
    pub character: u8,
    pub attribute: ColorCode,
}

/// The memory-mapped text buffer itself. The panic path has no row/column
/// notion, so the cells are kept flat rather than as a rows-by-columns grid.
#[repr(transparent)]
pub struct Buffer {
    cells: [Volatile<ScreenCell>; BUFFER_CELLS],
}

impl Buffer {
    /// Returns the platform's text buffer.
    ///
    /// # Safety
    ///
    /// `BUFFER_ADDR` and the geometry constants must describe the real
    /// text-mode buffer of the machine this kernel runs on, and the caller
    /// must ensure no other `&mut Buffer` to the same memory is alive. The
    /// global `WRITER` is the only caller in this crate.
    pub unsafe fn platform() -> &'static mut Buffer {
        &mut *(BUFFER_ADDR as *mut Buffer)
    }
}

/// Writes the diagnostic message into a text buffer.
///
/// The buffer is injected rather than grabbed from a global pointer, so tests
/// and an embedding kernel can hand in whichever buffer handle they own.
pub struct Writer {
    buffer: &'static mut Buffer,
}

impl Writer {
    pub fn new(buffer: &'static mut Buffer) -> Writer {
        Writer { buffer }
    }

    /// Writes `msg` into consecutive cells starting at cell 0, pairing every
    /// byte with [`PANIC_ATTRIBUTE`]. Cells past the end of the message keep
    /// whatever they held before, so repeating the same write is a no-op.
    ///
    /// Bytes that would land past the last cell are dropped. The historical
    /// behavior was to keep writing into whatever memory follows the buffer;
    /// truncating at the boundary is an intentional hardening of that.
    pub fn write_message(&mut self, msg: &str) {
        for (cell, byte) in self.buffer.cells.iter_mut().zip(msg.bytes()) {
            cell.write(ScreenCell {
                character: byte,
                attribute: PANIC_ATTRIBUTE,
            });
        }
    }

    /// Reads a cell back, or `None` past the end of the buffer. The display
    /// path never reads the screen; this exists so the QEMU tests can check
    /// what actually reached the hardware.
    pub fn read_cell(&self, index: usize) -> Option<ScreenCell> {
        self.buffer.cells.get(index).map(|cell| cell.read())
    }
}

lazy_static! {
    /// Global handle over the platform buffer, used by the panic path. The
    /// unsafe buffer creation happens exactly once, here.
    pub static ref WRITER: Mutex<Writer> =
        Mutex::new(Writer::new(unsafe { Buffer::platform() }));
}

#[cfg(test)]
mod tests {
    use super::*;

    // Paints the whole screen with a known filler so the assertions below can
    // tell written cells from untouched ones.
    fn fill_screen(writer: &mut Writer, filler: u8) {
        let bytes = [filler; BUFFER_CELLS];
        writer.write_message(core::str::from_utf8(&bytes).unwrap());
    }

    #[test_case]
    fn short_message_lands_in_leading_cells() {
        let mut writer = WRITER.lock();
        fill_screen(&mut writer, b'x');
        writer.write_message("OK\n");

        for (i, byte) in b"OK\n".iter().enumerate() {
            let cell = writer.read_cell(i).unwrap();
            assert_eq!(cell.character, *byte);
            assert_eq!(cell.attribute, PANIC_ATTRIBUTE);
        }
    }

    #[test_case]
    fn newline_is_stored_as_its_code_point() {
        // The message's line break is data, not a row advance.
        let mut writer = WRITER.lock();
        writer.write_message("a\nb");
        assert_eq!(writer.read_cell(1).unwrap().character, 0x0a);
    }

    #[test_case]
    fn cells_past_the_message_stay_untouched() {
        let mut writer = WRITER.lock();
        fill_screen(&mut writer, b'x');
        writer.write_message("OK\n");

        let untouched = writer.read_cell(3).unwrap();
        assert_eq!(untouched.character, b'x');
        let last = writer.read_cell(BUFFER_CELLS - 1).unwrap();
        assert_eq!(last.character, b'x');
    }

    #[test_case]
    fn empty_message_writes_nothing() {
        let mut writer = WRITER.lock();
        fill_screen(&mut writer, b'y');
        writer.write_message("");
        assert_eq!(writer.read_cell(0).unwrap().character, b'y');
    }

    #[test_case]
    fn rewriting_the_same_message_is_idempotent() {
        let mut writer = WRITER.lock();
        writer.write_message("OK\n");
        let first = writer.read_cell(0).unwrap();
        writer.write_message("OK\n");
        assert_eq!(writer.read_cell(0).unwrap(), first);
    }

    #[test_case]
    fn full_buffer_message_fills_every_cell() {
        let mut writer = WRITER.lock();
        let bytes = [b'F'; BUFFER_CELLS];
        writer.write_message(core::str::from_utf8(&bytes).unwrap());
        assert_eq!(writer.read_cell(0).unwrap().character, b'F');
        assert_eq!(writer.read_cell(BUFFER_CELLS - 1).unwrap().character, b'F');
    }

    #[test_case]
    fn overlong_message_is_truncated_at_the_buffer_end() {
        // Divergence from the historical writer, on purpose: it used to run
        // past the buffer and corrupt adjacent memory. Here the 2001st byte
        // is dropped instead.
        let mut writer = WRITER.lock();
        fill_screen(&mut writer, b'x');
        let bytes = [b'T'; BUFFER_CELLS + 1];
        writer.write_message(core::str::from_utf8(&bytes).unwrap());
        assert_eq!(writer.read_cell(BUFFER_CELLS - 1).unwrap().character, b'T');
        assert_eq!(writer.read_cell(BUFFER_CELLS), None);
    }
}
