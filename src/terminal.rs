//! Framebuffer terminal: the primary (visual) output sink.
//!
//! A monospace cell grid renders through `embedded-graphics`. The grid itself
//! has no hardware dependency, so it can be driven directly in tests; only
//! `render` touches the framebuffer. The global console pairs one grid with
//! the boot framebuffer and flushes after every write, so panic output is on
//! screen without anyone pumping a main loop.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::Rgb888,
};
use spin::Mutex;

use crate::framebuffer::{Color, FramebufferWriter};

pub const CELL_WIDTH: usize = 10;
pub const CELL_HEIGHT: usize = 20;
const TAB_STOP: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::WHITE,
    };
}

pub struct Terminal {
    cells: Vec<Vec<Cell>>,
    cols: usize,
    rows: usize,
    cursor_col: usize,
    cursor_row: usize,
    fg: Color,
    dirty_rows: Vec<bool>,
}

impl Terminal {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cells: vec![vec![Cell::BLANK; cols]; rows],
            cols,
            rows,
            cursor_col: 0,
            cursor_row: 0,
            fg: Color::WHITE,
            dirty_rows: vec![true; rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn set_fg(&mut self, color: Color) {
        self.fg = color;
    }

    pub fn char_at(&self, row: usize, col: usize) -> char {
        self.cells[row][col].ch
    }

    pub fn clear(&mut self) {
        for row in self.cells.iter_mut() {
            row.fill(Cell::BLANK);
        }
        self.cursor_col = 0;
        self.cursor_row = 0;
        self.dirty_rows.fill(true);
    }

    /// Raw byte sink used by the write syscall: every byte lands in a cell,
    /// no UTF-8 interpretation.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.put_char(b as char);
        }
    }

    pub fn put_char(&mut self, ch: char) {
        match ch {
            '\n' => self.newline(),
            '\r' => self.cursor_col = 0,
            '\t' => {
                let next = (self.cursor_col / TAB_STOP + 1) * TAB_STOP;
                while self.cursor_col < next && self.cursor_col < self.cols {
                    self.put_char(' ');
                }
            }
            '\x08' => {
                if self.cursor_col > 0 {
                    self.cursor_col -= 1;
                    self.cells[self.cursor_row][self.cursor_col] = Cell::BLANK;
                    self.dirty_rows[self.cursor_row] = true;
                }
            }
            ch => {
                if self.cursor_col >= self.cols {
                    self.newline();
                }
                self.cells[self.cursor_row][self.cursor_col] = Cell { ch, fg: self.fg };
                self.dirty_rows[self.cursor_row] = true;
                self.cursor_col += 1;
            }
        }
    }

    fn newline(&mut self) {
        self.cursor_col = 0;
        if self.cursor_row + 1 < self.rows {
            self.cursor_row += 1;
        } else {
            self.scroll_up();
        }
    }

    fn scroll_up(&mut self) {
        self.cells.rotate_left(1);
        if let Some(last) = self.cells.last_mut() {
            last.fill(Cell::BLANK);
        }
        self.dirty_rows.fill(true);
    }

    /// Redraw every dirty row.
    pub fn render(&mut self, fb: &mut FramebufferWriter) {
        for row in 0..self.rows {
            if !self.dirty_rows[row] {
                continue;
            }
            self.dirty_rows[row] = false;

            let y = (row * CELL_HEIGHT) as i32;
            fb.fill_rect(
                0,
                y,
                (self.cols * CELL_WIDTH) as u32,
                CELL_HEIGHT as u32,
                Color::BLACK,
            );
            for col in 0..self.cols {
                let cell = self.cells[row][col];
                if cell.ch == ' ' {
                    continue;
                }
                let style = MonoTextStyle::new(&FONT_10X20, cell.fg.to_rgb888());
                fb.draw_char(cell.ch, (col * CELL_WIDTH) as i32, y, &style);
            }
        }
    }
}

impl fmt::Write for Terminal {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            self.put_char(ch);
        }
        Ok(())
    }
}

struct Console {
    terminal: Terminal,
    framebuffer: FramebufferWriter,
}

impl Console {
    fn flush(&mut self) {
        self.terminal.render(&mut self.framebuffer);
    }
}

static CONSOLE: Mutex<Option<Console>> = Mutex::new(None);

pub fn init(boot_info: &'static mut bootloader_api::BootInfo) {
    let Some(mut framebuffer) = FramebufferWriter::new(boot_info) else {
        return;
    };
    framebuffer.clear(Color::BLACK);

    let cols = framebuffer.width() / CELL_WIDTH;
    let rows = framebuffer.height() / CELL_HEIGHT;
    let terminal = Terminal::new(cols, rows);

    *CONSOLE.lock() = Some(Console {
        terminal,
        framebuffer,
    });
}

pub fn write_fmt(args: fmt::Arguments) {
    use core::fmt::Write;
    if let Some(console) = CONSOLE.lock().as_mut() {
        let _ = console.terminal.write_fmt(args);
        console.flush();
    }
}

/// The "write colored text" operation: one formatted write in `color`, then
/// back to the default foreground.
pub fn write_colored(color: Color, args: fmt::Arguments) {
    use core::fmt::Write;
    if let Some(console) = CONSOLE.lock().as_mut() {
        console.terminal.set_fg(color);
        let _ = console.terminal.write_fmt(args);
        console.terminal.set_fg(Color::WHITE);
        console.flush();
    }
}

pub fn write_bytes(bytes: &[u8]) {
    if let Some(console) = CONSOLE.lock().as_mut() {
        console.terminal.write_bytes(bytes);
        console.flush();
    }
}

pub fn clear() {
    if let Some(console) = CONSOLE.lock().as_mut() {
        console.terminal.clear();
        console.flush();
    }
}

/// Reclaim the console from whatever context held it when a fatal trap hit.
/// Only the panic path may call this; the previous holder never resumes.
pub unsafe fn force_unlock() {
    CONSOLE.force_unlock();
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::terminal::write_fmt(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($fmt:expr) => ($crate::print!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => ($crate::print!(concat!($fmt, "\n"), $($arg)*));
}

#[macro_export]
macro_rules! printcol {
    ($color:expr, $($arg:tt)*) => {
        $crate::terminal::write_colored($color, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(term: &Terminal, row: usize) -> alloc::string::String {
        (0..term.cols())
            .map(|col| term.char_at(row, col))
            .collect::<alloc::string::String>()
            .trim_end()
            .into()
    }

    #[test]
    fn write_bytes_lands_in_cells() {
        let mut term = Terminal::new(80, 25);
        term.write_bytes(b"hi");
        assert_eq!(term.char_at(0, 0), 'h');
        assert_eq!(term.char_at(0, 1), 'i');
        assert_eq!(term.char_at(0, 2), ' ');
    }

    #[test]
    fn newline_moves_to_next_row() {
        let mut term = Terminal::new(80, 25);
        term.write_bytes(b"ab\ncd");
        assert_eq!(row_text(&term, 0), "ab");
        assert_eq!(row_text(&term, 1), "cd");
    }

    #[test]
    fn backspace_erases_previous_cell() {
        let mut term = Terminal::new(80, 25);
        term.write_bytes(b"ab\x08");
        assert_eq!(row_text(&term, 0), "a");
    }

    #[test]
    fn scrolls_when_bottom_row_wraps() {
        let mut term = Terminal::new(10, 2);
        term.write_bytes(b"one\ntwo\nthree");
        assert_eq!(row_text(&term, 0), "two");
        assert_eq!(row_text(&term, 1), "three");
    }

    #[test]
    fn long_line_wraps() {
        let mut term = Terminal::new(4, 2);
        term.write_bytes(b"abcdef");
        assert_eq!(row_text(&term, 0), "abcd");
        assert_eq!(row_text(&term, 1), "ef");
    }
}
