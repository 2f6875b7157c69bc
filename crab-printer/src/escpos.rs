//! ESC/POS command builder
//!
//! Commands and UTF-8 text accumulate in one byte buffer which is GBK
//! encoded by [`EscPosBuilder::encode_into`]. The buffer can be cleared and
//! refilled, so a single builder serves many tickets without reallocating.

use crate::encoding::{convert_to_gbk_into, gbk_width, truncate_gbk};

const INIT: [u8; 2] = [0x1B, 0x40];

/// ESC/POS command builder
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
}

impl EscPosBuilder {
    /// Create a new builder with the specified paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(4096);
        buf.extend_from_slice(&INIT);
        Self { buf, width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Change the paper width for the next document
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// True when nothing has been written since the last clear
    pub fn is_empty(&self) -> bool {
        self.buf.len() <= INIT.len()
    }

    /// Buffer capacity in bytes (kept across [`clear`](Self::clear))
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Drop all content and start a fresh document, keeping the allocation
    pub fn clear(&mut self) {
        self.buf.clear();
        self.buf.extend_from_slice(&INIT);
    }

    // === Text Output ===

    /// Write raw text (GBK encoded on build)
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines (ESC d n)
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    /// Write text wrapped to the paper width, continuation lines indented
    pub fn line_wrapped(&mut self, s: &str, indent: usize) -> &mut Self {
        let mut rest = s;
        let mut first = true;
        while !rest.is_empty() {
            let avail = if first {
                self.width
            } else {
                self.width.saturating_sub(indent).max(1)
            };
            let mut chunk = truncate_gbk(rest, avail);
            if chunk.is_empty() {
                // Single char wider than the line
                chunk = rest.chars().take(1).collect();
            }
            if !first {
                self.text(&" ".repeat(indent));
            }
            self.line(&chunk);
            rest = &rest[chunk.len()..];
            first = false;
        }
        self
    }

    // === Alignment ===

    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x00]);
        self
    }

    // === Text Style ===

    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x11]);
        self
    }

    pub fn double_height(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x01]);
        self
    }

    pub fn reset_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x00]);
        self
    }

    /// White on black (GS B 1)
    pub fn reverse(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x42, 0x01]);
        self
    }

    pub fn reverse_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x42, 0x00]);
        self
    }

    /// Line marked as struck out
    ///
    /// ESC/POS has no strike-through attribute; the line is printed in
    /// reverse with `X` rules on both sides.
    pub fn struck_line(&mut self, s: &str) -> &mut Self {
        self.reverse();
        self.text("X ");
        self.text(s);
        self.text(" X");
        self.reverse_off();
        self.newline()
    }

    // === Separators ===

    pub fn sep_double(&mut self) -> &mut Self {
        self.line(&"=".repeat(self.width))
    }

    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    // === Layout Helpers ===

    /// Print left and right text on the same line
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = gbk_width(left);
        let rw = gbk_width(right);

        if lw + rw >= self.width {
            self.text(left);
            self.text(" ");
            self.line(right)
        } else {
            let spaces = " ".repeat(self.width - lw - rw);
            self.text(left);
            self.text(&spaces);
            self.line(right)
        }
    }

    // === Paper Control ===

    /// Full cut (GS V 0)
    pub fn cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    // === Build ===

    /// Raw (not yet GBK encoded) content
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append the GBK encoded document to `out`, keeping this builder intact
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        convert_to_gbk_into(&self.buf, out);
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(48)
    }
}
