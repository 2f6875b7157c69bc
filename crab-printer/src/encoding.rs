//! GBK encoding utilities for thermal printers
//!
//! Thermal printers sold in the region run in GBK code page mode, which
//! also covers plain ASCII. This module:
//! - measures and pads strings by printed (GBK byte) width
//! - converts builder output to GBK while leaving ESC/POS commands intact

use tracing::instrument;

/// FS & + FS C 1: enter Chinese mode, select GBK
const ENTER_GBK: [u8; 5] = [0x1C, 0x26, 0x1C, 0x43, 0x01];
/// FS .: leave Chinese mode
const LEAVE_GBK: [u8; 2] = [0x1C, 0x2E];

/// Printed width of a single character
fn char_width(c: char) -> usize {
    if c.is_ascii() {
        return 1;
    }
    let mut tmp = [0u8; 4];
    let (cow, _, _) = encoding_rs::GBK.encode(c.encode_utf8(&mut tmp));
    cow.len()
}

/// Get the GBK byte width of a string
pub fn gbk_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Truncate a string to fit within a GBK byte width
pub fn truncate_gbk(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        let w = char_width(c);
        if width + w > max_width {
            break;
        }
        result.push(c);
        width += w;
    }
    result
}

/// Convert builder output (UTF-8 text mixed with ESC/POS commands) to GBK,
/// appending into a caller-owned buffer so the allocation can be reused
/// between jobs.
///
/// ASCII bytes (0x00-0x7F) pass through untouched, which keeps ESC/POS
/// commands intact; runs of bytes >= 0x80 are decoded as UTF-8 and
/// re-encoded as GBK. Chinese mode is re-enabled after every INIT (ESC @).
#[instrument(skip_all, fields(input_len = bytes.len()))]
pub fn convert_to_gbk_into(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&ENTER_GBK);

    let mut pending = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];

        if b == 0x1B && bytes.get(i + 1) == Some(&0x40) {
            flush_pending(&mut pending, out);
            out.extend_from_slice(&[0x1B, 0x40]);
            out.extend_from_slice(&ENTER_GBK[..2]);
            i += 2;
            continue;
        }

        if b.is_ascii() {
            flush_pending(&mut pending, out);
            out.push(b);
        } else {
            pending.push(b);
        }
        i += 1;
    }
    flush_pending(&mut pending, out);

    out.extend_from_slice(&LEAVE_GBK);
}

/// Encode a pending non-ASCII run as GBK
///
/// The rupee sign has no GBK code point and is printed as `Rs`.
fn flush_pending(pending: &mut Vec<u8>, out: &mut Vec<u8>) {
    if pending.is_empty() {
        return;
    }

    let text = String::from_utf8_lossy(pending);
    for (idx, part) in text.split('₹').enumerate() {
        if idx > 0 {
            out.extend_from_slice(b"Rs");
        }
        if !part.is_empty() {
            let (gbk, _, _) = encoding_rs::GBK.encode(part);
            out.extend_from_slice(&gbk);
        }
    }
    pending.clear();
}
