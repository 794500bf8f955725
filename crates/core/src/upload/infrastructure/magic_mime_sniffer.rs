use crate::upload::domain::mime_sniffer::MimeSniffer;

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const TIFF_LE: &[u8] = b"II*\0";
const TIFF_BE: &[u8] = b"MM\0*";
const ICO: &[u8] = &[0x00, 0x00, 0x01, 0x00];
const PDF: &[u8] = b"%PDF-";
const ZIP: &[u8] = b"PK\x03\x04";
const GZIP: &[u8] = &[0x1F, 0x8B];

/// BMP file header (14 bytes) plus the smallest info header (12 bytes).
const BMP_MIN_LEN: usize = 26;

/// Magic-number content sniffer.
///
/// Recognises the raster formats the `image` crate can decode, a handful of
/// common non-image containers, and plain text, so rejections can name what
/// was actually uploaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct MagicMimeSniffer;

impl MagicMimeSniffer {
    pub fn new() -> Self {
        Self
    }
}

impl MimeSniffer for MagicMimeSniffer {
    fn sniff(&self, data: &[u8]) -> String {
        sniff_image(data)
            .or_else(|| sniff_other(data))
            .unwrap_or("application/octet-stream")
            .to_string()
    }
}

fn sniff_image(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(JPEG) {
        return Some("image/jpeg");
    }
    if data.starts_with(PNG) {
        return Some("image/png");
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if data.len() >= 12
        && &data[4..8] == b"ftyp"
        && (&data[8..12] == b"avif" || &data[8..12] == b"avis")
    {
        return Some("image/avif");
    }
    if data.starts_with(TIFF_LE) || data.starts_with(TIFF_BE) {
        return Some("image/tiff");
    }
    // "BM" alone is too weak: require the reserved header words to be zero.
    if data.len() >= BMP_MIN_LEN && data.starts_with(b"BM") && data[6..10] == [0, 0, 0, 0] {
        return Some("image/bmp");
    }
    if data.len() >= 6 && data.starts_with(ICO) && data[4..6] != [0, 0] {
        return Some("image/vnd.microsoft.icon");
    }
    None
}

fn sniff_other(data: &[u8]) -> Option<&'static str> {
    if data.is_empty() {
        return Some("application/x-empty");
    }
    if data.starts_with(PDF) {
        return Some("application/pdf");
    }
    if data.starts_with(ZIP) {
        return Some("application/zip");
    }
    if data.starts_with(GZIP) {
        return Some("application/gzip");
    }
    if is_text(data) {
        return Some("text/plain");
    }
    None
}

fn is_text(data: &[u8]) -> bool {
    match std::str::from_utf8(data) {
        Ok(text) => !text
            .chars()
            .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\x0c')),
        Err(_) => false,
    }
}
