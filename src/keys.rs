//! Symbolic key names to the bytes a terminal sends for them.

/// Map a key name to its byte sequence.
///
/// Names are matched case-insensitively. Anything not in the table is sent
/// literally, so `"y"` sends `y` and `"Q"` sends `Q`.
pub fn key_to_bytes(name: &str) -> Vec<u8> {
    let bytes: &[u8] = match name.to_ascii_lowercase().as_str() {
        "enter" | "return" => b"\r",
        "tab" => b"\t",
        "escape" | "esc" => b"\x1b",
        "backspace" => b"\x7f",
        "delete" => b"\x1b[3~",
        "up" => b"\x1b[A",
        "down" => b"\x1b[B",
        "right" => b"\x1b[C",
        "left" => b"\x1b[D",
        "home" => b"\x1b[H",
        "end" => b"\x1b[F",
        "ctrl+c" => b"\x03",
        "ctrl+d" => b"\x04",
        "ctrl+z" => b"\x1a",
        "ctrl+l" => b"\x0c",
        _ => name.as_bytes(),
    };
    bytes.to_vec()
}
