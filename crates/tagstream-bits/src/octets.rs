//! Hex previews of byte runs for log and error output.

/// Formats up to `max` bytes as space separated hex pairs.
///
/// # Example
///
/// ```
/// use tagstream_bits::hex_preview;
///
/// assert_eq!(hex_preview(&[0x3f, 0x03, 0x0a, 0xff], 16), "3f 03 0a ff");
/// assert_eq!(hex_preview(&[1, 2, 3], 2), "01 02 (+1 bytes)");
/// assert_eq!(hex_preview(&[], 16), "");
/// ```
pub fn hex_preview(octets: &[u8], max: usize) -> String {
    let shown: Vec<String> = octets.iter().take(max).map(|b| format!("{b:02x}")).collect();
    let mut result = shown.join(" ");
    if octets.len() > max {
        result.push_str(&format!(" (+{} bytes)", octets.len() - max));
    }
    result
}

/// Formats a byte run with a 16 byte limit.
pub fn hex_preview_default(octets: &[u8]) -> String {
    hex_preview(octets, 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncated() {
        let data: Vec<u8> = (0..20).collect();
        let result = hex_preview(&data, 10);
        assert!(result.starts_with("00 01 02"));
        assert!(result.ends_with("09 (+10 bytes)"));
    }

    #[test]
    fn test_preview_default() {
        assert_eq!(hex_preview_default(&[0xab]), "ab");
    }
}
