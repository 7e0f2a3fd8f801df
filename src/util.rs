use crate::ParseErr;

/// Parse a 16-bit value from the hex-string convention used by the job
/// driver's JSON files (`"0x0168"`, `"0x21"`). The `0x` prefix is optional
/// and digit case does not matter.
pub(crate) fn parse_hex_u16(text: &str) -> Result<u16, ParseErr> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u16::from_str_radix(digits, 16).map_err(|_| ParseErr::InvalidHex(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_driver_formats() {
        assert_eq!(parse_hex_u16("0x0168"), Ok(0x168));
        assert_eq!(parse_hex_u16("0X21"), Ok(0x21));
        assert_eq!(parse_hex_u16("ff"), Ok(0xFF));
        assert_eq!(parse_hex_u16("0xAbCd"), Ok(0xABCD));
    }

    #[test]
    fn rejects_junk() {
        assert_matches!(parse_hex_u16(""), Err(ParseErr::InvalidHex(_)));
        assert_matches!(parse_hex_u16("0x"), Err(ParseErr::InvalidHex(_)));
        assert_matches!(parse_hex_u16("0xG1"), Err(ParseErr::InvalidHex(_)));
        assert_matches!(parse_hex_u16("0x12345"), Err(ParseErr::InvalidHex(_)));
    }
}
