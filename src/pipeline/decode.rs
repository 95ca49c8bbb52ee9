//! Decode stage: raw bytes → UTF-8 text.

use std::string::FromUtf8Error;

/// Interpret the fetched body as UTF-8. Invalid sequences are an error, not
/// replaced, so a corrupt download never reaches the rewrite stage.
pub fn decode_text(bytes: Vec<u8>) -> Result<String, FromUtf8Error> {
    String::from_utf8(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf8() {
        assert_eq!(decode_text("# Grüße".as_bytes().to_vec()).unwrap(), "# Grüße");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = decode_text(vec![b'#', b' ', 0xff, 0xfe]).unwrap_err();
        assert!(err.to_string().contains("invalid utf-8"), "got: {err}");
    }
}
