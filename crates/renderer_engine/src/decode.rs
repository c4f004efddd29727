use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown encoding label {0:?}")]
    UnknownLabel(String),
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode raw bytes using: BOM -> declared label -> strict UTF-8.
///
/// Malformed sequences are an error, never replaced.
pub fn decode_text(bytes: &[u8], declared: Option<&str>) -> Result<String, DecodeError> {
    // 1) BOM wins over any declaration
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    // 2) configured label
    if let Some(label) = declared.map(str::trim).filter(|l| !l.is_empty()) {
        let enc = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| DecodeError::UnknownLabel(label.to_string()))?;
        return decode_with(bytes, enc);
    }

    // 3) UTF-8 without guessing
    decode_with(bytes, UTF_8)
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<String, DecodeError> {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: enc.name().to_string(),
            message: "invalid byte sequence".into(),
        });
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::{decode_text, DecodeError};

    #[test]
    fn plain_utf8_is_accepted() {
        let decoded = decode_text("zażółć gęślą jaźń".as_bytes(), None).unwrap();
        assert_eq!(decoded, "zażółć gęślą jaźń");
    }

    #[test]
    fn bom_is_stripped_and_wins_over_label() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"hello");
        let decoded = decode_text(&bytes, Some("windows-1250")).unwrap();
        assert_eq!(decoded, "hello");
    }

    #[test]
    fn declared_label_decodes_legacy_bytes() {
        // "Łódź" in windows-1250
        let bytes = [0xA3, 0xF3, 0x64, 0x9F];
        let decoded = decode_text(&bytes, Some("windows-1250")).unwrap();
        assert_eq!(decoded, "Łódź");
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let err = decode_text(&[0x66, 0x6f, 0xff, 0x6f], None).unwrap_err();
        assert!(matches!(err, DecodeError::DecodeFailure { ref encoding, .. } if encoding == "UTF-8"));
    }

    #[test]
    fn unknown_label_is_reported() {
        let err = decode_text(b"abc", Some("klingon-8")).unwrap_err();
        assert_eq!(err, DecodeError::UnknownLabel("klingon-8".to_string()));
    }
}
