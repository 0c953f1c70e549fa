use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode response body with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode a response body into UTF-8 using: BOM -> Content-Type charset -> UTF-8.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedBody, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    // JSON bodies default to UTF-8.
    decode_with(bytes, UTF_8)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(&['"', '\''][..]).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedBody, DecodeError> {
    // `decode` strips a matching BOM and reports malformed sequences.
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: enc.name().to_string(),
            message: "malformed byte sequence".into(),
        });
    }
    Ok(DecodedBody {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
    })
}
