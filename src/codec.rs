//! Base64 transport encoding.
//!
//! Upstream subscriptions are decoded leniently: line wrapping is ignored and
//! padding is optional. The merged response is always encoded with the
//! standard, padded alphabet in one piece.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

pub use base64::DecodeError;

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a subscription body into raw bytes.
pub fn decode_subscription(body: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: Vec<u8> = body
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    LENIENT.decode(compact)
}

/// Encode a merged payload for the response body.
pub fn encode_payload(payload: &[u8]) -> String {
    STANDARD.encode(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain() {
        assert_eq!(decode_subscription("QQ==").unwrap(), b"A");
    }

    #[test]
    fn test_decode_wrapped_and_unpadded() {
        let wrapped = "dmxlc3M6Ly9h\r\nQGI6MQ\n";
        assert_eq!(decode_subscription(wrapped).unwrap(), b"vless://a@b:1");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_subscription("<html>not base64</html>").is_err());
    }

    #[test]
    fn test_encode_is_padded() {
        assert_eq!(encode_payload(b"A\nvless://x"), "QQp2bGVzczovL3g=");
    }
}
