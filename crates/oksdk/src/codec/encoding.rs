use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::SdkError;

pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

pub fn decode_base64(data: &str) -> Result<Vec<u8>, SdkError> {
    Ok(STANDARD.decode(data.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_padding() {
        assert_eq!(encode_base64(b"ok"), "b2s=");
    }

    #[test]
    fn decodes_and_trims_whitespace() {
        assert_eq!(decode_base64(" b2s=\n").unwrap(), b"ok");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode_base64("!!!"), Err(SdkError::Base64(_))));
    }
}
