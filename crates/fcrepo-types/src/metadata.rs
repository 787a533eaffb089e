use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length in bytes of a SHA-512 digest.
const SHA512_LEN: usize = 64;

/// Technical metadata the repository reports for a stored binary.
///
/// Values are kept exactly as the repository sent them; the typed accessors
/// convert on demand.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceMetadata {
    file_size: String,
    checksum_sha512: String,
}

impl ResourceMetadata {
    pub fn new(file_size: impl Into<String>, checksum_sha512: impl Into<String>) -> Self {
        Self {
            file_size: file_size.into(),
            checksum_sha512: checksum_sha512.into(),
        }
    }

    /// File size as a decimal string.
    pub fn file_size(&self) -> &str {
        &self.file_size
    }

    /// Hex-encoded SHA-512 digest, without any `urn:` prefix.
    pub fn checksum_sha512(&self) -> &str {
        &self.checksum_sha512
    }

    /// File size parsed as a byte count.
    pub fn file_size_bytes(&self) -> Result<u64, TypeError> {
        self.file_size
            .parse()
            .map_err(|_| TypeError::InvalidFileSize(self.file_size.clone()))
    }

    /// Decoded digest bytes.
    pub fn checksum_bytes(&self) -> Result<Vec<u8>, TypeError> {
        let bytes =
            hex::decode(&self.checksum_sha512).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != SHA512_LEN {
            return Err(TypeError::InvalidLength {
                expected: SHA512_LEN,
                actual: bytes.len(),
            });
        }
        Ok(bytes)
    }
}

/// Descriptive metadata a caller stores on a resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceMetadataToUpdate {
    original_file_name: String,
    mime_type: String,
}

impl ResourceMetadataToUpdate {
    pub fn new(original_file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            original_file_name: original_file_name.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn original_file_name(&self) -> &str {
        &self.original_file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUM: &str = "71d0d4ffd68b9ce30008f5e01c54f75d1d9d016aa72b513e70c9321575a6add0\
                            2e6f89790d2f38dbe4d09b4d6e07a51c9215b425ef381b1b785195d957e65fb0";

    #[test]
    fn accessors_return_raw_values() {
        let m = ResourceMetadata::new("1865987", CHECKSUM);
        assert_eq!(m.file_size(), "1865987");
        assert_eq!(m.checksum_sha512(), CHECKSUM);
    }

    #[test]
    fn file_size_parses() {
        let m = ResourceMetadata::new("1865987", CHECKSUM);
        assert_eq!(m.file_size_bytes().unwrap(), 1_865_987);
    }

    #[test]
    fn file_size_rejects_garbage() {
        let m = ResourceMetadata::new("12kb", CHECKSUM);
        assert_eq!(
            m.file_size_bytes().unwrap_err(),
            TypeError::InvalidFileSize("12kb".into())
        );
    }

    #[test]
    fn checksum_decodes_to_64_bytes() {
        let m = ResourceMetadata::new("1", CHECKSUM);
        let bytes = m.checksum_bytes().unwrap();
        assert_eq!(bytes.len(), 64);
        assert_eq!(bytes[0], 0x71);
        assert_eq!(bytes[63], 0xb0);
    }

    #[test]
    fn checksum_rejects_wrong_length() {
        let m = ResourceMetadata::new("1", "abcd");
        assert_eq!(
            m.checksum_bytes().unwrap_err(),
            TypeError::InvalidLength { expected: 64, actual: 2 }
        );
    }

    #[test]
    fn checksum_rejects_non_hex() {
        let m = ResourceMetadata::new("1", "zz");
        assert!(matches!(m.checksum_bytes(), Err(TypeError::InvalidHex(_))));
    }

    #[test]
    fn metadata_serializes_to_json() {
        let m = ResourceMetadata::new("10", "ab");
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["file_size"], "10");
        assert_eq!(json["checksum_sha512"], "ab");
    }

    #[test]
    fn metadata_to_update_accessors() {
        let u = ResourceMetadataToUpdate::new("f.jpg", "image/jpeg");
        assert_eq!(u.original_file_name(), "f.jpg");
        assert_eq!(u.mime_type(), "image/jpeg");
    }
}
