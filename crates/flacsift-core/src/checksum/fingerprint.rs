use serde::{Serialize, Serializer};
use std::fmt;

/// 128-bit MD5 of the decoded audio samples.
///
/// Two files with equal fingerprints carry the same audio, whatever their tags,
/// padding or encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ContentFingerprint([u8; 16]);

impl ContentFingerprint {
    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// An all-zero value means the encoder never filled in the signature.
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 16]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentFingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
