//! Opaque document ids.
//!
//! A `RecordId` is 12 bytes laid out like a document-store object id:
//!
//! ```text
//! | 4 bytes creation secs (BE) | 5 bytes process nonce | 3 bytes counter (BE) |
//! ```
//!
//! Its text form is 24 lowercase hex characters. Parsing accepts either case.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const RECORD_ID_LEN: usize = 12;
const COUNTER_MASK: u32 = 0x00FF_FFFF;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordIdError {
    #[error("record id must be 24 hex characters, got {0}")]
    Length(usize),
    #[error("record id is not hex: {0}")]
    NotHex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId([u8; RECORD_ID_LEN]);

fn process_nonce() -> [u8; 5] {
    static NONCE: OnceLock<[u8; 5]> = OnceLock::new();
    *NONCE.get_or_init(|| {
        let random = uuid::Uuid::new_v4();
        let mut nonce = [0u8; 5];
        nonce.copy_from_slice(&random.as_bytes()[..5]);
        nonce
    })
}

impl RecordId {
    pub fn from_parts(timestamp: u32, nonce: [u8; 5], counter: u32) -> Self {
        let mut bytes = [0u8; RECORD_ID_LEN];
        bytes[..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(&nonce);
        bytes[9..].copy_from_slice(&(counter & COUNTER_MASK).to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Creation time in unix seconds.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Low 24 bits of the collection counter the id was minted from.
    pub fn counter(&self) -> u32 {
        u32::from_be_bytes([0, self.0[9], self.0[10], self.0[11]])
    }

    pub fn as_bytes(&self) -> &[u8; RECORD_ID_LEN] {
        &self.0
    }
}

/// Mints a fresh id for the given collection counter.
impl From<u32> for RecordId {
    fn from(counter: u32) -> Self {
        let now = chrono::Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        Self::from_parts(now, process_nonce(), counter)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != RECORD_ID_LEN * 2 {
            return Err(RecordIdError::Length(s.len()));
        }
        let mut bytes = [0u8; RECORD_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| RecordIdError::NotHex(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let id = RecordId::from_parts(0x6553_f100, [1, 2, 3, 4, 5], 7);
        assert_eq!(id.to_string(), "6553f1000102030405000007");
        assert_eq!(id.timestamp(), 0x6553_f100);
        assert_eq!(id.counter(), 7);
    }

    #[test]
    fn test_minted_ids_share_nonce_and_differ_by_counter() {
        let a = RecordId::from(1);
        let b = RecordId::from(2);
        assert_ne!(a, b);
        assert_eq!(a.as_bytes()[4..9], b.as_bytes()[4..9]);
        assert_eq!(b.counter(), 2);
    }

    #[test]
    fn test_parse_accepts_either_case() {
        let id: RecordId = "6553F1000102030405000007".parse().unwrap();
        assert_eq!(id, RecordId::from_parts(0x6553_f100, [1, 2, 3, 4, 5], 7));
    }

    #[test]
    fn test_parse_rejects_non_ids() {
        assert_eq!("".parse::<RecordId>(), Err(RecordIdError::Length(0)));
        assert_eq!("ORD00001".parse::<RecordId>(), Err(RecordIdError::Length(8)));
        assert!(matches!(
            "zz53f1000102030405000007".parse::<RecordId>(),
            Err(RecordIdError::NotHex(_))
        ));
    }
}
