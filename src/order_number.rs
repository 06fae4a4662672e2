//! Customer-facing order numbers and the references used to look orders up.
//!
//! New orders are numbered `ORD` + the insertion sequence zero-padded to five
//! digits (`1` becomes `ORD00001`). Lookups accept three spellings of the same
//! order:
//!
//! - the order number itself, `ORD00042`
//! - the legacy form with a leading `#`, `#ORD00042`
//! - the opaque [`RecordId`] of the stored document
//!
//! [`OrderRef::parse`] normalises the input; the actual lookup lives in
//! [`OrderClient::resolve`](crate::clients::OrderClient::resolve).
//!
//! Five digits run out at sequence 99 999. What happens next is a deployment
//! decision, expressed as an [`OverflowPolicy`].

use crate::model::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ORDER_NUMBER_PREFIX: &str = "ORD";
pub const LEGACY_PREFIX: char = '#';
pub const ORDER_NUMBER_DIGITS: usize = 5;
pub const MAX_FIXED_WIDTH_SEQUENCE: u32 = 99_999;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderNumberError {
    #[error("order sequence must start at 1")]
    ZeroSequence,
    #[error("order sequence {sequence} does not fit in five digits")]
    Exhausted { sequence: u32 },
    #[error("order reference is empty")]
    EmptyReference,
    #[error("order reference is malformed: {0:?}")]
    MalformedReference(String),
}

/// What to do once the sequence passes [`MAX_FIXED_WIDTH_SEQUENCE`].
///
/// `Widen` keeps numbering (`ORD100000`) but the numbers stop sorting
/// lexicographically against five-digit ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    #[default]
    Reject,
    Widen,
}

/// A display identifier such as `ORD00007`.
///
/// Stored numbers are compared byte-for-byte; deserialising does not
/// re-validate so that numbers minted under older schemes still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Formats the number for an insertion sequence.
    pub fn format(sequence: u32, policy: OverflowPolicy) -> Result<Self, OrderNumberError> {
        if sequence == 0 {
            return Err(OrderNumberError::ZeroSequence);
        }
        if sequence > MAX_FIXED_WIDTH_SEQUENCE && policy == OverflowPolicy::Reject {
            return Err(OrderNumberError::Exhausted { sequence });
        }
        Ok(Self(format!(
            "{ORDER_NUMBER_PREFIX}{sequence:0width$}",
            width = ORDER_NUMBER_DIGITS
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The sequence encoded in a well-formed number.
    pub fn sequence(&self) -> Option<u32> {
        let digits = self.0.strip_prefix(ORDER_NUMBER_PREFIX)?;
        if digits.len() < ORDER_NUMBER_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OrderNumber> for String {
    fn from(number: OrderNumber) -> Self {
        number.0
    }
}

/// A caller-supplied order identifier with the legacy `#` already stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderRef(String);

impl OrderRef {
    /// Normalises raw input.
    ///
    /// Surrounding whitespace and one leading `#` are removed. What remains must
    /// be non-empty and free of whitespace, control characters and further `#`.
    pub fn parse(input: &str) -> Result<Self, OrderNumberError> {
        let trimmed = input.trim();
        let key = trimmed.strip_prefix(LEGACY_PREFIX).unwrap_or(trimmed);
        if key.is_empty() {
            return Err(OrderNumberError::EmptyReference);
        }
        if key
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == LEGACY_PREFIX)
        {
            return Err(OrderNumberError::MalformedReference(input.to_string()));
        }
        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reference read as an opaque record id, when it has that shape.
    pub fn record_id(&self) -> Option<RecordId> {
        self.0.parse().ok()
    }

    pub fn is_order_number(&self, number: &OrderNumber) -> bool {
        self.0 == number.as_str()
    }
}

impl fmt::Display for OrderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(sequence: u32) -> String {
        OrderNumber::format(sequence, OverflowPolicy::Reject)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_format_examples() {
        assert_eq!(format(1), "ORD00001");
        assert_eq!(format(42), "ORD00042");
        assert_eq!(format(99_999), "ORD99999");
    }

    #[test]
    fn test_fixed_width_range_is_sortable() {
        let mut previous = format(1);
        for sequence in 2..=MAX_FIXED_WIDTH_SEQUENCE {
            let current = format(sequence);
            assert_eq!(current.len(), 8);
            assert!(current.starts_with("ORD"));
            assert!(current > previous, "{current} should sort after {previous}");
            previous = current;
        }
    }

    #[test]
    fn test_zero_is_rejected() {
        assert_eq!(
            OrderNumber::format(0, OverflowPolicy::Widen),
            Err(OrderNumberError::ZeroSequence)
        );
    }

    #[test]
    fn test_overflow_policy() {
        assert_eq!(
            OrderNumber::format(100_000, OverflowPolicy::Reject),
            Err(OrderNumberError::Exhausted { sequence: 100_000 })
        );
        let widened = OrderNumber::format(100_000, OverflowPolicy::Widen).unwrap();
        assert_eq!(widened.as_str(), "ORD100000");
        assert_eq!(widened.sequence(), Some(100_000));
    }

    #[test]
    fn test_sequence_round_trip_and_foreign_numbers() {
        assert_eq!(OrderNumber::format(7, OverflowPolicy::Reject).unwrap().sequence(), Some(7));
        let foreign: OrderNumber = serde_json::from_str("\"ORD7\"").unwrap();
        assert_eq!(foreign.sequence(), None);
    }

    #[test]
    fn test_reference_strips_legacy_prefix() {
        assert_eq!(OrderRef::parse("#ORD00007").unwrap(), OrderRef::parse("ORD00007").unwrap());
        assert_eq!(OrderRef::parse("  #ORD00007 ").unwrap().as_str(), "ORD00007");
    }

    #[test]
    fn test_reference_rejects_empty_and_malformed() {
        assert_eq!(OrderRef::parse(""), Err(OrderNumberError::EmptyReference));
        assert_eq!(OrderRef::parse("#"), Err(OrderNumberError::EmptyReference));
        assert_eq!(OrderRef::parse("   "), Err(OrderNumberError::EmptyReference));
        assert!(matches!(OrderRef::parse("##ORD00001"), Err(OrderNumberError::MalformedReference(_))));
        assert!(matches!(OrderRef::parse("ORD 00001"), Err(OrderNumberError::MalformedReference(_))));
    }

    #[test]
    fn test_reference_record_id_shape() {
        let id = RecordId::from_parts(1, [0; 5], 3);
        let by_id = OrderRef::parse(&id.to_string()).unwrap();
        assert_eq!(by_id.record_id(), Some(id));
        assert_eq!(OrderRef::parse("ORD00003").unwrap().record_id(), None);
        assert_eq!(OrderRef::parse("not-an-id").unwrap().record_id(), None);
    }
}
