//! Consumed record values and their stdout rendering.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rdkafka::message::{BorrowedMessage, Message};

/// Marker printed in place of an absent record key.
const NULL_KEY_MARKER: &str = "<null>";

/// One record pulled from the topic.
///
/// Transient value: produced by the consume loop, rendered to stdout, then
/// discarded. The payload stays opaque; it is only base64-encoded for
/// display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedRecord {
    /// Record key, decoded as UTF-8 (lossily) when present.
    pub key: Option<String>,
    /// Raw payload bytes; `None` for tombstone records.
    pub payload: Option<Vec<u8>>,
    /// Topic the record was read from.
    pub topic: String,
    /// Offset of the record within its partition.
    pub offset: i64,
}

impl ConsumedRecord {
    /// Copies the relevant fields out of an rdkafka message.
    pub fn from_borrowed(message: &BorrowedMessage<'_>) -> Self {
        Self {
            key: message
                .key()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
            payload: message.payload().map(|bytes| bytes.to_vec()),
            topic: message.topic().to_string(),
            offset: message.offset(),
        }
    }

    /// Renders the record as its fixed stdout block.
    ///
    /// Returns `None` for records without a payload; those are skipped by
    /// the consume loop rather than printed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kanary::record::ConsumedRecord;
    ///
    /// let record = ConsumedRecord {
    ///     key: Some("order-7".to_string()),
    ///     payload: Some(b"hello".to_vec()),
    ///     topic: "demo".to_string(),
    ///     offset: 42,
    /// };
    /// let block = record.render().unwrap();
    /// assert!(block.contains("Value: aGVsbG8="));
    /// ```
    pub fn render(&self) -> Option<String> {
        let payload = self.payload.as_deref()?;
        let key = self.key.as_deref().unwrap_or(NULL_KEY_MARKER);
        Some(format!(
            "--- Message received ---\n\
             Key:   {key}\n\
             Value: {value}\n\
             Topic: {topic}\n\
             Offset:{offset}\n\
             -----------------------",
            key = key,
            value = STANDARD.encode(payload),
            topic = self.topic,
            offset = self.offset,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: Option<&str>, payload: Option<&[u8]>) -> ConsumedRecord {
        ConsumedRecord {
            key: key.map(String::from),
            payload: payload.map(<[u8]>::to_vec),
            topic: "demo.topic".to_string(),
            offset: 17,
        }
    }

    #[test]
    fn test_render_full_record() {
        let block = record(Some("k1"), Some(b"hello")).render().unwrap();
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(
            lines,
            vec![
                "--- Message received ---",
                "Key:   k1",
                "Value: aGVsbG8=",
                "Topic: demo.topic",
                "Offset:17",
                "-----------------------",
            ]
        );
    }

    #[test]
    fn test_render_absent_key_shows_marker() {
        let block = record(None, Some(b"v")).render().unwrap();
        assert!(block.contains("Key:   <null>"));
    }

    #[test]
    fn test_render_without_payload_is_skipped() {
        assert!(record(Some("k1"), None).render().is_none());
    }

    #[test]
    fn test_render_empty_payload_prints_empty_value() {
        let block = record(None, Some(b"")).render().unwrap();
        assert!(block.contains("Value: \n"));
    }

    #[test]
    fn test_render_binary_payload_is_base64() {
        let block = record(None, Some(&[0u8, 159, 146, 150])).render().unwrap();
        assert!(block.contains(&format!("Value: {}", STANDARD.encode([0u8, 159, 146, 150]))));
    }
}
