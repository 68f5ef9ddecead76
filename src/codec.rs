//
// SPDX-License-Identifier: MIT
//

//! The wire codec. Three message kinds share one datagram stream; the
//! first byte discriminates. UTF-8 throughout; messages are self-delimited
//! by the datagram boundary, there is no length prefix or framing.

use crate::node::NodeId;

/// A maximum datagram size senders should stay under. Fragmentation across
/// datagrams is not supported.
pub const MAX_DATAGRAM: usize = 1024;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message {
    /// `@<NodeId>` ("I am NodeId, hello / keepalive").
    Join(NodeId),
    /// `*<dst1>;<m1>*<dst2>;<m2>...`, a distance vector.
    Vector(Vec<(NodeId, u16)>),
    /// `!<src>;<dst>;<text>`, a user datagram.
    Text { src: NodeId, dst: NodeId, body: String },
}

impl Message {
    /// Encodes the message into datagram bytes. Returns `None` for an empty
    /// vector: the protocol suppresses the message entirely rather than
    /// emitting `*` with no records.
    pub fn encode(&self) -> Option<Vec<u8>> {
        match self {
            Message::Join(id) => Some(format!("@{id}").into_bytes()),
            Message::Vector(records) => {
                if records.is_empty() {
                    return None;
                }
                let mut out = String::new();
                for (dst, metric) in records {
                    out.push('*');
                    out.push_str(dst.as_str());
                    out.push(';');
                    out.push_str(&metric.to_string());
                }
                Some(out.into_bytes())
            }
            Message::Text { src, dst, body } => {
                Some(format!("!{src};{dst};{body}").into_bytes())
            }
        }
    }

    /// Decodes a received datagram. Returns `None` if the datagram is empty
    /// or its first byte names none of the three known kinds. Malformed
    /// records inside a vector are skipped individually rather than failing
    /// the whole decode.
    pub fn decode(bytes: &[u8]) -> Option<Message> {
        let text = std::str::from_utf8(bytes).ok()?;
        let mut chars = text.chars();
        let kind = chars.next()?;
        let body = &text[kind.len_utf8()..];
        match kind {
            '@' => Some(Message::Join(NodeId::new(body))),
            '*' => Some(Message::Vector(decode_vector(body))),
            '!' => decode_text(body),
            _ => None,
        }
    }
}

fn decode_vector(body: &str) -> Vec<(NodeId, u16)> {
    body.split('*')
        .filter(|record| !record.is_empty())
        .filter_map(|record| {
            let (dst, metric_str) = record.split_once(';')?;
            let metric: u16 = metric_str.parse().ok()?;
            Some((NodeId::new(dst), metric))
        })
        .collect()
}

fn decode_text(body: &str) -> Option<Message> {
    let mut parts = body.splitn(3, ';');
    let src = parts.next()?;
    let dst = parts.next()?;
    let text = parts.next()?;
    Some(Message::Text {
        src: NodeId::new(src),
        dst: NodeId::new(dst),
        body: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    #[test]
    fn join_round_trips() {
        let msg = Message::Join(id("192.168.1.1"));
        let bytes = msg.encode().unwrap();
        assert_eq!(bytes, b"@192.168.1.1");
        assert_eq!(Message::decode(&bytes), Some(msg));
    }

    #[test]
    fn vector_round_trips_preserving_order() {
        let msg = Message::Vector(vec![(id("B"), 1), (id("C"), 2)]);
        let bytes = msg.encode().unwrap();
        assert_eq!(bytes, b"*B;1*C;2");
        assert_eq!(Message::decode(&bytes), Some(msg));
    }

    #[test]
    fn empty_vector_is_suppressed_not_emitted_empty() {
        let msg = Message::Vector(vec![]);
        assert_eq!(msg.encode(), None);
    }

    #[test]
    fn vector_decode_skips_malformed_records_but_keeps_the_rest() {
        let decoded = Message::decode(b"*B;1*garbage*C;notanumber*D;4").unwrap();
        assert_eq!(decoded, Message::Vector(vec![(id("B"), 1), (id("D"), 4)]));
    }

    #[test]
    fn text_round_trips_preserving_embedded_separators() {
        let msg = Message::Text {
            src: id("A"),
            dst: id("C"),
            body: "hello; world; again".to_string(),
        };
        let bytes = msg.encode().unwrap();
        assert_eq!(Message::decode(&bytes), Some(msg));
    }

    #[test]
    fn text_with_fewer_than_three_fields_is_dropped() {
        assert_eq!(Message::decode(b"!A;B"), None);
        assert_eq!(Message::decode(b"!A"), None);
    }

    #[test]
    fn unrecognized_prefix_is_dropped() {
        assert_eq!(Message::decode(b"?not-a-real-message"), None);
        assert_eq!(Message::decode(b""), None);
    }
}
