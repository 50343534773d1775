// This file is part of ENSNode.
//
// ENSNode is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// ENSNode is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with ENSNode.
// If not, see https://www.gnu.org/licenses/.

//! Name hierarchy utilities.
//!
//! ENS names are dot separated sequences of labels. The protocol identifies a
//! name by its node, the recursive keccak256 hash of its labels with the
//! outermost (top level) label hashed first.

use alloy_primitives::{hex, keccak256, Bytes, B256};

/// 32 byte protocol identifier of a name (EIP-137 namehash).
pub type Node = B256;

/// keccak256 hash of a single label.
pub type LabelHash = B256;

/// Node of the root name.
pub const ROOT_NODE: Node = B256::ZERO;

/// Maximum length of a single label inside a DNS encoded name.
const MAX_DNS_LABEL_LEN: usize = 255;

/// Errors produced when interpreting DNS encoded names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// Offset points past the end of the encoded name
    #[error("offset {offset} is out of bounds for a dns-encoded name of {len} bytes")]
    OffsetOutOfBounds {
        /// offending offset
        offset: usize,
        /// length of the encoded name
        len: usize,
    },
    /// Offset points into the middle of a label
    #[error("offset {0} does not fall on a label boundary")]
    OffsetNotOnLabelBoundary(usize),
    /// The encoded name is truncated or otherwise invalid
    #[error("malformed dns-encoded name")]
    MalformedDnsName,
}

/// Iterate the labels of a name from most to least specific.
///
/// The root name (`""`) has no labels.
pub fn labels(name: &str) -> impl Iterator<Item = &str> {
    name.split('.').filter(move |_| !name.is_empty())
}

/// Returns the literal labelhash if `label` is an encoded labelhash, `[<64 hex chars>]`.
pub fn decode_encoded_labelhash(label: &str) -> Option<LabelHash> {
    let inner = label.strip_prefix('[')?.strip_suffix(']')?;
    if inner.len() != 64
        || !inner
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return None;
    }
    inner.parse().ok()
}

/// Formats a labelhash as an encoded labelhash label.
pub fn encode_labelhash(labelhash: LabelHash) -> String {
    format!("[{}]", hex::encode(labelhash))
}

/// Hash a single label. Encoded labelhash labels hash to their literal value.
pub fn labelhash(label: &str) -> LabelHash {
    decode_encoded_labelhash(label).unwrap_or_else(|| keccak256(label.as_bytes()))
}

/// Compute the node of a name.
pub fn namehash(name: &str) -> Node {
    let labels: Vec<&str> = labels(name).collect();
    labels.iter().rev().fold(ROOT_NODE, |node, label| {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(labelhash(label).as_slice());
        keccak256(buf)
    })
}

/// Ordered ancestor names of `name`, the name itself first.
///
/// `a.b.eth` yields `[a.b.eth, b.eth, eth]`. The root name yields `[""]`.
pub fn name_hierarchy(name: &str) -> Vec<String> {
    if name.is_empty() {
        return vec![String::new()];
    }
    let labels: Vec<&str> = labels(name).collect();
    (0..labels.len()).map(|i| labels[i..].join(".")).collect()
}

/// Ancestor names of `name` paired with their nodes, most specific first.
pub fn name_hierarchy_with_nodes(name: &str) -> Vec<(String, Node)> {
    name_hierarchy(name)
        .into_iter()
        .map(|n| {
            let node = namehash(&n);
            (n, node)
        })
        .collect()
}

/// DNS wire-format encoding of a name as used by ENSIP-10.
///
/// Labels longer than 255 bytes are replaced by their encoded labelhash.
pub fn dns_encode(name: &str) -> Bytes {
    let mut out = Vec::with_capacity(name.len() + 2);
    for label in labels(name) {
        if label.len() > MAX_DNS_LABEL_LEN {
            let encoded = encode_labelhash(keccak256(label.as_bytes()));
            out.push(encoded.len() as u8);
            out.extend_from_slice(encoded.as_bytes());
        } else {
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
    }
    out.push(0);
    out.into()
}

/// Convert a byte offset into a DNS encoded name into the index of the
/// ancestor starting at that offset within [`name_hierarchy`].
pub fn dns_offset_to_hierarchy_index(encoded: &[u8], offset: usize) -> Result<usize, NameError> {
    if offset >= encoded.len() {
        return Err(NameError::OffsetOutOfBounds {
            offset,
            len: encoded.len(),
        });
    }

    let mut pos = 0;
    let mut index = 0;
    loop {
        if pos == offset {
            return Ok(index);
        }
        if pos > offset {
            return Err(NameError::OffsetNotOnLabelBoundary(offset));
        }
        let len = *encoded.get(pos).ok_or(NameError::MalformedDnsName)? as usize;
        if len == 0 {
            return Err(NameError::OffsetNotOnLabelBoundary(offset));
        }
        pos += 1 + len;
        index += 1;
    }
}

/// Conservative normalization check for a full name.
///
/// Accepts the root name. Every label must pass [`is_normalized_label`].
pub fn is_normalized_name(name: &str) -> bool {
    name.is_empty() || labels(name).all(is_normalized_label)
}

/// Conservative normalization check for a single label.
///
/// This is a subset of ENSIP-15: it rejects anything that normalization would
/// change or refuse in the ASCII range, and uppercase, whitespace and control
/// characters elsewhere. Encoded labelhashes are not normalized labels.
pub fn is_normalized_label(label: &str) -> bool {
    if label.is_empty() {
        return false;
    }

    let mut seen_non_underscore = false;
    for c in label.chars() {
        if c == '_' {
            // underscores are only allowed as a leading run
            if seen_non_underscore {
                return false;
            }
            continue;
        }
        seen_non_underscore = true;

        if c.is_ascii() {
            if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '$') {
                return false;
            }
        } else if c.is_uppercase()
            || c.is_whitespace()
            || c.is_control()
            || c == '\u{FFFD}'
            || c == '\u{200B}'
        {
            return false;
        }
    }

    // ENSIP-15 CheckHyphens on ASCII labels
    if label.is_ascii() && label.len() >= 4 && &label[2..4] == "--" {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use alloy_primitives::b256;

    use super::*;

    #[test]
    fn test_namehash_known_values() {
        assert_eq!(namehash(""), ROOT_NODE);
        assert_eq!(
            namehash("eth"),
            b256!("93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae")
        );
        assert_eq!(
            namehash("foo.eth"),
            b256!("de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f")
        );
    }

    #[test]
    fn test_labelhash_encoded() {
        let lh = labelhash("eth");
        let encoded = encode_labelhash(lh);
        assert_eq!(labelhash(&encoded), lh);
        assert_eq!(decode_encoded_labelhash(&encoded), Some(lh));
        assert_eq!(namehash(&encoded), namehash("eth"));
    }

    #[test]
    fn test_encoded_labelhash_rejects_uppercase() {
        let encoded = encode_labelhash(labelhash("eth")).to_uppercase();
        assert_eq!(decode_encoded_labelhash(&encoded), None);
    }

    #[test]
    fn test_name_hierarchy() {
        assert_eq!(name_hierarchy("a.b.eth"), vec!["a.b.eth", "b.eth", "eth"]);
        assert_eq!(name_hierarchy("eth"), vec!["eth"]);
        assert_eq!(name_hierarchy(""), vec![""]);
    }

    #[test]
    fn test_hierarchy_with_nodes() {
        let h = name_hierarchy_with_nodes("foo.eth");
        assert_eq!(h.len(), 2);
        assert_eq!(h[0], ("foo.eth".to_string(), namehash("foo.eth")));
        assert_eq!(h[1], ("eth".to_string(), namehash("eth")));
    }

    #[test]
    fn test_dns_encode() {
        assert_eq!(dns_encode("").as_ref(), &[0u8]);
        assert_eq!(
            dns_encode("foo.eth").as_ref(),
            b"\x03foo\x03eth\x00".as_slice()
        );
    }

    #[test]
    fn test_dns_encode_long_label() {
        let long = "a".repeat(300);
        let encoded = dns_encode(&format!("{long}.eth"));
        // 1 + 66 for the encoded labelhash, 1 + 3 for eth, 1 terminator
        assert_eq!(encoded.len(), 72);
        assert_eq!(encoded[0], 66);
        assert_eq!(encoded[1], b'[');
    }

    #[test]
    fn test_offset_to_hierarchy_index() {
        let encoded = dns_encode("a.b.eth");
        assert_eq!(dns_offset_to_hierarchy_index(&encoded, 0), Ok(0));
        assert_eq!(dns_offset_to_hierarchy_index(&encoded, 2), Ok(1));
        assert_eq!(dns_offset_to_hierarchy_index(&encoded, 4), Ok(2));
        // terminator byte is the root, one past the end of the hierarchy
        assert_eq!(dns_offset_to_hierarchy_index(&encoded, 8), Ok(3));
    }

    #[test]
    fn test_offset_errors() {
        let encoded = dns_encode("a.b.eth");
        assert_eq!(
            dns_offset_to_hierarchy_index(&encoded, 9),
            Err(NameError::OffsetOutOfBounds { offset: 9, len: 9 })
        );
        assert_eq!(
            dns_offset_to_hierarchy_index(&encoded, 3),
            Err(NameError::OffsetNotOnLabelBoundary(3))
        );
        assert_eq!(
            dns_offset_to_hierarchy_index(&[5, b'a'], 1),
            Err(NameError::OffsetNotOnLabelBoundary(1))
        );
    }

    #[test]
    fn test_is_normalized() {
        assert!(is_normalized_name(""));
        assert!(is_normalized_name("vitalik.eth"));
        assert!(is_normalized_name("__foo.eth"));
        assert!(is_normalized_name("a-b.eth"));
        assert!(is_normalized_name("💩.eth"));
        assert!(is_normalized_name("café.eth"));

        assert!(!is_normalized_name("Vitalik.eth"));
        assert!(!is_normalized_name("foo..eth"));
        assert!(!is_normalized_name(".eth"));
        assert!(!is_normalized_name("foo bar.eth"));
        assert!(!is_normalized_name("fo_o.eth"));
        assert!(!is_normalized_name("ab--c.eth"));
        assert!(!is_normalized_name("ÉCOLE.eth"));
        assert!(!is_normalized_name(&format!(
            "{}.eth",
            encode_labelhash(labelhash("foo"))
        )));
    }
}
