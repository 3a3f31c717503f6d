//! Domain names and RFC1035 message compression.
//!
//! Unlike most fields in this crate, names can't be encoded/decoded in
//! isolation: compression needs a table shared across the whole message, so
//! callers thread a `NameWriter`/`NameReader` through every name in a
//! `Message` rather than each `Name` owning its own state.
use std::collections::HashMap;
use std::io::Cursor;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{DNSError, DNSResult};
use crate::network_order::ToFromNetworkOrder;

const POINTER_TAG: u8 = 0b1100_0000;
const MAX_LABEL_LENGTH: usize = 63;
const MAX_NAME_LENGTH: usize = 255;
const MAX_POINTER_OFFSET: u16 = 0x3FFF;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(pub Vec<u8>);

impl Label {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A fully-qualified domain name, stored as the ordered list of labels (no
/// trailing root label -- that's implicit, as it is in `Name::to_string`'s
/// trailing dot).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Name {
    pub labels: Vec<Label>,
}

impl Name {
    pub fn root() -> Self {
        Name { labels: Vec::new() }
    }

    /// Parse a presentation-format name like `www.example.com.` (trailing dot
    /// optional) into labels.
    pub fn from_str(s: &str) -> DNSResult<Self> {
        let trimmed = s.strip_suffix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return Ok(Name::root());
        }

        let mut labels = Vec::new();
        for part in trimmed.split('.') {
            if part.is_empty() || part.len() > MAX_LABEL_LENGTH {
                return Err(DNSError::malformed(format!("invalid label: {:?}", part)));
            }
            labels.push(Label(part.as_bytes().to_vec()));
        }
        Ok(Name { labels })
    }

    pub fn to_dotted_string(&self) -> String {
        if self.labels.is_empty() {
            return ".".to_string();
        }
        let mut s = self
            .labels
            .iter()
            .map(|l| String::from_utf8_lossy(l.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(".");
        s.push('.');
        s
    }

    /// Wire length of this name if written uncompressed: one length byte per
    /// label, plus the label bytes, plus the terminating root byte.
    fn uncompressed_len(&self) -> usize {
        self.labels.iter().map(|l| 1 + l.0.len()).sum::<usize>() + 1
    }

    /// All suffixes of this name, longest first, each paired with the labels
    /// that remain after it (i.e. the prefix still to be written).
    fn suffixes(&self) -> Vec<(&[Label], &[Label])> {
        let mut out = Vec::with_capacity(self.labels.len());
        for i in 0..self.labels.len() {
            out.push((&self.labels[..i], &self.labels[i..]));
        }
        out
    }
}

/// Suffix -> wire offset table shared by every name written into one message.
#[derive(Debug, Default)]
pub struct NameWriter {
    offsets: HashMap<Vec<Label>, u16>,
}

impl NameWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `name` into `buffer`, compressing against any suffix already
    /// recorded and recording new suffixes as we go, keyed to `buffer`'s
    /// length at call time (the caller must pass the position in the final
    /// message, which for this crate is always `buffer.len()` since names are
    /// only ever appended to a single growing message buffer).
    pub fn write(&mut self, name: &Name, buffer: &mut Vec<u8>) -> DNSResult<usize> {
        if name.uncompressed_len() > MAX_NAME_LENGTH {
            return Err(DNSError::malformed("name exceeds 255 octets"));
        }

        let start = buffer.len();

        for (prefix, suffix) in name.suffixes() {
            let key = suffix.to_vec();
            if let Some(&offset) = self.offsets.get(&key) {
                let pointer = 0xC000u16 | offset;
                buffer.write_u16::<BigEndian>(pointer)?;
                return Ok(buffer.len() - start);
            }

            let position = buffer.len();
            if position as u64 <= MAX_POINTER_OFFSET as u64 {
                self.offsets.insert(key, position as u16);
            }

            let label = &name.labels[prefix.len()];
            buffer.push(label.0.len() as u8);
            buffer.extend_from_slice(&label.0);
        }

        // whole name was new: still offer the terminal root suffix for reuse
        let root_position = buffer.len();
        if root_position as u64 <= MAX_POINTER_OFFSET as u64 {
            self.offsets.insert(Vec::new(), root_position as u16);
        }
        buffer.push(0);

        Ok(buffer.len() - start)
    }
}

/// Visited-offset tracking so decode can reject compression loops.
#[derive(Debug, Default)]
pub struct NameReader;

impl NameReader {
    pub fn new() -> Self {
        Self
    }

    /// Decode a name starting at the cursor's current position. `message` is
    /// the full message buffer (pointers are offsets from its start).
    pub fn read<'a>(&self, cursor: &mut Cursor<&'a [u8]>, message: &'a [u8]) -> DNSResult<Name> {
        let mut labels = Vec::new();
        let mut visited = std::collections::HashSet::new();
        let mut jumped = false;
        let mut resume_at: Option<u64> = None;

        loop {
            let position = cursor.position();
            if position as usize >= message.len() {
                return Err(DNSError::malformed("name runs past end of message"));
            }

            let length_byte = message[position as usize];

            if length_byte & POINTER_TAG == POINTER_TAG {
                let hi = (length_byte & !POINTER_TAG) as u16;
                if position as usize + 1 >= message.len() {
                    return Err(DNSError::malformed("truncated compression pointer"));
                }
                let lo = message[position as usize + 1] as u16;
                let offset = (hi << 8) | lo;

                if offset as u64 >= position {
                    return Err(DNSError::malformed("pointer targets non-earlier offset"));
                }

                if !jumped {
                    resume_at = Some(position + 2);
                    jumped = true;
                }

                if !visited.insert(offset) {
                    return Err(DNSError::malformed("compression pointer loop"));
                }

                cursor.set_position(offset as u64);
                continue;
            }

            if length_byte & POINTER_TAG != 0 {
                return Err(DNSError::malformed("reserved label length bits set"));
            }

            cursor.set_position(position + 1);

            if length_byte == 0 {
                break;
            }

            let len = length_byte as usize;
            let start = position as usize + 1;
            let end = start + len;
            if end > message.len() {
                return Err(DNSError::malformed("label runs past end of message"));
            }

            labels.push(Label(message[start..end].to_vec()));
            cursor.set_position(end as u64);
        }

        if let Some(resume) = resume_at {
            cursor.set_position(resume);
        }

        let name = Name { labels };
        if name.uncompressed_len() > MAX_NAME_LENGTH {
            return Err(DNSError::malformed("name exceeds 255 octets"));
        }

        Ok(name)
    }
}

// Non-compressing impl, used for names that are known never to participate in
// compression (e.g. standalone round-trip tests). Message-level code uses
// `NameWriter`/`NameReader` directly instead of this impl.
impl<'a> ToFromNetworkOrder<'a> for Name {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        for label in &self.labels {
            buffer.push(label.0.len() as u8);
            buffer.extend_from_slice(&label.0);
        }
        buffer.push(0);
        Ok(buffer.len() - start)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        let message = *buffer.get_ref();
        let decoded = NameReader::new().read(buffer, message)?;
        *self = decoded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_dotted_form() {
        let name = Name::from_str("www.example.com").unwrap();
        assert_eq!(name.labels.len(), 3);
        assert_eq!(name.to_dotted_string(), "www.example.com.");
    }

    #[test]
    fn root_name_is_empty() {
        let name = Name::from_str(".").unwrap();
        assert!(name.labels.is_empty());
        assert_eq!(name.to_dotted_string(), ".");
    }

    #[test]
    fn rejects_oversize_label() {
        let long_label = "a".repeat(64);
        assert!(Name::from_str(&long_label).is_err());
    }

    #[test]
    fn writer_compresses_repeated_suffix() {
        let mut writer = NameWriter::new();
        let mut buffer = Vec::new();

        // leading padding to give the first name a non-zero, pointer-safe offset
        buffer.extend_from_slice(&[0u8; 12]);

        let first = Name::from_str("www.example.com").unwrap();
        writer.write(&first, &mut buffer).unwrap();
        let first_len = buffer.len();

        let second = Name::from_str("mail.example.com").unwrap();
        writer.write(&second, &mut buffer).unwrap();

        // second name should be shorter than a full encode because "example.com"
        // compresses away into a 2-byte pointer
        let second_encoded_len = buffer.len() - first_len;
        assert!(second_encoded_len < second.uncompressed_len());

        // last two bytes of the second encode must be the compression pointer
        assert_eq!(buffer[buffer.len() - 2] & POINTER_TAG, POINTER_TAG);
    }

    #[test]
    fn reader_follows_pointer_and_resumes() {
        let mut writer = NameWriter::new();
        let mut buffer = vec![0u8; 12];

        let first = Name::from_str("example.com").unwrap();
        writer.write(&first, &mut buffer).unwrap();

        let second = Name::from_str("www.example.com").unwrap();
        writer.write(&second, &mut buffer).unwrap();

        // append a marker byte right after the second name to confirm the
        // cursor resumes after the pointer rather than continuing past end
        buffer.push(0xAB);

        let reader = NameReader::new();
        let mut cursor = Cursor::new(buffer.as_slice());
        cursor.set_position(12);
        let decoded_first = reader.read(&mut cursor, buffer.as_slice()).unwrap();
        assert_eq!(decoded_first.to_dotted_string(), "example.com.");

        let decoded_second = reader.read(&mut cursor, buffer.as_slice()).unwrap();
        assert_eq!(decoded_second.to_dotted_string(), "www.example.com.");

        assert_eq!(buffer[cursor.position() as usize], 0xAB);
    }

    #[test]
    fn reader_rejects_pointer_loop() {
        // a pointer at offset 12 that points back to itself
        let mut buffer = vec![0u8; 12];
        buffer.push(0xC0);
        buffer.push(12);

        let reader = NameReader::new();
        let mut cursor = Cursor::new(buffer.as_slice());
        cursor.set_position(12);
        assert!(reader.read(&mut cursor, buffer.as_slice()).is_err());
    }

    #[test]
    fn reader_rejects_forward_pointer() {
        // pointer at offset 12 targets offset 20, which holds valid labels
        // that are never revisited -- still illegal, since the target isn't
        // strictly earlier than the pointer itself.
        let mut buffer = vec![0u8; 12];
        buffer.push(0xC0);
        buffer.push(20);
        buffer.extend_from_slice(&[0u8; 6]); // padding up to offset 20
        buffer.push(3);
        buffer.extend_from_slice(b"abc");
        buffer.push(0);

        let reader = NameReader::new();
        let mut cursor = Cursor::new(buffer.as_slice());
        cursor.set_position(12);
        assert!(reader.read(&mut cursor, buffer.as_slice()).is_err());
    }

    #[test]
    fn reader_rejects_reserved_length_bits() {
        // 0b10xxxxxx is reserved, not a valid label length nor a pointer tag
        let buffer = [0b1000_0001u8, b'a', 0];
        let reader = NameReader::new();
        let mut cursor = Cursor::new(buffer.as_slice());
        assert!(reader.read(&mut cursor, buffer.as_slice()).is_err());
    }
}
