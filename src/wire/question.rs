//! The question section: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.2
use std::io::Cursor;

use crate::dns_types::{QClass, QType};
use crate::error::DNSResult;
use crate::network_order::ToFromNetworkOrder;
use crate::wire::name::{Name, NameReader, NameWriter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub qname: Name,
    pub qtype: QType,
    pub qclass: QClass,
}

impl Question {
    pub fn new(qname: Name, qtype: QType, qclass: QClass) -> Self {
        Question {
            qname,
            qtype,
            qclass,
        }
    }

    pub fn write(&self, writer: &mut NameWriter, buffer: &mut Vec<u8>) -> DNSResult<usize> {
        let start = buffer.len();
        writer.write(&self.qname, buffer)?;
        self.qtype.to_network_bytes(buffer)?;
        self.qclass.to_network_bytes(buffer)?;
        Ok(buffer.len() - start)
    }

    pub fn read<'a>(reader: &NameReader, cursor: &mut Cursor<&'a [u8]>, message: &'a [u8]) -> DNSResult<Self> {
        let qname = reader.read(cursor, message)?;
        let mut qtype = QType::default();
        qtype.from_network_bytes(cursor)?;
        let mut qclass = QClass::default();
        qclass.from_network_bytes(cursor)?;

        Ok(Question {
            qname,
            qtype,
            qclass,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_round_trip() {
        let question = Question::new(
            Name::from_str("www.example.com").unwrap(),
            QType::A,
            QClass::IN,
        );

        let mut writer = NameWriter::new();
        let mut buffer = Vec::new();
        question.write(&mut writer, &mut buffer).unwrap();

        let reader = NameReader::new();
        let mut cursor = Cursor::new(buffer.as_slice());
        let decoded = Question::read(&reader, &mut cursor, buffer.as_slice()).unwrap();

        assert_eq!(decoded, question);
    }
}
