//! The top-level DNS message: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1
use std::io::Cursor;

use log::trace;

use crate::dns_types::{QClass, QType};
use crate::error::{DNSError, DNSResult};
use crate::network_order::ToFromNetworkOrder;
use crate::wire::header::{Header, HeaderFlags, OpCode, ResponseCode};
use crate::wire::name::{Name, NameReader, NameWriter};
use crate::wire::question::Question;
use crate::wire::record::{Record, ResourceRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord<Record>>,
    pub authorities: Vec<ResourceRecord<Record>>,
    pub additionals: Vec<ResourceRecord<Record>>,
}

impl Message {
    /// Build a minimal query message for `qname`/`qtype`/`qclass`, with a
    /// fresh id left at 0 -- callers (the transaction engine) assign it.
    pub fn new_query(qname: Name, qtype: QType, qclass: QClass) -> Self {
        Message {
            header: Header {
                id: 0,
                flags: HeaderFlags {
                    recursion_desired: true,
                    ..Default::default()
                },
                qd_count: 1,
                an_count: 0,
                ns_count: 0,
                ar_count: 0,
            },
            questions: vec![Question::new(qname, qtype, qclass)],
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    pub fn is_response(&self) -> bool {
        self.header.flags.qr
    }

    pub fn response_code(&self) -> ResponseCode {
        self.header.flags.response_code
    }

    pub fn opcode(&self) -> OpCode {
        self.header.flags.opcode
    }

    pub fn to_bytes(&self) -> DNSResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut header = self.header;
        header.qd_count = self.questions.len() as u16;
        header.an_count = self.answers.len() as u16;
        header.ns_count = self.authorities.len() as u16;
        header.ar_count = self.additionals.len() as u16;

        header
            .to_network_bytes(&mut buffer)
            .map_err(|e| DNSError::malformed(e.to_string()))?;

        let mut writer = NameWriter::new();
        for question in &self.questions {
            question.write(&mut writer, &mut buffer)?;
        }
        for record in self
            .answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter())
        {
            record.write(&mut writer, &mut buffer)?;
        }

        trace!("encoded message id={:#06x} into {} bytes", self.header.id, buffer.len());
        Ok(buffer)
    }

    pub fn from_bytes(message: &[u8]) -> DNSResult<Self> {
        if message.len() < crate::wire::header::HEADER_LENGTH {
            return Err(DNSError::malformed("message shorter than header"));
        }

        let mut cursor = Cursor::new(message);
        let mut header = Header::default();
        header.from_network_bytes(&mut cursor)?;

        let reader = NameReader::new();

        let mut questions = Vec::with_capacity(header.qd_count as usize);
        for _ in 0..header.qd_count {
            questions.push(Question::read(&reader, &mut cursor, message)?);
        }

        let mut answers = Vec::with_capacity(header.an_count as usize);
        for _ in 0..header.an_count {
            answers.push(ResourceRecord::read(&reader, &mut cursor, message)?);
        }

        let mut authorities = Vec::with_capacity(header.ns_count as usize);
        for _ in 0..header.ns_count {
            authorities.push(ResourceRecord::read(&reader, &mut cursor, message)?);
        }

        let mut additionals = Vec::with_capacity(header.ar_count as usize);
        for _ in 0..header.ar_count {
            additionals.push(ResourceRecord::read(&reader, &mut cursor, message)?);
        }

        trace!("decoded message id={:#06x}, {} answers", header.id, answers.len());

        Ok(Message {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_round_trips() {
        let message = Message::new_query(Name::from_str("example.com").unwrap(), QType::A, QClass::IN);
        let bytes = message.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.questions.len(), 1);
        assert_eq!(decoded.questions[0].qname.to_dotted_string(), "example.com.");
        assert!(decoded.header.flags.recursion_desired);
        assert!(!decoded.is_response());
    }

    #[test]
    fn response_with_answer_round_trips() {
        let mut message = Message::new_query(Name::from_str("example.com").unwrap(), QType::A, QClass::IN);
        message.header.flags.qr = true;
        message.header.flags.response_code = ResponseCode::NoError;
        message.answers.push(ResourceRecord {
            name: Name::from_str("example.com").unwrap(),
            rtype: QType::A as u16,
            rclass: QClass::IN,
            ttl: 300,
            rdata: Record::A("93.184.216.34".parse().unwrap()),
        });

        let bytes = message.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();

        assert!(decoded.is_response());
        assert_eq!(decoded.response_code(), ResponseCode::NoError);
        assert_eq!(decoded.answers.len(), 1);
        assert_eq!(decoded.answers[0].rdata, Record::A("93.184.216.34".parse().unwrap()));
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(Message::from_bytes(&[0u8; 4]).is_err());
    }

    // sample captured from a real `dig example.com A` response (truncated header only,
    // used to make sure the codec accepts real traffic shapes, not just our own encoder)
    #[test]
    fn decodes_a_real_capture_header() {
        let sample: &[u8] = &[
            0x12, 0x34, // id
            0x81, 0x80, // flags: response, recursion desired+available, no error
            0x00, 0x01, // qdcount
            0x00, 0x01, // ancount
            0x00, 0x00, // nscount
            0x00, 0x00, // arcount
            // question: example.com A IN
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0,
            0x00, 0x01, 0x00, 0x01,
            // answer: pointer to name, A, IN, ttl, rdlength 4, address
            0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x01, 0x2C, 0x00, 0x04, 93, 184, 216, 34,
        ];

        let decoded = Message::from_bytes(sample).unwrap();
        assert!(decoded.is_response());
        assert_eq!(decoded.questions[0].qname.to_dotted_string(), "example.com.");
        assert_eq!(decoded.answers.len(), 1);
        assert_eq!(decoded.answers[0].rdata, Record::A("93.184.216.34".parse().unwrap()));
    }
}
