//! DNS message header: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::DNSResult;
use crate::network_order::ToFromNetworkOrder;

// op codes: https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpCode {
    #[default]
    Query,
    IQuery,
    Status,
    Notify,
    Update,
    Reserved(u8),
}

impl From<u8> for OpCode {
    fn from(value: u8) -> Self {
        match value {
            0 => OpCode::Query,
            1 => OpCode::IQuery,
            2 => OpCode::Status,
            4 => OpCode::Notify,
            5 => OpCode::Update,
            other => OpCode::Reserved(other),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        match op {
            OpCode::Query => 0,
            OpCode::IQuery => 1,
            OpCode::Status => 2,
            OpCode::Notify => 4,
            OpCode::Update => 5,
            OpCode::Reserved(v) => v,
        }
    }
}

// response codes: https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-6
// only the non-EDNS 4-bit values are representable; this core does not negotiate EDNS(0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseCode {
    #[default]
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,
    YXDomain,
    YXRRSet,
    NXRRSet,
    NotAuth,
    NotZone,
    Reserved(u8),
}

impl From<u8> for ResponseCode {
    fn from(value: u8) -> Self {
        match value {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NXDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            6 => ResponseCode::YXDomain,
            7 => ResponseCode::YXRRSet,
            8 => ResponseCode::NXRRSet,
            9 => ResponseCode::NotAuth,
            10 => ResponseCode::NotZone,
            other => ResponseCode::Reserved(other),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(rc: ResponseCode) -> u8 {
        match rc {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NXDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::YXDomain => 6,
            ResponseCode::YXRRSet => 7,
            ResponseCode::NXRRSet => 8,
            ResponseCode::NotAuth => 9,
            ResponseCode::NotZone => 10,
            ResponseCode::Reserved(v) => v,
        }
    }
}

/// The 16-bit flags field, split the way the wire format intends: QR,
/// Opcode[4], AA, TC, RD, RA, Z, AD, CD, RCODE[4].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeaderFlags {
    pub qr: bool,
    pub opcode: OpCode,
    pub authoritative_answer: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub z: bool,
    pub authentic_data: bool,
    pub checking_disabled: bool,
    pub response_code: ResponseCode,
}

impl<'a> ToFromNetworkOrder<'a> for HeaderFlags {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        //  0  1  2  3  4  5  6  7  8  9  1011 12 13 14 15
        // +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
        // |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
        // +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
        let mut bits: u16 = (self.qr as u16) << 15;
        bits |= (u8::from(self.opcode) as u16 & 0b1111) << 11;
        bits |= (self.authoritative_answer as u16) << 10;
        bits |= (self.truncated as u16) << 9;
        bits |= (self.recursion_desired as u16) << 8;
        bits |= (self.recursion_available as u16) << 7;
        bits |= (self.z as u16) << 6;
        bits |= (self.authentic_data as u16) << 5;
        bits |= (self.checking_disabled as u16) << 4;
        bits |= u8::from(self.response_code) as u16 & 0b1111;

        buffer.write_u16::<BigEndian>(bits)?;
        Ok(2)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        let bits = buffer.read_u16::<BigEndian>()?;

        self.qr = (bits >> 15) & 1 == 1;
        self.opcode = OpCode::from(((bits >> 11) & 0b1111) as u8);
        self.authoritative_answer = (bits >> 10) & 1 == 1;
        self.truncated = (bits >> 9) & 1 == 1;
        self.recursion_desired = (bits >> 8) & 1 == 1;
        self.recursion_available = (bits >> 7) & 1 == 1;
        self.z = (bits >> 6) & 1 == 1;
        self.authentic_data = (bits >> 5) & 1 == 1;
        self.checking_disabled = (bits >> 4) & 1 == 1;
        self.response_code = ResponseCode::from((bits & 0b1111) as u8);

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Header {
    pub id: u16,
    pub flags: HeaderFlags,
    pub qd_count: u16,
    pub an_count: u16,
    pub ns_count: u16,
    pub ar_count: u16,
}

pub const HEADER_LENGTH: usize = 12;

impl<'a> ToFromNetworkOrder<'a> for Header {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        buffer.write_u16::<BigEndian>(self.id)?;
        self.flags.to_network_bytes(buffer)?;
        buffer.write_u16::<BigEndian>(self.qd_count)?;
        buffer.write_u16::<BigEndian>(self.an_count)?;
        buffer.write_u16::<BigEndian>(self.ns_count)?;
        buffer.write_u16::<BigEndian>(self.ar_count)?;
        Ok(HEADER_LENGTH)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        self.id = buffer.read_u16::<BigEndian>()?;
        self.flags.from_network_bytes(buffer)?;
        self.qd_count = buffer.read_u16::<BigEndian>()?;
        self.an_count = buffer.read_u16::<BigEndian>()?;
        self.ns_count = buffer.read_u16::<BigEndian>()?;
        self.ar_count = buffer.read_u16::<BigEndian>()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trip() {
        let header = Header {
            id: 0x7686,
            flags: HeaderFlags {
                qr: true,
                opcode: OpCode::Query,
                recursion_desired: true,
                recursion_available: true,
                authentic_data: true,
                response_code: ResponseCode::NoError,
                ..Default::default()
            },
            qd_count: 1,
            an_count: 8,
            ns_count: 0,
            ar_count: 1,
        };

        let mut buffer = Vec::new();
        header.to_network_bytes(&mut buffer).unwrap();
        assert_eq!(buffer.len(), HEADER_LENGTH);

        let mut decoded = Header::default();
        let mut cursor = Cursor::new(buffer.as_slice());
        decoded.from_network_bytes(&mut cursor).unwrap();

        assert_eq!(decoded.id, header.id);
        assert_eq!(decoded.flags, header.flags);
        assert_eq!(decoded.qd_count, 1);
        assert_eq!(decoded.an_count, 8);
    }

    #[test]
    fn flags_from_wireshark_sample() {
        // 0x81 0xa0 taken from a real response capture
        let bytes = [0x81u8, 0xa0];
        let mut cursor = Cursor::new(bytes.as_slice());
        let mut flags = HeaderFlags::default();
        flags.from_network_bytes(&mut cursor).unwrap();

        assert!(flags.qr);
        assert_eq!(flags.opcode, OpCode::Query);
        assert!(!flags.authoritative_answer);
        assert!(!flags.truncated);
        assert!(flags.recursion_desired);
        assert!(flags.recursion_available);
        assert_eq!(flags.response_code, ResponseCode::NoError);
    }
}
