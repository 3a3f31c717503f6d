//! Resource records and their typed RDATA: https://datatracker.ietf.org/doc/html/rfc1035#section-3.3
use std::convert::TryFrom;
use std::io::Cursor;
use std::net::{Ipv4Addr, Ipv6Addr};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::dns_types::{QClass, QType};
use crate::error::{DNSError, DNSResult};
use crate::network_order::ToFromNetworkOrder;
use crate::wire::name::{Name, NameReader, NameWriter};

/// Typed RDATA for the record kinds this crate recognizes (spec.md §6); any
/// other QTYPE is carried as opaque bytes rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(Name),
    NS(Name),
    PTR(Name),
    MX { preference: u16, exchange: Name },
    SRV { priority: u16, weight: u16, port: u16, target: Name },
    /// the raw character-strings, in wire order, verbatim (spec.md §3).
    TXT(Vec<String>),
    SOA {
        mname: Name,
        rname: Name,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    Other(Vec<u8>),
}

/// A resource record generic over its RDATA representation; every record this
/// crate produces or consumes instantiates `T` as [`Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord<T> {
    pub name: Name,
    /// raw wire type code: an unrecognized code (no [`QType`] mapping) still
    /// decodes successfully, carried as `Record::Other`.
    pub rtype: u16,
    pub rclass: QClass,
    pub ttl: u32,
    pub rdata: T,
}

impl<T> ResourceRecord<T> {
    pub fn qtype(&self) -> Option<QType> {
        QType::try_from(self.rtype).ok()
    }
}

impl Record {
    /// The key/value view of a TXT record's character-strings, splitting
    /// each entry on its first `=` (spec.md §3: "plus key-value view where
    /// entries split on the first `=`"). `None` for every other record kind.
    /// This is derived on demand, never stored, so the raw strings survive
    /// a decode/encode round trip byte-for-byte even when an entry has no
    /// `=` or ends in a bare `=`.
    pub fn txt_key_values(&self) -> Option<Vec<(&str, &str)>> {
        match self {
            Record::TXT(strings) => Some(
                strings
                    .iter()
                    .map(|s| s.split_once('=').unwrap_or((s.as_str(), "")))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl ResourceRecord<Record> {
    pub fn write(&self, writer: &mut NameWriter, buffer: &mut Vec<u8>) -> DNSResult<usize> {
        let start = buffer.len();
        writer.write(&self.name, buffer)?;
        buffer.write_u16::<BigEndian>(self.rtype)?;
        self.rclass.to_network_bytes(buffer)?;
        buffer.write_u32::<BigEndian>(self.ttl)?;

        // rdlength is only known once rdata is encoded, so reserve then backpatch
        let rdlength_at = buffer.len();
        buffer.write_u16::<BigEndian>(0)?;
        let rdata_start = buffer.len();
        write_rdata(&self.rdata, writer, buffer)?;
        let rdlength = (buffer.len() - rdata_start) as u16;
        buffer[rdlength_at..rdlength_at + 2].copy_from_slice(&rdlength.to_be_bytes());

        Ok(buffer.len() - start)
    }

    pub fn read<'a>(reader: &NameReader, cursor: &mut Cursor<&'a [u8]>, message: &'a [u8]) -> DNSResult<Self> {
        let name = reader.read(cursor, message)?;
        let rtype = cursor.read_u16::<BigEndian>()?;
        let mut rclass = QClass::default();
        rclass.from_network_bytes(cursor)?;
        let ttl = cursor.read_u32::<BigEndian>()?;
        let rdlength = cursor.read_u16::<BigEndian>()? as usize;

        let rdata_start = cursor.position() as usize;
        let rdata_end = rdata_start + rdlength;
        if rdata_end > message.len() {
            return Err(DNSError::malformed("rdata runs past end of message"));
        }

        let rdata = match QType::try_from(rtype) {
            Ok(qtype) => read_rdata(qtype, reader, cursor, message, rdata_end)?,
            Err(_) => {
                let bytes = message[rdata_start..rdata_end].to_vec();
                cursor.set_position(rdata_end as u64);
                Record::Other(bytes)
            }
        };

        // a typed read that consumed more or fewer bytes than RDLENGTH promised
        // means the RDATA was malformed, even if the message has more bytes
        // available afterward (e.g. belonging to the next record).
        if cursor.position() as usize != rdata_end {
            return Err(DNSError::malformed("rdata length does not match RDLENGTH"));
        }

        Ok(ResourceRecord {
            name,
            rtype,
            rclass,
            ttl,
            rdata,
        })
    }
}

fn write_rdata(record: &Record, writer: &mut NameWriter, buffer: &mut Vec<u8>) -> DNSResult<()> {
    match record {
        Record::A(addr) => buffer.extend_from_slice(&addr.octets()),
        Record::AAAA(addr) => buffer.extend_from_slice(&addr.octets()),
        Record::CNAME(name) | Record::NS(name) | Record::PTR(name) => {
            writer.write(name, buffer)?;
        }
        Record::MX { preference, exchange } => {
            buffer.write_u16::<BigEndian>(*preference)?;
            writer.write(exchange, buffer)?;
        }
        Record::SRV { priority, weight, port, target } => {
            buffer.write_u16::<BigEndian>(*priority)?;
            buffer.write_u16::<BigEndian>(*weight)?;
            buffer.write_u16::<BigEndian>(*port)?;
            writer.write(target, buffer)?;
        }
        Record::TXT(strings) => {
            for entry in strings {
                let bytes = entry.as_bytes();
                buffer.push(bytes.len() as u8);
                buffer.extend_from_slice(bytes);
            }
        }
        Record::SOA {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        } => {
            writer.write(mname, buffer)?;
            writer.write(rname, buffer)?;
            buffer.write_u32::<BigEndian>(*serial)?;
            buffer.write_u32::<BigEndian>(*refresh)?;
            buffer.write_u32::<BigEndian>(*retry)?;
            buffer.write_u32::<BigEndian>(*expire)?;
            buffer.write_u32::<BigEndian>(*minimum)?;
        }
        Record::Other(bytes) => buffer.extend_from_slice(bytes),
    }
    Ok(())
}

fn read_rdata<'a>(
    rtype: QType,
    reader: &NameReader,
    cursor: &mut Cursor<&'a [u8]>,
    message: &'a [u8],
    rdata_end: usize,
) -> DNSResult<Record> {
    match rtype {
        QType::A => {
            let mut octets = [0u8; 4];
            for o in octets.iter_mut() {
                *o = cursor.read_u8()?;
            }
            Ok(Record::A(Ipv4Addr::from(octets)))
        }
        QType::AAAA => {
            let mut octets = [0u8; 16];
            for o in octets.iter_mut() {
                *o = cursor.read_u8()?;
            }
            Ok(Record::AAAA(Ipv6Addr::from(octets)))
        }
        QType::CNAME => Ok(Record::CNAME(reader.read(cursor, message)?)),
        QType::NS => Ok(Record::NS(reader.read(cursor, message)?)),
        QType::PTR => Ok(Record::PTR(reader.read(cursor, message)?)),
        QType::MX => {
            let preference = cursor.read_u16::<BigEndian>()?;
            let exchange = reader.read(cursor, message)?;
            Ok(Record::MX { preference, exchange })
        }
        QType::SRV => {
            let priority = cursor.read_u16::<BigEndian>()?;
            let weight = cursor.read_u16::<BigEndian>()?;
            let port = cursor.read_u16::<BigEndian>()?;
            let target = reader.read(cursor, message)?;
            Ok(Record::SRV {
                priority,
                weight,
                port,
                target,
            })
        }
        QType::TXT => {
            let mut strings = Vec::new();
            while (cursor.position() as usize) < rdata_end {
                let len = cursor.read_u8()? as usize;
                let start = cursor.position() as usize;
                let end = start + len;
                if end > rdata_end {
                    return Err(DNSError::malformed("TXT character-string overruns rdata"));
                }
                let raw = std::str::from_utf8(&message[start..end])
                    .map_err(DNSError::from)?
                    .to_string();
                cursor.set_position(end as u64);
                strings.push(raw);
            }
            Ok(Record::TXT(strings))
        }
        QType::SOA => {
            let mname = reader.read(cursor, message)?;
            let rname = reader.read(cursor, message)?;
            let serial = cursor.read_u32::<BigEndian>()?;
            let refresh = cursor.read_u32::<BigEndian>()?;
            let retry = cursor.read_u32::<BigEndian>()?;
            let expire = cursor.read_u32::<BigEndian>()?;
            let minimum = cursor.read_u32::<BigEndian>()?;
            Ok(Record::SOA {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            })
        }
        _ => {
            let start = cursor.position() as usize;
            if rdata_end < start {
                return Err(DNSError::malformed("negative rdata length"));
            }
            let bytes = message[start..rdata_end].to_vec();
            cursor.set_position(rdata_end as u64);
            Ok(Record::Other(bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rr(rdata: Record, rtype: QType) -> ResourceRecord<Record> {
        ResourceRecord {
            name: Name::from_str("example.com").unwrap(),
            rtype: rtype as u16,
            rclass: QClass::IN,
            ttl: 3600,
            rdata,
        }
    }

    fn round_trip(record: ResourceRecord<Record>) -> ResourceRecord<Record> {
        let mut writer = NameWriter::new();
        let mut buffer = Vec::new();
        record.write(&mut writer, &mut buffer).unwrap();

        let reader = NameReader::new();
        let mut cursor = Cursor::new(buffer.as_slice());
        ResourceRecord::read(&reader, &mut cursor, buffer.as_slice()).unwrap()
    }

    #[test]
    fn a_record_round_trips() {
        let original = rr(Record::A(Ipv4Addr::new(93, 184, 216, 34)), QType::A);
        assert_eq!(round_trip(original.clone()), original);
    }

    #[test]
    fn aaaa_record_round_trips() {
        let original = rr(
            Record::AAAA("2606:2800:220:1:248:1893:25c8:1946".parse().unwrap()),
            QType::AAAA,
        );
        assert_eq!(round_trip(original.clone()), original);
    }

    #[test]
    fn mx_record_round_trips() {
        let original = rr(
            Record::MX {
                preference: 10,
                exchange: Name::from_str("mail.example.com").unwrap(),
            },
            QType::MX,
        );
        assert_eq!(round_trip(original.clone()), original);
    }

    #[test]
    fn srv_record_round_trips() {
        let original = rr(
            Record::SRV {
                priority: 0,
                weight: 5,
                port: 5060,
                target: Name::from_str("sipserver.example.com").unwrap(),
            },
            QType::SRV,
        );
        assert_eq!(round_trip(original.clone()), original);
    }

    #[test]
    fn txt_record_round_trips_raw_strings() {
        let original = rr(
            Record::TXT(vec![
                "v=spf1 a mx -all".to_string(),
                "nokeyvalue".to_string(),
                "a=b=c".to_string(),
                "trailingequals=".to_string(),
            ]),
            QType::TXT,
        );
        // a decode/encode cycle must not alter any raw character-string,
        // including one with no '=' and one ending in a bare '='.
        assert_eq!(round_trip(original.clone()), original);
    }

    #[test]
    fn txt_key_values_splits_on_first_equals() {
        let record = Record::TXT(vec![
            "v=spf1 a mx -all".to_string(),
            "nokeyvalue".to_string(),
            "a=b=c".to_string(),
            "trailingequals=".to_string(),
        ]);
        assert_eq!(
            record.txt_key_values().unwrap(),
            vec![
                ("v", "spf1 a mx -all"),
                ("nokeyvalue", ""),
                ("a", "b=c"),
                ("trailingequals", ""),
            ]
        );
    }

    #[test]
    fn soa_record_round_trips() {
        let original = rr(
            Record::SOA {
                mname: Name::from_str("ns1.example.com").unwrap(),
                rname: Name::from_str("hostmaster.example.com").unwrap(),
                serial: 2024010100,
                refresh: 7200,
                retry: 3600,
                expire: 1209600,
                minimum: 300,
            },
            QType::SOA,
        );
        assert_eq!(round_trip(original.clone()), original);
    }

    #[test]
    fn unrecognized_type_is_carried_opaque() {
        let mut writer = NameWriter::new();
        let mut buffer = Vec::new();
        writer.write(&Name::from_str("example.com").unwrap(), &mut buffer).unwrap();
        buffer.extend_from_slice(&[0, 99]); // rtype 99, not recognized
        buffer.extend_from_slice(&[0, 1]); // class IN
        buffer.extend_from_slice(&[0, 0, 0, 60]); // ttl
        buffer.extend_from_slice(&[0, 3]); // rdlength
        buffer.extend_from_slice(&[1, 2, 3]);

        let reader = NameReader::new();
        let mut cursor = Cursor::new(buffer.as_slice());
        let decoded = ResourceRecord::read(&reader, &mut cursor, buffer.as_slice()).unwrap();

        assert_eq!(decoded.rtype, 99);
        assert_eq!(decoded.qtype(), None);
        assert_eq!(decoded.rdata, Record::Other(vec![1, 2, 3]));
    }

    #[test]
    fn rejects_rdlength_shorter_than_typed_rdata() {
        let mut writer = NameWriter::new();
        let mut buffer = Vec::new();
        writer.write(&Name::from_str("example.com").unwrap(), &mut buffer).unwrap();
        buffer.extend_from_slice(&[0, 1]); // rtype A
        buffer.extend_from_slice(&[0, 1]); // class IN
        buffer.extend_from_slice(&[0, 0, 0, 60]); // ttl
        buffer.extend_from_slice(&[0, 0]); // rdlength 0 (an A record needs 4)
        // bytes that belong to a following record, not this one's rdata
        buffer.extend_from_slice(&[93, 184, 216, 34]);

        let reader = NameReader::new();
        let mut cursor = Cursor::new(buffer.as_slice());
        assert!(ResourceRecord::read(&reader, &mut cursor, buffer.as_slice()).is_err());
    }
}
