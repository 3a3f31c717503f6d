//! Numeric type/class codes from RFC1035 and the handful of later RFCs this
//! crate recognizes. See https://www.iana.org/assignments/dns-parameters/
use std::fmt;

use dns_derive::DnsEnum;

// RR/QTYPE type codes actually recognized by this crate (spec.md §6).
// QTYPE-only values (AXFR, MAILB, MAILA, ANY) are valid in a question but
// never appear as an answer's RDATA type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, DnsEnum)]
#[repr(u16)]
pub enum QType {
    A = 1,
    NS = 2,
    CNAME = 5,
    SOA = 6,
    PTR = 12,
    MX = 15,
    TXT = 16,
    AAAA = 28,
    SRV = 33,
    AXFR = 252,
    MAILB = 253,
    MAILA = 254,
    ANY = 255,
}

impl fmt::Display for QType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// RR CLASS values: https://datatracker.ietf.org/doc/html/rfc1035#section-3.2.4
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, DnsEnum)]
#[repr(u16)]
pub enum QClass {
    IN = 1,
    CH = 3,
    HS = 4,
    ANY = 255,
}

impl fmt::Display for QClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

derive_enum!(QType, u16);
derive_enum!(QClass, u16);

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn qtype_round_trips() {
        assert_eq!(QType::try_from(28u16).unwrap(), QType::AAAA);
        assert!(QType::try_from(9999u16).is_err());
    }

    #[test]
    fn qclass_default_is_first_variant() {
        assert_eq!(QClass::default(), QClass::IN);
    }
}
