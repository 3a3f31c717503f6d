//! Pretty-printing for library types.
//!
//! The orphan rule means `impl fmt::Display for Record` isn't possible from
//! this binary crate, so answers print through this local wrapper instead.
use std::fmt;

use dnsclient::wire::header::ResponseCode;
use dnsclient::wire::message::Message;
use dnsclient::wire::name::Name;
use dnsclient::wire::record::{Record, ResourceRecord};

pub struct DisplayWrapper<'a, T>(pub &'a T);

impl<'a> fmt::Display for DisplayWrapper<'a, Name> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_dotted_string())
    }
}

impl<'a> fmt::Display for DisplayWrapper<'a, Record> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Record::A(addr) => write!(f, "{}", addr),
            Record::AAAA(addr) => write!(f, "{}", addr),
            Record::CNAME(name) => write!(f, "{}", DisplayWrapper(name)),
            Record::NS(name) => write!(f, "{}", DisplayWrapper(name)),
            Record::PTR(name) => write!(f, "{}", DisplayWrapper(name)),
            Record::MX { preference, exchange } => {
                write!(f, "{} {}", preference, DisplayWrapper(exchange))
            }
            Record::SRV { priority, weight, port, target } => {
                write!(f, "{} {} {} {}", priority, weight, port, DisplayWrapper(target))
            }
            Record::TXT(strings) => {
                let rendered: Vec<String> = strings.iter().map(|s| format!("{:?}", s)).collect();
                write!(f, "{}", rendered.join(" "))
            }
            Record::SOA { mname, rname, serial, refresh, retry, expire, minimum } => write!(
                f,
                "{} {} {} {} {} {} {}",
                DisplayWrapper(mname),
                DisplayWrapper(rname),
                serial,
                refresh,
                retry,
                expire,
                minimum
            ),
            Record::Other(bytes) => write!(f, "<{} bytes of opaque rdata>", bytes.len()),
        }
    }
}

impl<'a> fmt::Display for DisplayWrapper<'a, ResourceRecord<Record>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            DisplayWrapper(&self.0.name),
            self.0.ttl,
            self.0.rclass,
            DisplayWrapper(&self.0.rdata)
        )
    }
}

pub fn print_answer(message: &Message) {
    println!(
        ";; ->>HEADER<<- opcode: {:?}, status: {:?}, id: {:#06x}",
        message.opcode(),
        message.response_code(),
        message.header.id
    );
    println!(
        ";; flags: qr={} rd={} ra={}; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
        message.header.flags.qr,
        message.header.flags.recursion_desired,
        message.header.flags.recursion_available,
        message.header.qd_count,
        message.header.an_count,
        message.header.ns_count,
        message.header.ar_count,
    );

    if message.response_code() != ResponseCode::NoError {
        println!(";; no answer section: {:?}", message.response_code());
        return;
    }

    if message.answers.is_empty() {
        println!(";; no records in answer section");
        return;
    }

    println!(";; ANSWER SECTION:");
    for rr in &message.answers {
        println!("{}", DisplayWrapper(rr));
    }
}
