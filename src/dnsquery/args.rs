//! Manage command line arguments here.
use clap::{App, Arg};

use dnsclient::dns_types::QType;
use dnsclient::error::{DNSError, DNSResult};
use dnsclient::pool::Protocol;

fn qtype_from_str(s: &str) -> DNSResult<QType> {
    match s.to_uppercase().as_str() {
        "A" => Ok(QType::A),
        "NS" => Ok(QType::NS),
        "CNAME" => Ok(QType::CNAME),
        "SOA" => Ok(QType::SOA),
        "PTR" => Ok(QType::PTR),
        "MX" => Ok(QType::MX),
        "TXT" => Ok(QType::TXT),
        "AAAA" => Ok(QType::AAAA),
        "SRV" => Ok(QType::SRV),
        other => Err(DNSError::new(format!("unsupported query type: {}", other))),
    }
}

/// This structure holds the command line arguments.
#[derive(Debug)]
pub struct CliOptions {
    pub qtype: QType,
    pub ns: String,
    pub domain: String,
    pub protocol: Protocol,
    pub timeout_secs: u64,
    pub debug: bool,
}

impl CliOptions {
    pub fn options() -> DNSResult<Self> {
        let matches = App::new("dnsq")
            .version("0.1")
            .about("A small asynchronous DNS query client")
            .arg(
                Arg::new("qtype")
                    .short('q')
                    .long("qtype")
                    .required(true)
                    .long_help("Query type: A, AAAA, CNAME, NS, PTR, MX, SRV, TXT, SOA")
                    .takes_value(true),
            )
            .arg(
                Arg::new("ns")
                    .short('n')
                    .long("ns")
                    .required(true)
                    .long_help("Nameserver IP address to query")
                    .takes_value(true),
            )
            .arg(
                Arg::new("domain")
                    .short('d')
                    .long("domain")
                    .required(true)
                    .long_help("Domain name to query")
                    .takes_value(true),
            )
            .arg(
                Arg::new("tcp")
                    .short('t')
                    .long("tcp")
                    .required(false)
                    .long_help("Use TCP instead of UDP")
                    .takes_value(false),
            )
            .arg(
                Arg::new("timeout")
                    .long("timeout")
                    .required(false)
                    .long_help("Per-query timeout in seconds")
                    .default_value("30")
                    .takes_value(true),
            )
            .arg(
                Arg::new("debug")
                    .short('g')
                    .long("debug")
                    .required(false)
                    .long_help("Print the raw decoded message")
                    .takes_value(false),
            )
            .get_matches();

        let qtype = qtype_from_str(matches.value_of("qtype").unwrap())?;

        let timeout_secs = matches
            .value_of("timeout")
            .unwrap()
            .parse::<u64>()
            .map_err(|e| DNSError::new(e.to_string()))?;

        Ok(CliOptions {
            qtype,
            ns: matches.value_of("ns").unwrap().to_string(),
            domain: matches.value_of("domain").unwrap().to_string(),
            protocol: if matches.is_present("tcp") { Protocol::Tcp } else { Protocol::Udp },
            timeout_secs,
            debug: matches.is_present("debug"),
        })
    }
}
