//! A small command line DNS query client.
mod args;
mod display;

use std::net::SocketAddr;
use std::time::Duration;

use log::error;

use dnsclient::dns_types::QClass;
use dnsclient::error::DNSResult;
use dnsclient::pool::{ConnectionPool, ConnectionRequirements, Sourcing};
use dnsclient::resolver_config::DEFAULT_DNS_PORT;
use dnsclient::wire::message::Message;
use dnsclient::wire::name::Name;

use args::CliOptions;
use display::print_answer;

#[tokio::main]
async fn main() -> DNSResult<()> {
    env_logger::init();

    let options = CliOptions::options()?;

    let remote: SocketAddr = format!("{}:{}", options.ns, DEFAULT_DNS_PORT)
        .parse()
        .map_err(|_| dnsclient::error::DNSError::InvalidIP(options.ns.clone()))?;

    let pool = ConnectionPool::new();
    let requirements = ConnectionRequirements::new(remote, options.protocol, Sourcing::Unpooled);
    let client = pool.next(requirements).await?;

    let qname = Name::from_str(&options.domain)?;
    let query = Message::new_query(qname, options.qtype, QClass::IN);

    if options.debug {
        println!(";; sending query for {} {:?}", options.domain, options.qtype);
    }

    match client.send_query(query, Some(Duration::from_secs(options.timeout_secs))).await {
        Ok(response) => print_answer(&response),
        Err(e) => {
            error!("query failed: {}", e);
            return Err(e);
        }
    }

    pool.disconnect().await;
    Ok(())
}
