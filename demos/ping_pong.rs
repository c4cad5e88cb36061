//! Simple ping-pong exchange over an in-memory link

use std::io::Cursor;

use cfl::io::{read_message, write_message};
use cfl::{Flags, Message, ValidatorConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("CFL Ping-Pong Example");
    println!("=====================\n");

    let config = ValidatorConfig::default();
    let mut link = Vec::new();

    // Request
    let ping = Message::builder(0x0001)
        .flags(Flags::new().with(Flags::REQUEST))
        .seq(1)
        .payload(&b"ping"[..])
        .build()?;
    write_message(&mut link, &ping)?;
    println!("Sent {} bytes", link.len());

    let received = read_message(&mut Cursor::new(&link), &config)?;
    println!("{}", received.header().dump());

    // Reply carries the request's sequence number
    let pong = Message::builder(received.id())
        .flags(Flags::new().with(Flags::REPLY).with(Flags::ACK))
        .seq(received.seq())
        .payload(&b"pong"[..])
        .build()?;

    let encoded = pong.encode();
    let frame = cfl::validate(&encoded)?;
    println!(
        "Reply: flags={} payload={:?}",
        frame.header().flags(),
        String::from_utf8_lossy(frame.payload())
    );

    // A single flipped bit is caught by the CRC
    let mut damaged = encoded.clone();
    damaged[cfl::HEADER_SIZE] ^= 0x01;
    if let Err(err) = cfl::validate(&damaged) {
        println!("Damaged reply rejected: {err}");
    }

    Ok(())
}
