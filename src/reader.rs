//! Surveillance log reader
//!
//! Each line holds 7 tab separated fields:
//! `seconds  micros  latitude  longitude  altitude  field5  field6`.
//! Two layouts coexist. When field 5 is the longer one, it is a tagged receiver packet
//! (field 6 being its 16 bit CRC). Otherwise field 6 is the raw Mode S frame
//! (field 5 being the multilateration timestamp).
use hifitime::{Duration, Epoch};
use log::trace;

use std::io::BufRead;

use crate::{error::Error, position::Position};

/// Received transponder content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Mode S frame, 7 (short) or 14 (long) bytes
    ModeS(Vec<u8>),
    /// Mode A/C reply
    ModeAc([u8; 2]),
}

impl Payload {
    /// True for 14 byte DF17 frames
    pub fn is_extended_squitter(&self) -> bool {
        match self {
            Self::ModeS(bytes) => crate::decode::is_extended_squitter(bytes),
            Self::ModeAc(_) => false,
        }
    }
}

/// One log record
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Reception time
    pub t: Epoch,
    /// Receiver [Position] at reception time
    pub receiver: Position,
    /// Receiver altitude [m]
    pub receiver_altitude_m: f64,
    pub payload: Payload,
}

/// Parses a "0x" prefixed hex string. Trailing odd digit is ignored.
fn parse_hex(content: &str) -> Option<Vec<u8>> {
    let digits = content.strip_prefix("0x")?;
    let len = (content.len() / 2).checked_sub(1)?;
    (0..len)
        .map(|i| {
            let byte = digits.get(2 * i..2 * i + 2)?;
            u8::from_str_radix(byte, 16).ok()
        })
        .collect()
}

fn timestamp(seconds: &str, micros: &str) -> Option<Epoch> {
    let seconds = seconds.parse::<i64>().ok()?;
    let micros = micros.parse::<i64>().ok()?;
    let nanos = seconds as i128 * 1_000_000_000 + micros as i128 * 1_000;
    Some(Epoch::from_unix_duration(Duration::from_total_nanoseconds(nanos)))
}

/// Extracts the transponder content of a tagged receiver packet
fn packet_payload(packet: &[u8]) -> Option<Payload> {
    match *packet.first()? {
        0x01 | 0x05 if packet.len() >= 19 => Some(Payload::ModeS(packet[5..19].to_vec())),
        0x07 if packet.len() >= 12 => Some(Payload::ModeS(packet[5..12].to_vec())),
        0x09 if packet.len() >= 7 => Some(Payload::ModeAc([packet[5], packet[6]])),
        _ => None,
    }
}

fn frame_payload(frame: &[u8]) -> Option<Payload> {
    match frame.len() {
        7 | 14 => Some(Payload::ModeS(frame.to_vec())),
        _ => None,
    }
}

/// Parses one log line. Returns None for comments and malformed lines.
pub fn parse_line(line: &str) -> Option<Frame> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }

    let fields = line.split('\t').map(str::trim).collect::<Vec<_>>();
    if fields.len() != 7 || fields[0].len() < 10 || fields.iter().any(|f| f.is_empty()) {
        return None;
    }

    let payload = if fields[5].len() > fields[6].len() {
        packet_payload(&parse_hex(fields[5])?)?
    } else if fields[5].len() < fields[6].len() {
        frame_payload(&parse_hex(fields[6])?)?
    } else {
        return None;
    };

    Some(Frame {
        t: timestamp(fields[0], fields[1])?,
        receiver: Position::new(fields[2].parse().ok()?, fields[3].parse().ok()?),
        receiver_altitude_m: fields[4].parse().ok()?,
        payload,
    })
}

/// [LogReader] iterates the [Frame]s of a log. Malformed lines are skipped.
/// An I/O error is returned once, and ends the iteration.
pub struct LogReader<R: BufRead> {
    reader: R,
    line: String,
    line_number: usize,
    failed: bool,
}

impl<R: BufRead> LogReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
            failed: false,
        }
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for LogReader<R> {
    type Item = Result<Frame, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    match parse_line(&self.line) {
                        Some(frame) => return Some(Ok(frame)),
                        None => trace!("line {}: skipped", self.line_number),
                    }
                },
                Err(e) => {
                    self.failed = true;
                    return Some(Err(Error::Io(e)));
                },
            }
        }
    }
}
