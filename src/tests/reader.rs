use crate::{
    prelude::{Error, LogReader, Payload, Position},
    reader::parse_line,
    tests::{bytes, init_logger, AIRBORNE_EVEN, AIRBORNE_ODD},
};

use std::io::{BufReader, Cursor, Read};

fn sdr_line(seconds: u64, micros: u32, frame: &str) -> String {
    format!("{}\t{}\t52.0\t4.0\t10.5\t0x0000\t0x{}", seconds, micros, frame)
}

fn kinetic_line(seconds: u64, micros: u32, packet: &str) -> String {
    format!("{}\t{}\t52.0\t4.0\t10.5\t0x{}\t0xABCD", seconds, micros, packet)
}

#[test]
fn sdr_format() {
    init_logger();
    let frame = parse_line(&sdr_line(1559390400, 123456, AIRBORNE_EVEN)).unwrap();

    assert_eq!(frame.t.to_gregorian_utc(), (2019, 6, 1, 12, 0, 0, 123_456_000));
    assert_eq!(frame.receiver, Position::new(52.0, 4.0));
    assert_eq!(frame.receiver_altitude_m, 10.5);
    assert_eq!(frame.payload, Payload::ModeS(bytes(AIRBORNE_EVEN)));
    assert!(frame.payload.is_extended_squitter());

    let short = parse_line(&sdr_line(1559390400, 0, &AIRBORNE_EVEN[..14])).unwrap();
    assert_eq!(short.payload, Payload::ModeS(bytes(&AIRBORNE_EVEN[..14])));
    assert!(!short.payload.is_extended_squitter());
}

#[test]
fn kinetic_format() {
    init_logger();

    let long = kinetic_line(1559390400, 5, &format!("0100000000{}", AIRBORNE_ODD));
    let frame = parse_line(&long).unwrap();
    assert_eq!(frame.payload, Payload::ModeS(bytes(AIRBORNE_ODD)));

    let long = kinetic_line(1559390400, 5, &format!("0500000000{}", AIRBORNE_ODD));
    assert_eq!(parse_line(&long).unwrap().payload, Payload::ModeS(bytes(AIRBORNE_ODD)));

    let truncated = kinetic_line(1559390400, 5, "0700000000");
    assert!(parse_line(&truncated).is_none());

    let short = kinetic_line(1559390400, 5, "070000000002E197B00D2B84");
    assert_eq!(
        parse_line(&short).unwrap().payload,
        Payload::ModeS(bytes("02E197B00D2B84"))
    );

    let mode_ac = kinetic_line(1559390400, 5, "09000000001234");
    assert_eq!(
        parse_line(&mode_ac).unwrap().payload,
        Payload::ModeAc([0x12, 0x34])
    );
}

#[test]
fn skipped_lines() {
    init_logger();
    let valid = sdr_line(1559390400, 0, AIRBORNE_EVEN);
    assert!(parse_line(&valid).is_some());

    // comment
    assert!(parse_line(&format!("#{}", valid)).is_none());
    // short timestamp
    assert!(parse_line(&sdr_line(155939040, 0, AIRBORNE_EVEN)).is_none());
    // 10 bytes payload
    assert!(parse_line(&sdr_line(1559390400, 0, &AIRBORNE_EVEN[..20])).is_none());
    // field count
    assert!(parse_line(&valid.replacen('\t', " ", 1)).is_none());
    // empty field
    assert!(parse_line("1559390400\t0\t\t4.0\t10.5\t0x00\t0x8D40621D58C382D690C8AC2863A7").is_none());
    // equal lengths
    assert!(parse_line("1559390400\t0\t52.0\t4.0\t10.5\t0x0000\t0x0000").is_none());
    // not a number
    assert!(parse_line(&valid.replace("52.0", "north")).is_none());
    // unknown packet tag
    assert!(parse_line(&kinetic_line(1559390400, 5, &format!("0200000000{}", AIRBORNE_ODD))).is_none());
}

#[test]
fn log_iteration() {
    init_logger();
    let content = [
        "# receiver log".to_string(),
        sdr_line(1559390400, 0, AIRBORNE_EVEN),
        "garbage".to_string(),
        String::new(),
        sdr_line(1559390402, 0, AIRBORNE_ODD),
    ]
    .join("\n");

    let mut reader = LogReader::new(Cursor::new(content));
    let frames = reader.by_ref().collect::<Result<Vec<_>, Error>>().unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1].payload, Payload::ModeS(bytes(AIRBORNE_ODD)));
    assert_eq!(reader.line_number(), 5);
}

struct Failing;

impl Read for Failing {
    fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("device unplugged"))
    }
}

#[test]
fn io_failure() {
    init_logger();
    let mut reader = LogReader::new(BufReader::new(Failing));
    assert!(matches!(reader.next(), Some(Err(Error::Io(_)))));
    assert!(reader.next().is_none());
}
