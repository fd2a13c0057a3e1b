use std::io::{BufReader, Cursor};

use pretty_assertions::assert_eq;
use smftext::prelude::*;

const FILE: [u8; 36] = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96, //
    b'M', b'T', b'r', b'k', 0, 0, 0, 14, //
    0x00, 0x92, 0x3C, 0x40, //
    0x60, 0x3C, 0x00, //
    0x00, 0x3E, 0x40, //
    0x00, 0xFF, 0x2F, 0x00,
];

fn render<R: MidiSource>(reader: &mut Reader<R>) -> ReadResult<String> {
    let mut emitter = TextEmitter::new(Vec::new(), TextOptions::default());
    SmfDecoder::new(DecoderOptions::default()).decode(reader, &mut emitter)?;
    Ok(String::from_utf8(emitter.into_inner()).unwrap_or_default())
}

#[test]
fn slices_and_readers_decode_alike() {
    let from_slice = render(&mut Reader::from_byte_slice(&FILE)).unwrap();
    let from_reader = render(&mut Reader::from_reader(BufReader::new(Cursor::new(FILE)))).unwrap();
    assert_eq!(from_slice, from_reader);
    assert_eq!(
        from_slice,
        "MFile 0 1 96\nMTrk\n\
         0 On ch=3 n=60 v=64\n\
         96 On ch=3 n=60 v=0\n\
         96 On ch=3 n=62 v=64\n\
         96 Meta TrkEnd\n\
         TrkEnd\n"
    );
}

#[test]
fn file_without_tracks() {
    let text = render(&mut Reader::from_byte_slice(&FILE[..14])).unwrap();
    assert_eq!(text, "MFile 0 1 96\n");
}

#[test]
fn every_truncation_is_reported() {
    for len in 1..FILE.len() {
        if len == 14 {
            continue;
        }
        let err = render(&mut Reader::from_byte_slice(&FILE[..len])).unwrap_err();
        assert!(err.is_truncated(), "{len}: {err}");
        assert!(!err.is_format_violation());
    }
}

#[test]
fn format_violations() {
    let mut not_midi = FILE;
    not_midi[..4].copy_from_slice(b"RIFF");
    let err = render(&mut Reader::from_byte_slice(&not_midi)).unwrap_err();
    assert!(matches!(err.error_kind(), ReaderErrorKind::ExpectedHeaderChunk));
    assert!(err.is_format_violation());

    let mut foreign_chunk = FILE;
    foreign_chunk[14..18].copy_from_slice(b"XFIH");
    let err = render(&mut Reader::from_byte_slice(&foreign_chunk)).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::ExpectedTrackChunk(tag) if tag == b"XFIH"
    ));
    assert_eq!(err.position(), 18);

    let mut bad_status = FILE;
    bad_status[23] = 0xF4;
    let err = render(&mut Reader::from_byte_slice(&bad_status)).unwrap_err();
    assert!(matches!(err.error_kind(), ReaderErrorKind::MalformedEvent(0xF4)));
}

#[test]
fn emitter_refusal_stops_decoding() {
    let mut format_3 = FILE;
    format_3[9] = 3;
    let err = render(&mut Reader::from_byte_slice(&format_3)).unwrap_err();
    let ReaderErrorKind::Sink(inner) = err.error_kind() else {
        panic!("{err}");
    };
    assert_eq!(inner.to_string(), "can't deal with format 3 files");
}
