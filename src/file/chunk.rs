#![doc = r#"
MIDI file chunks

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then the chunk data.

## Header chunk

The header chunk (identified by "MThd") must be the first chunk in a MIDI file. It
always has a length of 6 bytes and holds the [`Format`](super::Format), the number
of tracks and the [`Division`](super::Division).

## Track chunks

Track chunks (identified by "MTrk") contain the actual MIDI events. The declared
length must exactly bound the event stream: a decoder that crosses it has lost
sync with the file.

# Example Structure

```text
[Header Chunk: "MThd" 00 00 00 06 ffff nnnn dddd]
[Track Chunk 1: "MTrk" <length> <events>]
...
[Track Chunk N: "MTrk" <length> <events>]
```
"#]

/// Identifier of the header chunk
pub const HEADER_TAG: [u8; 4] = *b"MThd";

/// Identifier of a track chunk
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

/// Length of the header chunk body
pub const HEADER_LENGTH: u32 = 6;

/// Size of a chunk tag plus its length field
pub const CHUNK_PREFIX_LENGTH: usize = 8;

/// The 8 bytes that open a chunk.
pub const fn chunk_prefix(tag: [u8; 4], length: u32) -> [u8; CHUNK_PREFIX_LENGTH] {
    let len = length.to_be_bytes();
    [
        tag[0], tag[1], tag[2], tag[3], len[0], len[1], len[2], len[3],
    ]
}

#[test]
fn prefix_layout() {
    assert_eq!(
        chunk_prefix(TRACK_TAG, 0x0102_0304),
        [b'M', b'T', b'r', b'k', 1, 2, 3, 4]
    );
}
