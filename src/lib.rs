#![warn(missing_docs)]
#![doc = r#"
Transcode Standard MIDI Files (SMF) to and from a line oriented text format.

# Overview

The crate is split into two halves that share one event vocabulary:

- the binary codec: [`SmfDecoder`](crate::reader::SmfDecoder) walks an SMF byte
  stream and hands every decoded [`TrackEvent`](crate::event::TrackEvent) to an
  [`SmfSink`](crate::reader::SmfSink); [`SmfWriter`](crate::writer::SmfWriter)
  emits the same events back into a byte stream, backpatching track lengths.
- the text layer: [`TextEmitter`](crate::text::TextEmitter) is a sink that
  renders events as text lines, and [`compile`](crate::text::compile) reads a
  [`TokenStream`](crate::text::TokenStream) and drives the writer.

```text
binary SMF -> SmfDecoder -> TextEmitter -> text
text -> Lexer -> TextDriver -> SmfWriter -> binary SMF
```

# Example
```rust
use smftext::prelude::*;

let text = "MFile 0 1 96\nMTrk\n0 On ch=1 n=60 v=100\n96 Off ch=1 n=60 v=0\n96 Meta TrkEnd\nTrkEnd\n";

let mut smf = Vec::new();
let diagnostics = compile(&mut Lexer::new(text), &mut smf, DriverOptions::default()).unwrap();
assert!(diagnostics.is_empty());

let mut rendered = Vec::new();
decompile(&smf, &mut rendered, TextOptions::default(), DecoderOptions::default()).unwrap();
assert_eq!(String::from_utf8(rendered).unwrap(), text);
```
"#]

mod byte;
pub use byte::*;

pub mod event;
pub mod file;
pub mod reader;
pub mod text;
pub mod writer;

mod note;
pub use note::*;

mod time;
pub use time::*;

pub mod vlq;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        byte::*,
        event::*,
        file::*,
        note::*,
        reader::{
            DecoderOptions, MidiSource, ReadResult, Reader, ReaderError, ReaderErrorKind,
            SmfDecoder, SmfSink, decode,
        },
        text::{
            Diagnostic, DriverOptions, EmitError, Keyword, Lexer, TextEmitter, TextError,
            TextOptions, TimeMode, Token, TokenStream, compile, decompile,
        },
        time::*,
        vlq::{decode_vlq, encode_vlq},
        writer::{MidiSink, SeekWrap, SmfWriter, TrackWriter, WriteError, WriteResult, WriterOptions},
    };
}
