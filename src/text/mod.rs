#![doc = r#"
The text side of the transcoder

[`TextEmitter`] renders decoded events one per line, [`Lexer`] and
[`compile`] turn such lines back into a Standard MIDI File. The format is
line oriented:

```text
MFile <format> <ntrks> <division>
MTrk
<time> <event> <arguments>
TrkEnd
```
"#]

mod driver;
pub use driver::*;

mod emitter;
pub use emitter::*;

mod error;
pub use error::*;

mod lexer;
pub use lexer::*;

mod options;
pub use options::*;

mod token;
pub use token::*;

use std::io::Write;

use crate::reader::{DecoderOptions, ReadResult, Reader, SmfDecoder};

/// Render a whole file as text into `out`.
pub fn decompile<W: Write>(
    bytes: &[u8],
    out: W,
    text_options: TextOptions,
    decoder_options: DecoderOptions,
) -> ReadResult<W> {
    let mut emitter = TextEmitter::new(out, text_options);
    SmfDecoder::new(decoder_options).decode(&mut Reader::from_byte_slice(bytes), &mut emitter)?;
    Ok(emitter.into_inner())
}
