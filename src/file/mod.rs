#![doc = r#"
File level structures: chunks, the header and its timing division.
"#]

pub mod chunk;

mod division;
pub use division::*;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod smpte;
pub use smpte::*;

mod smpte_offset;
pub use smpte_offset::*;
