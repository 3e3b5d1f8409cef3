//! Protocol module containing the line codec and reserved literals.

pub mod codec;
pub mod status;

pub use codec::{decode_line, encode_command};
pub use status::*;
