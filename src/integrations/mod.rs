//! StUF 0204 integration with the population register.

pub mod stuf_client {
    pub use crate::stuf_client::*;
}

pub mod stuf_message {
    pub use crate::stuf_message::*;
}

pub mod stuf_parser {
    pub use crate::stuf_parser::*;
}
