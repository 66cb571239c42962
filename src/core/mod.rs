// Domain-layer modules and shared errors/models
pub mod age {
    pub use crate::age::*;
}

pub mod indicators {
    pub use crate::indicators::*;
}

pub mod lookup {
    pub use crate::lookup::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
