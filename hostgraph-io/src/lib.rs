//! The `Getter` capability abstraction over blob storage, plus its two
//! implementations: local filesystem (tests, local dev) and HTTP object
//! store (production).

pub mod getter;
pub mod local;
pub mod object;

pub use getter::Getter;
pub use local::LocalGetter;
pub use object::ObjectGetter;
