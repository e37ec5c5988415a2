pub mod entities;
pub mod permissions;
pub mod requests;
pub mod responses;

pub use permissions::Permission;
