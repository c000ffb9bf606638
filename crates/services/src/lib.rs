pub mod dao;
pub mod identity;

pub use dao::*;
pub use identity::IdentityService;
