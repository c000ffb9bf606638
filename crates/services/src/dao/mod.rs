pub mod asset;
pub mod base;
pub mod client;
pub mod comment;
pub mod company;
pub mod note;
pub mod project;
pub mod revocation;
pub mod task;
pub mod team_member;
pub mod user_profile;

pub use base::BaseDao;
