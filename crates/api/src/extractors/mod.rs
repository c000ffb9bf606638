pub mod identity;
pub mod payload;
pub mod tenant;
