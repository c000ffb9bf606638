pub mod test_app;

pub use seed::{SeededCompany, SeededMember, SeededUser};
pub use test_app::TestApp;
