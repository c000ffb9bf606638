pub mod asset;
pub mod client;
pub mod comment;
pub mod company;
pub mod note;
pub mod project;
pub mod revoked_credential;
pub mod task;
pub mod team_member;
pub mod user_profile;

pub use asset::Asset;
pub use client::Client;
pub use comment::Comment;
pub use company::Company;
pub use note::Note;
pub use project::{Project, ProjectStatus};
pub use revoked_credential::RevokedCredential;
pub use task::{Task, TaskAssignment, TaskPriority, TaskStatus};
pub use team_member::{Access, MemberStatus, TeamMember};
pub use user_profile::UserProfile;
