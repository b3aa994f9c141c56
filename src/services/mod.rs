pub mod admin;
pub(crate) mod context;
pub mod imports;
pub mod membership;
pub mod roster;

pub use admin::AdminService;
pub use imports::ImportService;
pub use membership::MembershipService;
pub use roster::RosterService;
