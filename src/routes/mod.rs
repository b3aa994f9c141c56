pub mod admin;

pub mod imports;

pub mod membership;

pub mod roster;

pub use admin::configure_admin_routes;
pub use imports::configure_import_routes;
pub use membership::configure_membership_routes;
pub use roster::configure_roster_routes;
