//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod club_repo;
pub mod cordage_repo;
pub mod job_repo;
pub mod setting_repo;
pub mod stringer_repo;
pub mod tariff_repo;
pub mod tournament_repo;

pub use club_repo::ClubRepo;
pub use cordage_repo::CordageRepo;
pub use job_repo::JobRepo;
pub use setting_repo::SettingRepo;
pub use stringer_repo::StringerRepo;
pub use tariff_repo::TariffRepo;
pub use tournament_repo::TournamentRepo;
