pub mod ids;
pub mod user;
pub mod profile;
pub mod business;
pub mod project;
pub mod interaction;

// Re-exports for convenience
pub use ids::Id;
pub use user::User;
pub use profile::{Phone, PhoneType, Profile};
pub use business::{Address, Business};
pub use project::{Project, ProjectKind, ProjectRelationship, ProjectStatus};
pub use interaction::{Interaction, InteractionKind};
