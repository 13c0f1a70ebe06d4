pub mod user;
pub mod profile;
pub mod listing;

pub use user::{LoginRequest, Role, User};
pub use profile::{FemboyProfile, MeSnapshot, ProfileSnapshot, ProfileUpdate, RenterProfile};
pub use listing::{AvailabilitySlot, Listing, ListingSummary, ListingUpsert, SlotInput};
