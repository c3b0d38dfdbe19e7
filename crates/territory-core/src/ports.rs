//! Port trait definitions
//!
//! These traits define the collaborator interfaces that adapters must
//! implement: the persistence store and the external geocoder.

pub mod geocoder;
pub mod storage;

pub use geocoder::Geocoder;
pub use storage::AccountStore;
