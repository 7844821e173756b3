pub mod principal;
pub mod validated_json;

pub use principal::Principal;
pub use validated_json::ValidatedJson;
