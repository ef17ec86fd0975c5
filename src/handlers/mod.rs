// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (static bearer token, /api/*)
pub mod protected;
pub mod public;
