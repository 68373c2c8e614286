// Populated by build.rs from proto/auth.proto.
pub mod auth;
