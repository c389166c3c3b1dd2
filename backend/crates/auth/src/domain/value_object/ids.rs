//! Typed identifiers for users and refresh tokens

use kernel::id::Id;

pub struct UserMarker;
pub struct RefreshTokenMarker;

/// User identifier (UUID v4), also the JWT subject
pub type UserId = Id<UserMarker>;

pub type RefreshTokenId = Id<RefreshTokenMarker>;
