//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing a beginning of some period.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing an end of some period.
#[derive(Clone, Copy, Debug)]
pub struct End;

/// Marker type describing an expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;
