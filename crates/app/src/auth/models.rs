//! Auth data models.

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Admin Token UUID
pub type AdminTokenUuid = TypedUuid<AdminTokenRecord>;

/// Admin API token metadata. The hash itself is never loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminTokenRecord {
    pub uuid: AdminTokenUuid,
    pub name: String,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// The authenticated caller of an admin endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPrincipal {
    pub token: AdminTokenUuid,
    pub name: String,
}

/// Token issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedAdminToken {
    pub token: String,
    pub metadata: AdminTokenRecord,
}
