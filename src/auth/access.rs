//! Access resolution and the space lifecycle gate
//!
//! Two identity planes reach the portal: staff (platform-authenticated,
//! proven by an org membership row) and stakeholders (signed session
//! artifact, proven by a live invite row). Resolution is a pure function of
//! the explicit credential inputs plus the current membership rows; nothing
//! is cached between calls, so a revoked membership denies on the very next
//! request.

use bson::doc;

use crate::auth::session::{SessionClaims, SessionSigner};
use crate::db::mongo::{MongoClient, MongoCollection};
use crate::db::schemas::{
    MemberDoc, SpaceDoc, SpaceStatus, StaffDoc, MEMBER_COLLECTION, SPACE_COLLECTION,
    STAFF_COLLECTION,
};
use crate::types::{GangwayError, Result};

/// A staff identity already authenticated by the platform. Always passed in
/// explicitly; the gate never reads ambient state.
#[derive(Clone, Debug)]
pub struct StaffIdentity {
    pub email: String,
    pub org_id: String,
}

/// An authorized, trust-scoped data-access handle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopedHandle {
    /// Stakeholder handle. Elevated: bypasses per-row policy because the
    /// membership re-check already proved authorization for this space.
    Stakeholder { space_id: String, email: String },
    /// Staff handle. Never elevated; the underlying store's per-row policy
    /// still applies.
    Staff { org_id: String, email: String },
}

impl ScopedHandle {
    /// Actor email for audit entries; works for both planes
    pub fn actor_email(&self) -> &str {
        match self {
            Self::Stakeholder { email, .. } => email,
            Self::Staff { email, .. } => email,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Staff { .. })
    }

    /// Whether the handle bypasses per-row policy
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Stakeholder { .. })
    }
}

/// Reason a space denies access outright
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeniedReason {
    /// Draft spaces are not ready for stakeholders
    NotReady,
    /// Archived spaces deny everyone through this gate
    Archived,
}

/// Result of the lifecycle gate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accessibility {
    pub allowed: bool,
    pub read_only: bool,
    pub reason: Option<DeniedReason>,
}

impl Accessibility {
    /// Map a denial or read-only state to the matching error. Call sites
    /// run this immediately before mutating, never on a cached result.
    pub fn ensure_writable(&self) -> Result<()> {
        match self.reason {
            Some(DeniedReason::NotReady) => return Err(GangwayError::NotReady),
            Some(DeniedReason::Archived) => return Err(GangwayError::Archived),
            None => {}
        }
        if self.read_only {
            return Err(GangwayError::ReadOnly);
        }
        Ok(())
    }
}

/// Lifecycle gate: draft denies (`not_ready`), archived denies, active
/// allows read/write, completed allows read-only.
pub fn check_space_accessibility(status: SpaceStatus) -> Accessibility {
    match status {
        SpaceStatus::Draft => Accessibility {
            allowed: false,
            read_only: false,
            reason: Some(DeniedReason::NotReady),
        },
        SpaceStatus::Archived => Accessibility {
            allowed: false,
            read_only: false,
            reason: Some(DeniedReason::Archived),
        },
        SpaceStatus::Active => Accessibility {
            allowed: true,
            read_only: false,
            reason: None,
        },
        SpaceStatus::Completed => Accessibility {
            allowed: true,
            read_only: true,
            reason: None,
        },
    }
}

/// Decide a stakeholder grant from verified claims plus the membership row
/// looked up *now*. The session proves identity; only a live row proves
/// authorization.
pub fn grant_stakeholder(
    claims: &SessionClaims,
    membership: Option<&MemberDoc>,
) -> Result<ScopedHandle> {
    match membership {
        Some(member) => Ok(ScopedHandle::Stakeholder {
            space_id: member.space_id.clone(),
            email: member.invited_email.clone(),
        }),
        None => Err(GangwayError::Unauthorized(format!(
            "no membership for {} in space {}",
            claims.email, claims.space_id
        ))),
    }
}

/// Decide a staff grant from the org membership row looked up now
pub fn grant_staff(identity: &StaffIdentity, row: Option<&StaffDoc>) -> Result<ScopedHandle> {
    match row {
        Some(staff) => Ok(ScopedHandle::Staff {
            org_id: staff.org_id.clone(),
            email: staff.email.clone(),
        }),
        None => Err(GangwayError::Unauthorized(format!(
            "{} is not staff of the owning organization",
            identity.email
        ))),
    }
}

/// The access control gate. Stateless: every call re-reads membership.
#[derive(Clone)]
pub struct AccessGate {
    spaces: MongoCollection<SpaceDoc>,
    members: MongoCollection<MemberDoc>,
    staff: MongoCollection<StaffDoc>,
    sessions: SessionSigner,
}

impl AccessGate {
    pub async fn new(client: &MongoClient, sessions: SessionSigner) -> Result<Self> {
        Ok(Self {
            spaces: client.collection(SPACE_COLLECTION).await?,
            members: client.collection(MEMBER_COLLECTION).await?,
            staff: client.collection(STAFF_COLLECTION).await?,
            sessions,
        })
    }

    pub fn sessions(&self) -> &SessionSigner {
        &self.sessions
    }

    /// Resolve "who is asking" into an authorized handle, or deny.
    ///
    /// 1. A valid session artifact for this exact space identifies a
    ///    stakeholder; a live membership row must still authorize them.
    /// 2. Otherwise a staff identity must be proven by an org membership
    ///    row for the space's owning organization.
    /// 3. Otherwise: hard denial.
    pub async fn resolve_access(
        &self,
        space_id: &str,
        session_token: Option<&str>,
        staff_identity: Option<&StaffIdentity>,
    ) -> Result<ScopedHandle> {
        if let Some(token) = session_token {
            match self.sessions.verify(token) {
                Ok(claims) if claims.space_id == space_id => {
                    let membership = self
                        .members
                        .find_one(doc! {
                            "space_id": space_id,
                            "invited_email": claims.email.to_lowercase(),
                        })
                        .await?;
                    return grant_stakeholder(&claims, membership.as_ref());
                }
                // A token for another space, or an invalid one, is not an
                // identity here; fall through to the staff plane.
                Ok(_) | Err(_) => {}
            }
        }

        if let Some(identity) = staff_identity {
            let space = self
                .spaces
                .find_one(doc! { "space_id": space_id })
                .await?
                .ok_or_else(|| GangwayError::NotFound(format!("space {space_id}")))?;

            let row = self
                .staff
                .find_one(doc! {
                    "org_id": &space.org_id,
                    "email": identity.email.to_lowercase(),
                })
                .await?;
            return grant_staff(identity, row.as_ref());
        }

        Err(GangwayError::Unauthorized("no resolvable identity".into()))
    }

    /// Load a space and evaluate the lifecycle gate for it
    pub async fn check_space(&self, space_id: &str) -> Result<(SpaceDoc, Accessibility)> {
        let space = self
            .spaces
            .find_one(doc! { "space_id": space_id })
            .await?
            .ok_or_else(|| GangwayError::NotFound(format!("space {space_id}")))?;
        let accessibility = check_space_accessibility(space.status);
        Ok((space, accessibility))
    }
}
