/// Closed vocabularies shared by both evaluators: viewer roles, disclosure
/// levels, record privacy levels, and consent status.
///
/// Values that arrive from outside the engine (role claims, privacy flags,
/// consent statuses) never fail to deserialize on an unknown string. Each
/// unknown value maps to its most restrictive interpretation instead, so a
/// malformed input yields a more heavily redacted view rather than an error
/// or a leak.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Viewer capability classes recognised by this version of the engine.
///
/// The engine holds no hierarchy among roles: every rule lists the roles it
/// admits explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnownRole {
    /// Platform operator with access across tenants.
    SuperAdmin,
    /// Administrator of a single tenant organisation.
    TenantAdmin,
    /// Educational psychologist: the clinical professional role.
    Epp,
    /// Administrator of a school within a tenant.
    SchoolAdmin,
    /// Teaching staff.
    Teacher,
    /// Parent or guardian of the subject.
    Parent,
    /// External government analyst; some disclosures require consent.
    GovAnalyst,
}

impl KnownRole {
    /// Every known role, in declaration order.
    pub const ALL: [KnownRole; 7] = [
        KnownRole::SuperAdmin,
        KnownRole::TenantAdmin,
        KnownRole::Epp,
        KnownRole::SchoolAdmin,
        KnownRole::Teacher,
        KnownRole::Parent,
        KnownRole::GovAnalyst,
    ];

    /// Returns the wire name of the role as used in claims and rule tables.
    pub fn as_str(self) -> &'static str {
        match self {
            KnownRole::SuperAdmin => "SuperAdmin",
            KnownRole::TenantAdmin => "TenantAdmin",
            KnownRole::Epp => "EPP",
            KnownRole::SchoolAdmin => "SchoolAdmin",
            KnownRole::Teacher => "Teacher",
            KnownRole::Parent => "Parent",
            KnownRole::GovAnalyst => "GovAnalyst",
        }
    }

    /// Looks up a role by its exact wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        KnownRole::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl fmt::Display for KnownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for KnownRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The role a viewer presents: either a [`KnownRole`] or an unrecognised name.
///
/// An `Unrecognized` role is admitted by no rule and is not privileged, which
/// makes it the least-privileged viewer possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// A role recognised by this version of the engine.
    Known(KnownRole),
    /// A role name the engine does not recognise.
    Unrecognized(String),
}

impl Role {
    /// Returns the wire name of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Known(k) => k.as_str(),
            Role::Unrecognized(s) => s.as_str(),
        }
    }

    /// Returns the known role, if any.
    pub fn known(&self) -> Option<KnownRole> {
        match self {
            Role::Known(k) => Some(*k),
            Role::Unrecognized(_) => None,
        }
    }
}

impl From<KnownRole> for Role {
    fn from(role: KnownRole) -> Self {
        Role::Known(role)
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match KnownRole::from_name(s) {
            Some(k) => Role::Known(k),
            None => Role::Unrecognized(s.to_owned()),
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoleVisitor;

        impl de::Visitor<'_> for RoleVisitor {
            type Value = Role;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string naming a viewer role")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(match KnownRole::from_name(v) {
                    Some(k) => Role::Known(k),
                    None => Role::Unrecognized(v.to_owned()),
                })
            }
        }

        deserializer.deserialize_str(RoleVisitor)
    }
}

// ---------------------------------------------------------------------------
// DisclosureLevel
// ---------------------------------------------------------------------------

/// Requested strength of redaction, applied on top of role-based rules.
///
/// Ordered by how much is removed: `Full < ParentSafe < Anonymized`. Levels are
/// cumulative, so a level applies the transforms of every level below it.
/// `Full` adds no transform of its own but never bypasses the role, record or
/// consent rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisclosureLevel {
    /// No additional transformation.
    #[default]
    Full,
    /// Removes content unsafe for a guardian audience.
    ParentSafe,
    /// Strips direct identifiers.
    Anonymized,
}

impl DisclosureLevel {
    /// Every level, least restrictive first.
    pub const ALL: [DisclosureLevel; 3] = [
        DisclosureLevel::Full,
        DisclosureLevel::ParentSafe,
        DisclosureLevel::Anonymized,
    ];

    /// Returns `true` when this level includes the transforms of `other`.
    pub fn applies(self, other: DisclosureLevel) -> bool {
        self >= other
    }

    /// Returns `true` for [`DisclosureLevel::Full`].
    pub fn is_full(self) -> bool {
        matches!(self, DisclosureLevel::Full)
    }

    /// Returns the wire name of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            DisclosureLevel::Full => "FULL",
            DisclosureLevel::ParentSafe => "PARENT_SAFE",
            DisclosureLevel::Anonymized => "ANONYMIZED",
        }
    }
}

impl fmt::Display for DisclosureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PrivacyLevel
// ---------------------------------------------------------------------------

/// Record-wide privacy attribute (`meta.privacyLevel`).
///
/// Deserializes `"standard"` and `null` to [`PrivacyLevel::Standard`]; any
/// other value, string or not, becomes [`PrivacyLevel::Restricted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    /// Field-level rules decide what is visible.
    #[default]
    Standard,
    /// The whole record is suppressed for unprivileged roles.
    Restricted,
}

impl PrivacyLevel {
    /// Returns `true` for [`PrivacyLevel::Restricted`].
    pub fn is_restricted(self) -> bool {
        matches!(self, PrivacyLevel::Restricted)
    }
}

impl<'de> Deserialize<'de> for PrivacyLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Null => PrivacyLevel::Standard,
            serde_json::Value::String(s) if s == "standard" => PrivacyLevel::Standard,
            serde_json::Value::Bool(_)
            | serde_json::Value::Number(_)
            | serde_json::Value::String(_)
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => PrivacyLevel::Restricted,
        })
    }
}

// ---------------------------------------------------------------------------
// ConsentStatus
// ---------------------------------------------------------------------------

/// Status of a consent record.
///
/// Deserializes `"granted"` to [`ConsentStatus::Granted`]; every other string
/// becomes [`ConsentStatus::Revoked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentStatus {
    /// The subject (or guardian) has granted consent.
    Granted,
    /// Consent was withdrawn or never given.
    Revoked,
}

impl<'de> Deserialize<'de> for ConsentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ConsentStatusVisitor;

        impl de::Visitor<'_> for ConsentStatusVisitor {
            type Value = ConsentStatus;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a consent status string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(match v {
                    "granted" => ConsentStatus::Granted,
                    _ => ConsentStatus::Revoked,
                })
            }
        }

        deserializer.deserialize_str(ConsentStatusVisitor)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn to_json<T: Serialize>(v: &T) -> String {
        serde_json::to_string(v).expect("serialize")
    }

    #[test]
    fn known_role_wire_names_round_trip() {
        for role in KnownRole::ALL {
            assert_eq!(KnownRole::from_name(role.as_str()), Some(role));
        }
        assert_eq!(KnownRole::Epp.as_str(), "EPP");
    }

    #[test]
    fn role_deserializes_known_and_unrecognized() {
        let r: Role = serde_json::from_str(r#""SchoolAdmin""#).expect("deserialize");
        assert_eq!(r, Role::Known(KnownRole::SchoolAdmin));

        let r: Role = serde_json::from_str(r#""Janitor""#).expect("deserialize");
        assert_eq!(r, Role::Unrecognized("Janitor".to_owned()));
        assert_eq!(r.known(), None);
    }

    #[test]
    fn role_names_are_case_sensitive() {
        let r: Role = "epp".parse().expect("infallible");
        assert_eq!(r, Role::Unrecognized("epp".to_owned()));
    }

    #[test]
    fn role_serializes_wire_name() {
        assert_eq!(to_json(&Role::Known(KnownRole::GovAnalyst)), r#""GovAnalyst""#);
        assert_eq!(to_json(&Role::Unrecognized("x".to_owned())), r#""x""#);
    }

    #[test]
    fn disclosure_level_wire_names() {
        assert_eq!(to_json(&DisclosureLevel::Full), r#""FULL""#);
        assert_eq!(to_json(&DisclosureLevel::ParentSafe), r#""PARENT_SAFE""#);
        assert_eq!(to_json(&DisclosureLevel::Anonymized), r#""ANONYMIZED""#);
        let back: DisclosureLevel = serde_json::from_str(r#""PARENT_SAFE""#).expect("deserialize");
        assert_eq!(back, DisclosureLevel::ParentSafe);
    }

    #[test]
    fn disclosure_level_is_ordered_by_restrictiveness() {
        assert!(DisclosureLevel::Full < DisclosureLevel::ParentSafe);
        assert!(DisclosureLevel::ParentSafe < DisclosureLevel::Anonymized);
        assert_eq!(DisclosureLevel::default(), DisclosureLevel::Full);
    }

    #[test]
    fn disclosure_levels_are_cumulative() {
        assert!(DisclosureLevel::Anonymized.applies(DisclosureLevel::ParentSafe));
        assert!(DisclosureLevel::ParentSafe.applies(DisclosureLevel::ParentSafe));
        assert!(!DisclosureLevel::ParentSafe.applies(DisclosureLevel::Anonymized));
        assert!(!DisclosureLevel::Full.applies(DisclosureLevel::ParentSafe));
    }

    #[test]
    fn unknown_privacy_level_fails_closed() {
        let p: PrivacyLevel = serde_json::from_str(r#""standard""#).expect("deserialize");
        assert_eq!(p, PrivacyLevel::Standard);
        let p: PrivacyLevel = serde_json::from_str(r#""restricted""#).expect("deserialize");
        assert!(p.is_restricted());
        let p: PrivacyLevel = serde_json::from_str(r#""STANDARD""#).expect("deserialize");
        assert!(p.is_restricted());
    }

    #[test]
    fn null_privacy_level_is_standard() {
        let p: PrivacyLevel = serde_json::from_str("null").expect("deserialize");
        assert_eq!(p, PrivacyLevel::Standard);
    }

    #[test]
    fn non_string_privacy_level_fails_closed() {
        for raw in ["3", "true", "[]", r#"{"level":"standard"}"#] {
            let p: PrivacyLevel = serde_json::from_str(raw).expect("deserialize");
            assert!(p.is_restricted(), "{raw}");
        }
    }

    #[test]
    fn unknown_consent_status_is_not_a_grant() {
        let s: ConsentStatus = serde_json::from_str(r#""granted""#).expect("deserialize");
        assert_eq!(s, ConsentStatus::Granted);
        let s: ConsentStatus = serde_json::from_str(r#""pending""#).expect("deserialize");
        assert_eq!(s, ConsentStatus::Revoked);
    }
}
