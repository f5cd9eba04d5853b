//! Roles, membership tiers, and the signed-in member identity

/// Permission level of a member. Forms a single linear hierarchy:
/// every role sees everything the roles below it see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Moderator, Role::Admin];

    /// Position in the hierarchy. All gating compares ranks; nothing
    /// branches on role names.
    pub fn rank(&self) -> u8 {
        match self {
            Role::User => 0,
            Role::Moderator => 1,
            Role::Admin => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Role::User => "Member",
            Role::Moderator => "Moderator",
            Role::Admin => "Admin",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value.trim().to_lowercase().as_str() {
            "user" | "member" => Some(Role::User),
            "moderator" | "mod" => Some(Role::Moderator),
            "admin" | "administrator" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Subscription classification. Informational only: shown in the header
/// and profile popup, never used for gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MembershipTier {
    #[default]
    Free,
    Premium,
}

impl MembershipTier {
    pub fn title(&self) -> &'static str {
        match self {
            MembershipTier::Free => "Free",
            MembershipTier::Premium => "Premium",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            MembershipTier::Free => "free",
            MembershipTier::Premium => "premium",
        }
    }

    pub fn parse(value: &str) -> Option<MembershipTier> {
        match value.trim().to_lowercase().as_str() {
            "free" => Some(MembershipTier::Free),
            "premium" | "pro" => Some(MembershipTier::Premium),
            _ => None,
        }
    }
}

/// The current member, as supplied by the profile collaborator.
///
/// `role` is `None` while the profile fetch is still in flight; a loading
/// identity satisfies no gated requirement, so gated tabs stay hidden
/// until the concrete role arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub display_name: String,
    pub role: Option<Role>,
    pub tier: MembershipTier,
}

impl Identity {
    /// Identity before the profile fetch has completed.
    pub fn loading(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            role: None,
            tier: MembershipTier::Free,
        }
    }

    pub fn new(display_name: impl Into<String>, role: Role, tier: MembershipTier) -> Self {
        Self {
            display_name: display_name.into(),
            role: Some(role),
            tier,
        }
    }

    /// Whether this identity satisfies an optional minimum role.
    pub fn satisfies(&self, required: Option<Role>) -> bool {
        match required {
            None => true,
            Some(required) => self
                .role
                .map(|role| role.rank() >= required.rank())
                .unwrap_or(false),
        }
    }

    pub fn role_title(&self) -> &'static str {
        self.role.map(|role| role.title()).unwrap_or("…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_is_a_total_order() {
        assert!(Role::Admin.rank() > Role::Moderator.rank());
        assert!(Role::Moderator.rank() > Role::User.rank());
    }

    #[test]
    fn parse_aliases() {
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse("mod"), Some(Role::Moderator));
        assert_eq!(Role::parse("member"), Some(Role::User));
        assert_eq!(Role::parse("root"), None);
        assert_eq!(MembershipTier::parse("pro"), Some(MembershipTier::Premium));
    }

    #[test]
    fn loading_identity_satisfies_nothing_gated() {
        let identity = Identity::loading("dana");
        assert!(identity.satisfies(None));
        assert!(!identity.satisfies(Some(Role::User)));
        assert!(!identity.satisfies(Some(Role::Admin)));
    }

    #[test]
    fn higher_rank_satisfies_lower_requirement() {
        let admin = Identity::new("dana", Role::Admin, MembershipTier::Premium);
        assert!(admin.satisfies(Some(Role::User)));
        assert!(admin.satisfies(Some(Role::Moderator)));
        assert!(admin.satisfies(Some(Role::Admin)));

        let user = Identity::new("kim", Role::User, MembershipTier::Free);
        assert!(user.satisfies(Some(Role::User)));
        assert!(!user.satisfies(Some(Role::Moderator)));
    }
}
