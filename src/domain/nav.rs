//! Access-gated tab navigation
//!
//! Which dashboard tabs a member can see is a pure function of the tab's
//! role requirement and the member's role. The active tab is resolved on
//! every read, so a role that arrives after the initial tab request is
//! picked up without any explicit re-sync.

use crate::domain::access::{Identity, Role};

/// Main tabs in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Courses,
    Portfolio,
    Patterns,
    Reports,
    Members,
    Payments,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Overview,
        Tab::Courses,
        Tab::Portfolio,
        Tab::Patterns,
        Tab::Reports,
        Tab::Members,
        Tab::Payments,
    ];

    /// Shown when the requested tab is unknown or not visible.
    pub const FALLBACK: Tab = Tab::Overview;

    /// Stable string key, used by the persisted tab parameter and deep links.
    pub fn id(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Courses => "courses",
            Tab::Portfolio => "portfolio",
            Tab::Patterns => "patterns",
            Tab::Reports => "reports",
            Tab::Members => "members",
            Tab::Payments => "payments",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Courses => "Courses",
            Tab::Portfolio => "Portfolio",
            Tab::Patterns => "Patterns",
            Tab::Reports => "Reports",
            Tab::Members => "Members",
            Tab::Payments => "Payments",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            Tab::Overview => '1',
            Tab::Courses => '2',
            Tab::Portfolio => '3',
            Tab::Patterns => '4',
            Tab::Reports => '5',
            Tab::Members => '6',
            Tab::Payments => '7',
        }
    }

    /// Minimum role needed to see this tab; `None` means visible to every
    /// signed-in member.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Tab::Reports => Some(Role::Moderator),
            Tab::Members | Tab::Payments => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn from_id(id: &str) -> Option<Tab> {
        Tab::ALL.iter().copied().find(|tab| tab.id() == id.trim())
    }
}

/// Tabs the given identity may see, in declaration order.
pub fn visible_tabs(identity: &Identity) -> Vec<Tab> {
    Tab::ALL
        .iter()
        .copied()
        .filter(|tab| identity.satisfies(tab.required_role()))
        .collect()
}

/// Resolve the effective active tab for a requested id.
///
/// Pure and deterministic: the same `(requested, identity)` always yields
/// the same tab. Anything unknown or not visible degrades to the fallback;
/// this is navigation UX, not an authorization boundary.
pub fn resolve_active_tab(requested: Option<&str>, identity: &Identity) -> Tab {
    requested
        .and_then(Tab::from_id)
        .filter(|tab| identity.satisfies(tab.required_role()))
        .unwrap_or(Tab::FALLBACK)
}

/// Narrow interface over the persisted tab parameter, so the controller
/// has no dependency on any particular routing or storage mechanism.
pub trait TabStore: std::fmt::Debug {
    fn requested(&self) -> Option<String>;
    fn set_requested(&mut self, id: &str) -> anyhow::Result<()>;
}

/// In-memory adapter, used in tests and when no data directory exists.
#[derive(Debug, Default)]
pub struct MemoryTabStore {
    requested: Option<String>,
}

impl TabStore for MemoryTabStore {
    fn requested(&self) -> Option<String> {
        self.requested.clone()
    }

    fn set_requested(&mut self, id: &str) -> anyhow::Result<()> {
        self.requested = Some(id.to_string());
        Ok(())
    }
}

/// Navigation state for one dashboard session. Owns the requested-tab
/// parameter through a [`TabStore`]; the active tab is derived, never
/// stored.
#[derive(Debug)]
pub struct NavigationState {
    store: Box<dyn TabStore + Send>,
}

impl NavigationState {
    pub fn new(store: Box<dyn TabStore + Send>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryTabStore::default()))
    }

    pub fn requested(&self) -> Option<String> {
        self.store.requested()
    }

    /// Full replace of the requested tab id. The next [`resolve`] sees it.
    ///
    /// [`resolve`]: NavigationState::resolve
    pub fn select_tab(&mut self, id: &str) -> anyhow::Result<()> {
        self.store.set_requested(id)
    }

    pub fn resolve(&self, identity: &Identity) -> Tab {
        resolve_active_tab(self.requested().as_deref(), identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::MembershipTier;

    #[test]
    fn from_id_round_trips() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_id(tab.id()), Some(tab));
        }
        assert_eq!(Tab::from_id("billing"), None);
    }

    #[test]
    fn select_then_resolve_uses_the_new_request() {
        let mut nav = NavigationState::in_memory();
        let identity = Identity::new("dana", Role::Admin, MembershipTier::Premium);

        assert_eq!(nav.resolve(&identity), Tab::Overview);
        nav.select_tab("payments").unwrap();
        assert_eq!(nav.resolve(&identity), Tab::Payments);
        nav.select_tab("courses").unwrap();
        assert_eq!(nav.resolve(&identity), Tab::Courses);
    }

    #[test]
    fn unauthorized_request_degrades_to_fallback() {
        let mut nav = NavigationState::in_memory();
        nav.select_tab("members").unwrap();

        let user = Identity::new("kim", Role::User, MembershipTier::Free);
        assert_eq!(nav.resolve(&user), Tab::FALLBACK);
    }
}
