//! Role permissions

use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::user::{User, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    ViewDashboard,
    ManageUsers,
    CreatePolicy,
    EditPolicy,
    DeletePolicy,
    ViewAllPolicies,
    UpdateOwnProfile,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ViewDashboard => "view the dashboard",
            Action::ManageUsers => "manage users",
            Action::CreatePolicy => "create policies",
            Action::EditPolicy => "edit policies",
            Action::DeletePolicy => "delete policies",
            Action::ViewAllPolicies => "view all policies",
            Action::UpdateOwnProfile => "update their profile",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl UserRole {
    pub fn can(&self, action: Action) -> bool {
        match (self, action) {
            (_, Action::UpdateOwnProfile) => true,
            (UserRole::Admin, _) => true,
            (UserRole::Staff, Action::ManageUsers | Action::DeletePolicy) => false,
            (UserRole::Staff, _) => true,
            (UserRole::Customer, _) => false,
        }
    }
}

impl User {
    pub fn can(&self, action: Action) -> bool {
        self.role.can(action)
    }

    pub fn authorize(&self, action: Action) -> crate::Result<()> {
        if self.can(action) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.id,
                role = %self.role,
                action = %action,
                "Action denied"
            );
            Err(AccessError::Forbidden {
                role: self.role,
                action,
            })
        }
    }

    /// Whether this account may see records belonging to `customer_id`.
    pub fn can_view_customer(&self, customer_id: &str) -> bool {
        self.can(Action::ViewAllPolicies) || self.owns(customer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_can_do_everything() {
        for action in [
            Action::ViewDashboard,
            Action::ManageUsers,
            Action::CreatePolicy,
            Action::EditPolicy,
            Action::DeletePolicy,
            Action::ViewAllPolicies,
            Action::UpdateOwnProfile,
        ] {
            assert!(UserRole::Admin.can(action), "{action}");
        }
    }

    #[test]
    fn test_staff_limits() {
        assert!(UserRole::Staff.can(Action::CreatePolicy));
        assert!(UserRole::Staff.can(Action::EditPolicy));
        assert!(UserRole::Staff.can(Action::ViewDashboard));
        assert!(!UserRole::Staff.can(Action::ManageUsers));
        assert!(!UserRole::Staff.can(Action::DeletePolicy));
    }

    #[test]
    fn test_customer_limits() {
        assert!(UserRole::Customer.can(Action::UpdateOwnProfile));
        assert!(!UserRole::Customer.can(Action::ViewAllPolicies));
        assert!(!UserRole::Customer.can(Action::EditPolicy));
    }

    #[test]
    fn test_authorize_reports_role_and_action() {
        let staff = User::new("S".into(), "s@x.com".into(), UserRole::Staff);
        let err = staff.authorize(Action::DeletePolicy).unwrap_err();
        assert_eq!(
            err,
            AccessError::Forbidden {
                role: UserRole::Staff,
                action: Action::DeletePolicy
            }
        );
        assert_eq!(err.to_string(), "STAFF accounts cannot delete policies");
    }

    #[test]
    fn test_customer_sees_only_own_records() {
        let mut customer = User::new("C".into(), "c@x.com".into(), UserRole::Customer);
        customer.id = "3".into();
        assert!(customer.can_view_customer("3 "));
        assert!(!customer.can_view_customer("4"));

        let staff = User::new("S".into(), "s@x.com".into(), UserRole::Staff);
        assert!(staff.can_view_customer("4"));
    }
}
