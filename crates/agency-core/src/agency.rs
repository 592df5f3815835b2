//! Agency store handle
//!
//! Everything a caller does goes through an [`Agency`]. Clones share the
//! same database. Methods that depend on the clock have an `_at` variant
//! taking an explicit instant.

use chrono::{DateTime, Utc};

use agency_accounts::{
    authenticate, AccessError, Action, ProfileUpdate, User, UserDraft, UserRole,
};
use agency_policy::{
    render_csv, report_file_name, Policy, PolicyDraft, PolicyFilter, PolicyStatus, StatusEngine,
};
use agency_records::RecordStore;
use agency_storage::Database;

use crate::config::Config;
use crate::error::CoreError;
use crate::seed::{seed_policies, seed_users};
use crate::stats::DashboardStats;
use crate::Result;

pub struct Agency {
    config: Config,
    users: RecordStore<User>,
    policies: RecordStore<Policy>,
    engine: StatusEngine,
}

impl Agency {
    /// Open the database named by `config`, creating its directory if
    /// needed.
    pub fn new(config: Config) -> Result<Self> {
        let db = if config.is_in_memory() {
            Database::open_in_memory()?
        } else {
            if let Some(parent) = config.database_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Database::open(&config.database_path)?
        };

        Ok(Self::with_database(config, db))
    }

    pub fn with_database(config: Config, db: Database) -> Self {
        let engine = StatusEngine::new(config.expiring_window_days);

        Self {
            config,
            users: RecordStore::new(db.clone()),
            policies: RecordStore::new(db),
            engine,
        }
    }

    /// One-time bootstrap. Seeds each collection that has never been
    /// persisted; existing data is never touched.
    pub fn init(&self) -> Result<()> {
        self.init_at(Utc::now())
    }

    pub fn init_at(&self, now: DateTime<Utc>) -> Result<()> {
        if !self.config.seed_demo_data {
            tracing::debug!("Demo seeding disabled");
            return Ok(());
        }

        self.users.seed_if_absent(&seed_users())?;
        let seeded = self.engine.refresh_all(seed_policies(now), now);
        self.policies.seed_if_absent(&seeded)?;

        tracing::info!(
            users = self.users.list().len(),
            policies = self.policies.list().len(),
            "Agency initialized"
        );

        Ok(())
    }

    // === User operations ===

    pub fn list_users(&self) -> Vec<User> {
        self.users.list()
    }

    pub fn find_user(&self, id: &str) -> Option<User> {
        self.users.find(id)
    }

    pub fn customers(&self) -> Vec<User> {
        self.users
            .list()
            .into_iter()
            .filter(|u| u.role == UserRole::Customer)
            .collect()
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        self.users.save(user)?;
        Ok(())
    }

    /// Policies referencing the user are left in place.
    pub fn delete_user(&self, id: &str) -> Result<bool> {
        Ok(self.users.delete(id)?)
    }

    // === Policy operations ===

    /// All policies in storage order with status derived for now.
    pub fn list_policies(&self) -> Vec<Policy> {
        self.list_policies_at(Utc::now())
    }

    pub fn list_policies_at(&self, now: DateTime<Utc>) -> Vec<Policy> {
        self.engine.refresh_all(self.policies.list(), now)
    }

    pub fn find_policy_at(&self, id: &str, now: DateTime<Utc>) -> Option<Policy> {
        self.policies
            .find(id)
            .map(|p| self.engine.refresh(p, now))
    }

    /// Upsert. The stored status is only a snapshot taken at save time.
    pub fn save_policy(&self, policy: &Policy) -> Result<()> {
        let snapshot = self.engine.refresh(policy.clone(), Utc::now());
        self.policies.save(&snapshot)?;
        Ok(())
    }

    pub fn delete_policy(&self, id: &str) -> Result<bool> {
        Ok(self.policies.delete(id)?)
    }

    // === Accounts ===

    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        let users = self.users.list();
        authenticate(&users, email, password)
            .cloned()
            .ok_or_else(|| AccessError::InvalidCredentials.into())
    }

    /// Latest stored copy of `user`, for callers holding a session.
    pub fn refresh_user(&self, user: &User) -> Option<User> {
        self.users.find(&user.id)
    }

    pub fn upsert_user_as(&self, actor: &User, draft: UserDraft) -> Result<User> {
        actor.authorize(Action::ManageUsers)?;

        let existing = draft.id.as_deref().and_then(|id| self.users.find(id));
        let user = draft.into_user(existing.as_ref());
        self.users.save(&user)?;

        tracing::info!(
            actor = %actor.id,
            user_id = %user.id,
            created = existing.is_none(),
            "Saved user"
        );

        Ok(user)
    }

    /// Administrators cannot be removed this way.
    pub fn remove_user_as(&self, actor: &User, id: &str) -> Result<bool> {
        actor.authorize(Action::ManageUsers)?;

        if let Some(target) = self.users.find(id) {
            if target.role == UserRole::Admin {
                return Err(AccessError::ProtectedAccount(target.id).into());
            }
        }

        let removed = self.users.delete(id)?;
        tracing::info!(actor = %actor.id, user_id = %id, removed, "Removed user");
        Ok(removed)
    }

    pub fn update_profile(&self, actor: &User, update: ProfileUpdate) -> Result<User> {
        actor.authorize(Action::UpdateOwnProfile)?;

        let mut user = self
            .users
            .find(&actor.id)
            .ok_or_else(|| CoreError::UserNotFound(actor.id.clone()))?;
        user.apply_profile(update);
        self.users.save(&user)?;

        Ok(user)
    }

    // === Role-gated policy views ===

    /// Policies `viewer` may see: everything for staff and admins, only
    /// their own for customers.
    pub fn visible_policies_at(&self, viewer: &User, now: DateTime<Utc>) -> Vec<Policy> {
        self.list_policies_at(now)
            .into_iter()
            .filter(|p| viewer.can_view_customer(&p.customer_id))
            .collect()
    }

    pub fn search_policies_at(
        &self,
        viewer: &User,
        filter: &PolicyFilter,
        now: DateTime<Utc>,
    ) -> Vec<Policy> {
        filter.apply(&self.visible_policies_at(viewer, now))
    }

    /// Create or edit depending on whether the draft's id is already stored.
    pub fn upsert_policy_as(&self, actor: &User, draft: PolicyDraft) -> Result<Policy> {
        self.upsert_policy_as_at(actor, draft, Utc::now())
    }

    pub fn upsert_policy_as_at(
        &self,
        actor: &User,
        draft: PolicyDraft,
        now: DateTime<Utc>,
    ) -> Result<Policy> {
        let exists = draft
            .id
            .as_deref()
            .is_some_and(|id| self.policies.find(id).is_some());
        actor.authorize(if exists {
            Action::EditPolicy
        } else {
            Action::CreatePolicy
        })?;

        let policy = draft.into_policy(&self.engine, now);
        self.policies.save(&policy)?;

        if self.users.find(&policy.customer_id).is_none() {
            tracing::warn!(
                policy_id = %policy.id,
                customer_id = %policy.customer_id,
                "Policy references an unknown customer"
            );
        }

        tracing::info!(
            actor = %actor.id,
            policy_id = %policy.id,
            created = !exists,
            "Saved policy"
        );

        Ok(policy)
    }

    pub fn remove_policy_as(&self, actor: &User, id: &str) -> Result<bool> {
        actor.authorize(Action::DeletePolicy)?;

        let removed = self.policies.delete(id)?;
        tracing::info!(actor = %actor.id, policy_id = %id, removed, "Removed policy");
        Ok(removed)
    }

    // === Relations ===

    pub fn customer_for(&self, policy: &Policy) -> Option<User> {
        self.users
            .list()
            .into_iter()
            .find(|u| u.owns(&policy.customer_id))
    }

    /// Policies whose customer id matches no stored user.
    pub fn orphaned_policies(&self) -> Vec<Policy> {
        self.orphaned_policies_at(Utc::now())
    }

    pub fn orphaned_policies_at(&self, now: DateTime<Utc>) -> Vec<Policy> {
        let users = self.users.list();
        self.list_policies_at(now)
            .into_iter()
            .filter(|p| !users.iter().any(|u| u.owns(&p.customer_id)))
            .collect()
    }

    // === Dashboard ===

    pub fn dashboard_at(&self, viewer: &User, now: DateTime<Utc>) -> Result<DashboardStats> {
        viewer.authorize(Action::ViewDashboard)?;
        Ok(DashboardStats::compute(
            &self.list_policies_at(now),
            &self.users.list(),
        ))
    }

    /// Badge count shown next to the policy list.
    pub fn expiring_count_at(&self, now: DateTime<Utc>) -> usize {
        self.list_policies_at(now)
            .iter()
            .filter(|p| p.status == PolicyStatus::ExpiringSoon)
            .count()
    }

    /// Full policy report as `(file name, csv)`.
    pub fn policy_report_at(&self, viewer: &User, now: DateTime<Utc>) -> Result<(String, String)> {
        viewer.authorize(Action::ViewDashboard)?;
        let csv = render_csv(&self.list_policies_at(now));
        Ok((report_file_name(now.date_naive()), csv))
    }
}

impl Clone for Agency {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            users: self.users.clone(),
            policies: self.policies.clone(),
            engine: self.engine,
        }
    }
}
