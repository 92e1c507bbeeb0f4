//! Feature-flag and auth predicates checked before a batch runs.

pub trait FeatureFlags: Send + Sync {
    fn is_enabled(&self, flag: &str) -> bool;
}

pub trait AuthContext: Send + Sync {
    /// Id of the signed-in user, if any.
    fn current_user_id(&self) -> Option<String>;
}
