use std::collections::{BTreeMap, HashMap};

/// Local-storage keys written by the login and impersonation flows.
pub mod storage_keys {
    pub const ADMIN_TOKEN: &str = "adminToken";
    pub const USER_TOKEN: &str = "token";
    pub const ROLE: &str = "role";
    pub const ADMIN_VIEW_AS: &str = "adminViewAs";
}

/// Read access to the browser's key/value storage.
pub trait ClientStorage {
    fn get(&self, key: &str) -> Option<&str>;
}

impl ClientStorage for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl ClientStorage for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

/// Snapshot of what the guard reads. Role strings are kept raw; they are
/// resolved through the role registry only when compared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    pub has_admin_token: bool,
    pub has_user_token: bool,
    pub current_role: Option<String>,
    pub impersonation_target: Option<String>,
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ClientState {
    /// Empty values count as absent.
    pub fn from_storage<S: ClientStorage + ?Sized>(storage: &S) -> Self {
        Self {
            has_admin_token: present(storage.get(storage_keys::ADMIN_TOKEN)).is_some(),
            has_user_token: present(storage.get(storage_keys::USER_TOKEN)).is_some(),
            current_role: present(storage.get(storage_keys::ROLE)),
            impersonation_target: present(storage.get(storage_keys::ADMIN_VIEW_AS)),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(role: Option<&str>) -> Self {
        Self {
            has_user_token: true,
            current_role: present(role),
            ..Self::default()
        }
    }

    pub fn admin(impersonating: Option<&str>) -> Self {
        Self {
            has_admin_token: true,
            impersonation_target: present(impersonating),
            ..Self::default()
        }
    }

    pub fn is_impersonating(&self) -> bool {
        self.has_admin_token && self.impersonation_target.is_some()
    }
}
