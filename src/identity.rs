use std::fmt;

/// The host user git operations run as.
///
/// When `fednode` runs under `sudo`, checkouts should still belong to the
/// operator who invoked it, so git is re-executed as that user. The identity
/// is resolved once at startup and passed to every git invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EffectiveIdentity {
    /// Run git as the current process user.
    #[default]
    Current,
    /// Run git through `sudo -u <user>`.
    User(String),
}

impl EffectiveIdentity {
    /// Resolve from an explicit override, falling back to the invoking
    /// `sudo` user when running as root.
    pub fn resolve(explicit: Option<&str>) -> Self {
        let sudo_user = std::env::var("SUDO_USER").ok();
        Self::resolve_with(explicit, crate::platform::is_root(), sudo_user.as_deref())
    }

    pub fn resolve_with(explicit: Option<&str>, is_root: bool, sudo_user: Option<&str>) -> Self {
        if let Some(user) = explicit.filter(|u| !u.is_empty()) {
            return EffectiveIdentity::User(user.to_string());
        }
        match sudo_user {
            Some(user) if is_root && !user.is_empty() && user != "root" => {
                EffectiveIdentity::User(user.to_string())
            }
            _ => EffectiveIdentity::Current,
        }
    }

    /// Program and leading arguments that run `program` under this identity.
    pub fn wrap(&self, program: &str) -> (String, Vec<String>) {
        match self {
            EffectiveIdentity::Current => (program.to_string(), Vec::new()),
            EffectiveIdentity::User(user) => (
                "sudo".to_string(),
                vec![
                    "-u".to_string(),
                    user.clone(),
                    "--".to_string(),
                    program.to_string(),
                ],
            ),
        }
    }
}

impl fmt::Display for EffectiveIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectiveIdentity::Current => f.write_str("current user"),
            EffectiveIdentity::User(user) => write!(f, "user `{}`", user),
        }
    }
}
