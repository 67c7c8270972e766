use std::collections::HashSet;
use std::fmt;

/// Account identifier (phone number) and password presented with a request.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountCredential {
    account_id: String,
    secret: String,
}

impl AccountCredential {
    pub fn new(account_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            secret: secret.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// True when either half of the pair is empty
    pub fn is_incomplete(&self) -> bool {
        self.account_id.trim().is_empty() || self.secret.is_empty()
    }

    /// Exact comparison against a stored pair
    pub fn matches(&self, account_id: &str, secret: &str) -> bool {
        self.account_id == account_id && self.secret == secret
    }
}

impl fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredential")
            .field("account_id", &self.account_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Set of account identifiers permitted to authenticate.
///
/// Parsed from a single configured string; entries may be separated by
/// commas, semicolons or whitespace.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    accounts: HashSet<String>,
}

impl Allowlist {
    pub fn parse(raw: &str) -> Self {
        let accounts = raw
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { accounts }
    }

    pub fn permits(&self, account_id: &str) -> bool {
        self.accounts.contains(account_id)
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_hides_secret() {
        let cred = AccountCredential::new("1380000", "hunter2");
        let rendered = format!("{:?}", cred);
        assert!(rendered.contains("1380000"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_credential_incomplete() {
        assert!(AccountCredential::new("", "pw").is_incomplete());
        assert!(AccountCredential::new("   ", "pw").is_incomplete());
        assert!(AccountCredential::new("1380000", "").is_incomplete());
        assert!(!AccountCredential::new("1380000", "pw").is_incomplete());
    }

    #[test]
    fn test_credential_matches_is_exact() {
        let cred = AccountCredential::new("1380000", "pw1");
        assert!(cred.matches("1380000", "pw1"));
        assert!(!cred.matches("1380000", "pw2"));
        assert!(!cred.matches("1380001", "pw1"));
        assert!(!cred.matches("1380000", "PW1"));
    }

    #[test]
    fn test_allowlist_parse_mixed_separators() {
        let list = Allowlist::parse("1380000, 1390000;1500000\n1860000");
        assert_eq!(list.len(), 4);
        assert!(list.permits("1380000"));
        assert!(list.permits("1860000"));
        assert!(!list.permits("1770000"));
    }

    #[test]
    fn test_allowlist_requires_whole_entry() {
        // A prefix of a listed number is not itself listed
        let list = Allowlist::parse("13800001111");
        assert!(!list.permits("1380000"));
        assert!(list.permits("13800001111"));
    }

    #[test]
    fn test_allowlist_empty_string() {
        assert!(Allowlist::parse("  ,; ").is_empty());
    }
}
