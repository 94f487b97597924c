use serde::{Deserialize, Serialize};

/// A named capability that can be bound to an issued token.
///
/// Two scopes are equal by name; the `public` flag controls whether a
/// resource owner needs to have explicitly authorized it (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
    pub public: bool,
}

impl Scope {
    pub fn new(name: impl Into<String>, public: bool) -> Self {
        Self {
            name: name.into(),
            public,
        }
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Scope {}

/// Tokenize a whitespace-delimited scope string, preserving order and duplicates.
pub fn split_scope(scope: &str) -> Vec<String> {
    scope.split_whitespace().map(str::to_string).collect()
}

/// Re-join a sequence of scope names the way they are stored on a `Token`.
pub fn join_scope<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_equal_by_name_only() {
        let a = Scope::new("read", true);
        let b = Scope::new("read", false);
        assert_eq!(a, b);
    }

    #[test]
    fn split_scope_preserves_order_and_duplicates() {
        assert_eq!(
            split_scope("read write read"),
            vec!["read", "write", "read"]
        );
    }

    #[test]
    fn split_scope_empty_is_empty() {
        assert!(split_scope("").is_empty());
        assert!(split_scope("   ").is_empty());
    }

    #[test]
    fn join_scope_round_trips() {
        let names = split_scope("read write");
        assert_eq!(join_scope(&names), "read write");
    }
}
