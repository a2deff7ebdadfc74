use std::fmt;

/// Bearer credential for Books API requests.
///
/// No expiry is tracked: a stale token only shows up as rejected page requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
}

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// `Authorization` header value expected by the Books API.
    pub fn authorization(&self, scheme: &str) -> String {
        format!("{} {}", scheme, self.value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(len={})", self.value.len())
    }
}
