use std::fmt;
use std::sync::Arc;

/// Grouping key for conflict resolution.
///
/// Equal to the domain itself unless the leftmost label is `<letters><digits>`,
/// in which case the digits collapse into a wildcard:
/// `a36243.actonservice.com` becomes `a*.actonservice.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneralizedKey(Arc<str>);

impl GeneralizedKey {
    pub fn from_domain(domain: &str) -> Self {
        match split_numeric_label(domain) {
            Some((letters, rest)) => Self(Arc::from(format!("{}*.{}", letters, rest))),
            None => Self(Arc::from(domain)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_generalized(&self) -> bool {
        self.0.contains('*')
    }
}

impl fmt::Display for GeneralizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GeneralizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns the alphabetic stem of the first label and everything after its dot
/// when the first label is letters followed by at least one digit.
fn split_numeric_label(domain: &str) -> Option<(&str, &str)> {
    let (label, rest) = domain.split_once('.')?;

    let stem_len = label.bytes().take_while(u8::is_ascii_alphabetic).count();
    let digits = &label[stem_len..];

    if stem_len == 0 || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some((&label[..stem_len], rest))
}
