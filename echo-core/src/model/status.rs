use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Verdict classification returned by the model.
///
/// The model's schema is advisory, so any other string is kept as-is in
/// `Other` rather than rejected. Presentation treats `Other` like `Warning`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Safe,
    Warning,
    Danger,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Safe => "safe",
            Status::Warning => "warning",
            Status::Danger => "danger",
            Status::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Status::Other(_))
    }

    /// The verdict used for display: unrecognized values resolve to `Warning`.
    pub fn effective(&self) -> Status {
        match self {
            Status::Other(_) => Status::Warning,
            known => known.clone(),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Other(String::new())
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        match raw {
            "safe" => Status::Safe,
            "warning" => Status::Warning,
            "danger" => Status::Danger,
            other => Status::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `null` is an unrecognized status, not a parse failure
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Status::from(raw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(Status::from("safe"), Status::Safe);
        assert_eq!(Status::from("warning"), Status::Warning);
        assert_eq!(Status::from("danger"), Status::Danger);
    }

    #[test]
    fn test_unknown_value_is_kept_verbatim() {
        let status: Status = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(status, Status::Other("unknown".to_string()));
        assert!(!status.is_recognized());
        assert_eq!(status.effective(), Status::Warning);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"unknown\"");
    }

    #[test]
    fn test_null_is_unrecognized() {
        let status: Status = serde_json::from_str("null").unwrap();
        assert_eq!(status, Status::default());
        assert_eq!(status.effective(), Status::Warning);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(Status::from("SAFE"), Status::Other("SAFE".to_string()));
    }
}
