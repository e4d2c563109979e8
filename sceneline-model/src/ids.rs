use crate::error::ModelError;
use uuid::Uuid;

/// Stable external catalog identifier used as ground truth for matching.
///
/// Metadata providers hand these out as UUIDs; a release that carries one
/// embedded in its filename bypasses fuzzy scoring entirely.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForeignId(pub Uuid);

impl ForeignId {
    pub fn new() -> Self {
        ForeignId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ForeignId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for ForeignId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for ForeignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ForeignId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(ForeignId)
            .map_err(|e| ModelError::InvalidForeignId(format!("{s}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_uuid() {
        let id: ForeignId = "4f2d4f66-92c4-4b5a-8bd1-7c1a3f0f5a11"
            .parse()
            .expect("valid uuid");
        assert_eq!(id.to_string(), "4f2d4f66-92c4-4b5a-8bd1-7c1a3f0f5a11");
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-a-uuid".parse::<ForeignId>().is_err());
    }
}
