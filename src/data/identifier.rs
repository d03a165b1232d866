use std::fmt;

use crate::error::{IsochoreError, Result};

/// A decomposed filename stem.
///
/// Grammar: `Sample '_' Assemblage '-' Inclusion`, where every token is
/// non-empty and contains neither `_` nor `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InclusionId {
    pub sample: String,
    pub assemblage: String,
    pub inclusion: String,
}

impl InclusionId {
    pub fn parse(identifier: &str) -> Result<Self> {
        let (sample, rest) = identifier
            .split_once('_')
            .ok_or_else(|| IsochoreError::identifier(identifier, "missing '_' after the sample"))?;
        let (assemblage, inclusion) = rest.split_once('-').ok_or_else(|| {
            IsochoreError::identifier(identifier, "missing '-' between assemblage and inclusion")
        })?;

        for (name, token) in [
            ("sample", sample),
            ("assemblage", assemblage),
            ("inclusion", inclusion),
        ] {
            if token.is_empty() {
                return Err(IsochoreError::identifier(identifier, format!("empty {name}")));
            }
            if token.contains(['_', '-']) {
                return Err(IsochoreError::identifier(
                    identifier,
                    format!("{name} '{token}' contains a separator"),
                ));
            }
        }

        Ok(InclusionId {
            sample: sample.to_string(),
            assemblage: assemblage.to_string(),
            inclusion: inclusion.to_string(),
        })
    }

    /// The full `Sample_Assemblage-Inclusion` code.
    pub fn code(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InclusionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}-{}", self.sample, self.assemblage, self.inclusion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_three_tokens() {
        let id = InclusionId::parse("BLP1_A-12").unwrap();
        assert_eq!(id.sample, "BLP1");
        assert_eq!(id.assemblage, "A");
        assert_eq!(id.inclusion, "12");
        assert_eq!(id.code(), "BLP1_A-12");
    }

    #[test]
    fn missing_separators_are_rejected() {
        for bad in ["BLP1A-12", "BLP1_A12", "plain", ""] {
            let err = InclusionId::parse(bad).unwrap_err();
            assert!(matches!(err, IsochoreError::Identifier { .. }), "{bad}");
        }
    }

    #[test]
    fn empty_tokens_are_rejected() {
        for bad in ["_A-1", "S_-1", "S_A-"] {
            assert!(InclusionId::parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn extra_separators_are_rejected() {
        for bad in ["S_A-1-2", "S_A_B-1", "S_A-1_2"] {
            let err = InclusionId::parse(bad).unwrap_err();
            assert!(err.to_string().contains("separator"), "{bad}: {err}");
        }
    }
}
