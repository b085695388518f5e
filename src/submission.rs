//! Submission documents: loading, field classification, and typed records.
//!
//! A submission is a JSON or YAML mapping describing the reproducibility
//! claims of one paper. Loading classifies every known key into a tagged
//! [`Field`] once, so the validator and organizer never poke at raw maps.

// Submodules
mod field;
mod load;
mod record;

pub use field::{
    Claim, ClaimEntry, Field, Listing, NonReproducibleClaim, NonReproducibleEntry,
};
pub use load::{load_document, DocumentFormat, SubmissionError};
pub use record::{ClaimRecord, ClaimType, NonReproducibleClaimRecord, SubmissionRecord};

use serde_json::{Map, Value};

/// Top-level key names of a submission document.
pub mod keys {
    pub const USERNAME: &str = "username";
    pub const PAPER_TITLE: &str = "paper_title";
    pub const PAPER_PDF: &str = "paper_pdf";
    pub const CODE_URL: &str = "code_url";
    pub const DATA_URL: &str = "data_url";
    pub const IDENTIFIER: &str = "identifier";
    pub const CLAIM_TYPE: &str = "claim_type";
    pub const CLAIMS: &str = "claims";
    pub const NON_REPRODUCIBLE_CLAIMS: &str = "non_reproducible_claims";

    /// Fields every submission must carry unless overridden.
    pub const DEFAULT_REQUIRED: [&str; 6] = [
        USERNAME,
        PAPER_TITLE,
        PAPER_PDF,
        IDENTIFIER,
        CLAIM_TYPE,
        CLAIMS,
    ];
}

/// A parsed submission with every known field classified.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub username: Field,
    pub paper_title: Field,
    pub paper_pdf: Field,
    pub code_url: Field,
    pub data_url: Field,
    pub identifier: Field,
    pub claim_type: Field,
    pub claims: Listing<ClaimEntry>,
    pub non_reproducible_claims: Listing<NonReproducibleEntry>,
    raw: Map<String, Value>,
}

impl Submission {
    /// Classify a parsed document. Fails unless the top-level value is a mapping.
    pub fn from_value(value: Value) -> Result<Self, SubmissionError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            _ => Err(SubmissionError::NotAMapping),
        }
    }

    fn from_map(raw: Map<String, Value>) -> Self {
        let field = |key: &str| Field::classify(raw.get(key));

        Self {
            username: field(keys::USERNAME),
            paper_title: field(keys::PAPER_TITLE),
            paper_pdf: field(keys::PAPER_PDF),
            code_url: field(keys::CODE_URL),
            data_url: field(keys::DATA_URL),
            identifier: field(keys::IDENTIFIER),
            claim_type: field(keys::CLAIM_TYPE),
            claims: Listing::classify(raw.get(keys::CLAIMS), |item| match item {
                Value::Object(entry) => ClaimEntry::Claim(Claim::from_map(entry)),
                _ => ClaimEntry::NotAMapping,
            }),
            non_reproducible_claims: Listing::classify(
                raw.get(keys::NON_REPRODUCIBLE_CLAIMS),
                |item| match item {
                    Value::Object(entry) => {
                        NonReproducibleEntry::Claim(NonReproducibleClaim::from_map(entry))
                    }
                    _ => NonReproducibleEntry::NotAMapping,
                },
            ),
            raw,
        }
    }

    /// Classify any top-level key, including keys outside the known schema.
    pub fn field(&self, key: &str) -> Field {
        Field::classify(self.raw.get(key))
    }

    /// The URL-bearing fields paired with their key names.
    pub fn url_fields(&self) -> [(&'static str, &Field); 3] {
        [
            (keys::PAPER_PDF, &self.paper_pdf),
            (keys::CODE_URL, &self.code_url),
            (keys::DATA_URL, &self.data_url),
        ]
    }

    /// Trimmed username, when present as a non-blank scalar.
    pub fn username_text(&self) -> Option<String> {
        self.username
            .as_text()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_rejects_non_mapping() {
        let result = Submission::from_value(json!(["username", "paper_title"]));
        assert!(matches!(result, Err(SubmissionError::NotAMapping)));

        let result = Submission::from_value(Value::Null);
        assert!(matches!(result, Err(SubmissionError::NotAMapping)));
    }

    #[test]
    fn test_from_value_classifies_fields() {
        let submission = Submission::from_value(json!({
            "username": "alice",
            "paper_title": "",
            "identifier": null,
            "claims": [
                {"claim": "Speedup holds", "instruction": ["run.sh"]},
                "not a mapping"
            ],
            "non_reproducible_claims": "nothing"
        }))
        .unwrap();

        assert_eq!(submission.username, Field::Text("alice".to_string()));
        assert!(submission.paper_title.is_blank());
        assert_eq!(submission.identifier, Field::Null);
        assert_eq!(submission.code_url, Field::Absent);

        let Listing::Items(claims) = &submission.claims else {
            panic!("claims should be a list");
        };
        assert_eq!(claims.len(), 2);
        assert!(matches!(claims[0], ClaimEntry::Claim(_)));
        assert_eq!(claims[1], ClaimEntry::NotAMapping);

        assert!(matches!(
            submission.non_reproducible_claims,
            Listing::NotAList(Field::Text(_))
        ));
    }

    #[test]
    fn test_field_lookup_for_unknown_key() {
        let submission = Submission::from_value(json!({"venue": "ICML"})).unwrap();
        assert_eq!(submission.field("venue"), Field::Text("ICML".to_string()));
        assert_eq!(submission.field("missing"), Field::Absent);
    }

    #[test]
    fn test_username_text_trims_and_drops_blank() {
        let submission = Submission::from_value(json!({"username": "  bob_1  "})).unwrap();
        assert_eq!(submission.username_text().as_deref(), Some("bob_1"));

        let submission = Submission::from_value(json!({"username": "   "})).unwrap();
        assert_eq!(submission.username_text(), None);

        let submission = Submission::from_value(json!({"username": ["a"]})).unwrap();
        assert_eq!(submission.username_text(), None);
    }
}
