//! Schema registry: the expected shape of every persisted collection.
//!
//! The registry is pure data. Field order is authoritative: downstream
//! code addresses tabular columns positionally, so two layouts with the
//! same fields in a different order are a mismatch, not a match.

use crate::error::{BankError, BankResult};

/// How a collection is encoded on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    /// Ordered rows under a fixed header row (CSV).
    Tabular,
    /// A single key→value object (JSON).
    Structured,
}

/// The registered shape of one persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSpec {
    /// Logical collection name (e.g. `"skills"`).
    pub name: &'static str,
    /// File name under the stored-info directory.
    pub file_name: &'static str,
    /// On-disk encoding.
    pub kind: CollectionKind,
    /// Ordered field list (tabular header / structured key list).
    pub fields: &'static [&'static str],
}

impl CollectionSpec {
    /// Returns the field list as owned strings, preserving order.
    #[must_use]
    pub fn field_list(&self) -> Vec<String> {
        self.fields.iter().map(|f| (*f).to_string()).collect()
    }

    /// Strict ordered comparison of an on-disk layout against this spec.
    ///
    /// Any reordering, addition, or removal of fields is a mismatch.
    /// This applies to structured key lists too, not just tabular
    /// headers: key order in the stored object is significant.
    #[must_use]
    pub fn matches_layout(&self, found: &[String]) -> bool {
        self.fields.len() == found.len()
            && self.fields.iter().zip(found).all(|(expected, field)| *expected == field)
    }
}

const COURSEWORK_FIELDS: &[&str] = &[
    "course_id",
    "course_name",
    "institution",
    "year",
    "semester",
    "grade",
    "description",
];

const PROJECTS_FIELDS: &[&str] = &[
    "project_name",
    "description",
    "start_month",
    "start_year",
    "end_month",
    "end_year",
    "link1",
    "link2",
];

const SKILLS_FIELDS: &[&str] = &["skill_name", "level"];

const WORK_EXPERIENCE_FIELDS: &[&str] = &[
    "company",
    "role",
    "start_month",
    "start_year",
    "end_month",
    "end_year",
    "long_short",
    "description_short",
    "bullet1_long",
    "bullet2_long",
    "bullet3_long",
];

const JOBS_FIELDS: &[&str] = &[
    "id",
    "site",
    "job_url",
    "job_url_direct",
    "title",
    "company",
    "location",
    "date_posted",
    "job_type",
    "salary_source",
    "interval",
    "min_amount",
    "max_amount",
    "currency",
    "is_remote",
    "job_level",
    "job_function",
    "listing_type",
    "emails",
    "description",
    "company_industry",
    "company_url",
    "company_logo",
    "company_url_direct",
    "company_addresses",
    "company_num_employees",
    "company_revenue",
    "company_description",
    "skills",
    "experience_range",
    "company_rating",
    "company_reviews_count",
    "vacancy_count",
    "work_from_home_type",
];

const USER_PROFILE_FIELDS: &[&str] = &[
    "full_name",
    "email",
    "phone_number",
    "linkedin_url",
    "github_url",
    "portfolio_url",
    "address",
];

/// Every collection the store manages, in integrity-check order.
const SPECS: &[CollectionSpec] = &[
    CollectionSpec {
        name: "jobs",
        file_name: "job_bank.csv",
        kind: CollectionKind::Tabular,
        fields: JOBS_FIELDS,
    },
    CollectionSpec {
        name: "coursework",
        file_name: "coursework_bank.csv",
        kind: CollectionKind::Tabular,
        fields: COURSEWORK_FIELDS,
    },
    CollectionSpec {
        name: "projects",
        file_name: "projects_bank.csv",
        kind: CollectionKind::Tabular,
        fields: PROJECTS_FIELDS,
    },
    CollectionSpec {
        name: "skills",
        file_name: "skills_bank.csv",
        kind: CollectionKind::Tabular,
        fields: SKILLS_FIELDS,
    },
    CollectionSpec {
        name: "work_experience",
        file_name: "work_experience_bank.csv",
        kind: CollectionKind::Tabular,
        fields: WORK_EXPERIENCE_FIELDS,
    },
    CollectionSpec {
        name: "user_profile",
        file_name: "user_info.json",
        kind: CollectionKind::Structured,
        fields: USER_PROFILE_FIELDS,
    },
];

/// Static map from collection name to its expected layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRegistry {
    _private: (),
}

impl SchemaRegistry {
    /// Creates the built-in registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the spec for a collection name.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::UnknownCollection`] if the name is not
    /// registered.
    pub fn spec_for(&self, name: &str) -> BankResult<&'static CollectionSpec> {
        SPECS
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| BankError::unknown_collection(name))
    }

    /// Looks up the spec by file name (e.g. `"skills_bank.csv"`).
    pub fn spec_for_file(&self, file_name: &str) -> BankResult<&'static CollectionSpec> {
        SPECS
            .iter()
            .find(|s| s.file_name == file_name)
            .ok_or_else(|| BankError::unknown_collection(file_name))
    }

    /// Iterates all registered specs in integrity-check order.
    pub fn iter(&self) -> impl Iterator<Item = &'static CollectionSpec> {
        SPECS.iter()
    }

    /// Number of registered collections.
    #[must_use]
    pub fn len(&self) -> usize {
        SPECS.len()
    }

    /// Returns true if no collections are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        SPECS.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let registry = SchemaRegistry::new();

        let spec = registry.spec_for("skills").unwrap();
        assert_eq!(spec.file_name, "skills_bank.csv");
        assert_eq!(spec.kind, CollectionKind::Tabular);
        assert_eq!(spec.fields, &["skill_name", "level"]);
    }

    #[test]
    fn lookup_by_file_name() {
        let registry = SchemaRegistry::new();

        let spec = registry.spec_for_file("user_info.json").unwrap();
        assert_eq!(spec.name, "user_profile");
        assert_eq!(spec.kind, CollectionKind::Structured);
    }

    #[test]
    fn unknown_collection_rejected() {
        let registry = SchemaRegistry::new();

        let result = registry.spec_for("nonexistent");
        assert!(matches!(
            result,
            Err(BankError::UnknownCollection { .. })
        ));
    }

    #[test]
    fn all_collections_registered() {
        let registry = SchemaRegistry::new();

        let names: Vec<_> = registry.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                "jobs",
                "coursework",
                "projects",
                "skills",
                "work_experience",
                "user_profile"
            ]
        );
        assert_eq!(registry.len(), 6);
        assert!(!registry.is_empty());
    }

    #[test]
    fn field_order_is_preserved() {
        let registry = SchemaRegistry::new();

        let spec = registry.spec_for("work_experience").unwrap();
        assert_eq!(spec.fields[0], "company");
        assert_eq!(spec.fields[6], "long_short");
        assert_eq!(spec.field_list().len(), 11);
    }

    #[test]
    fn jobs_layout_has_all_scraped_columns() {
        let registry = SchemaRegistry::new();

        let spec = registry.spec_for("jobs").unwrap();
        assert_eq!(spec.fields.len(), 34);
        assert_eq!(spec.fields[0], "id");
        assert_eq!(*spec.fields.last().unwrap(), "work_from_home_type");
    }

    #[test]
    fn identical_layout_matches() {
        let registry = SchemaRegistry::new();

        let spec = registry.spec_for("user_profile").unwrap();
        assert!(spec.matches_layout(&spec.field_list()));
    }

    mod layout_comparison {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Any permutation of the header that is not the exact
            // registered order must be flagged as a mismatch.
            #[test]
            fn reordered_layout_matches_only_if_identical(
                shuffled in Just(
                    WORK_EXPERIENCE_FIELDS
                        .iter()
                        .map(|f| f.to_string())
                        .collect::<Vec<_>>(),
                )
                .prop_shuffle(),
            ) {
                let registry = SchemaRegistry::new();
                let spec = registry.spec_for("work_experience").unwrap();
                let identical = shuffled == spec.field_list();
                prop_assert_eq!(spec.matches_layout(&shuffled), identical);
            }

            // Dropping trailing columns is always a mismatch.
            #[test]
            fn truncated_layout_never_matches(keep in 0usize..34) {
                let registry = SchemaRegistry::new();
                let spec = registry.spec_for("jobs").unwrap();
                let truncated: Vec<String> =
                    spec.field_list().into_iter().take(keep).collect();
                prop_assert!(!spec.matches_layout(&truncated));
            }
        }
    }
}
