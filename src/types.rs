use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// The six counters carried by a Clover `<metrics>` element.
///
/// Used both for a single record read from the report and for the running
/// totals built from several of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricCounts {
    pub conditionals: u64,
    pub coveredconditionals: u64,
    pub statements: u64,
    pub coveredstatements: u64,
    pub methods: u64,
    pub coveredmethods: u64,
}

impl MetricCounts {
    /// Adds `other` into `self`; counters saturate at `u64::MAX`.
    pub fn merge(&mut self, other: &MetricCounts) {
        self.conditionals = self.conditionals.saturating_add(other.conditionals);
        self.coveredconditionals = self
            .coveredconditionals
            .saturating_add(other.coveredconditionals);
        self.statements = self.statements.saturating_add(other.statements);
        self.coveredstatements = self
            .coveredstatements
            .saturating_add(other.coveredstatements);
        self.methods = self.methods.saturating_add(other.methods);
        self.coveredmethods = self.coveredmethods.saturating_add(other.coveredmethods);
    }

    /// Folds a sequence of records into their totals.
    pub fn sum<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a MetricCounts>,
    {
        let mut totals = MetricCounts::default();
        for record in records {
            totals.merge(record);
        }
        totals
    }
}

/// Which counters feed the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageMode {
    /// Statements, methods and conditionals together.
    Blended,
    /// Statements only.
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    BelowThreshold,
}

impl Verdict {
    pub fn passed(self) -> bool {
        self == Verdict::Passed
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub percentage: f64,
    pub threshold: f64,
    #[serde(rename = "passed", serialize_with = "serialize_passed")]
    pub verdict: Verdict,
    pub mode: CoverageMode,
    pub totals: MetricCounts,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub files: IndexMap<String, MetricCounts>,
}

fn serialize_passed<S: Serializer>(verdict: &Verdict, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_bool(verdict.passed())
}
