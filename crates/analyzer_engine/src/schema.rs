use analyzer_core::AnalysisKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    Boolean,
    Text,
    TextList,
    /// Inclusive bounds.
    Number { min: f64, max: f64 },
}

impl FieldType {
    pub fn expected(self) -> &'static str {
        match self {
            FieldType::Boolean => "a boolean",
            FieldType::Text => "a string",
            FieldType::TextList => "an array of strings",
            FieldType::Number { .. } => "a number",
        }
    }
}

/// One required field of a result object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub description: &'static str,
}

const fn field(
    name: &'static str,
    field_type: FieldType,
    description: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        field_type,
        description,
    }
}

const CONFLICT: &[FieldSpec] = &[
    field(
        "conflictPresence",
        FieldType::Boolean,
        "true if the page reports or discusses an active conflict",
    ),
    field(
        "keyPoints",
        FieldType::TextList,
        "up to 3 key points about the conflict; empty if none",
    ),
    field(
        "credibility",
        FieldType::Number { min: 0.0, max: 10.0 },
        "credibility of the source",
    ),
    field("summary", FieldType::Text, "one-paragraph summary"),
];

const FACT_CHECK: &[FieldSpec] = &[
    field(
        "credibilityScore",
        FieldType::Number {
            min: 0.0,
            max: 100.0,
        },
        "overall factual credibility of the page",
    ),
    field(
        "claims",
        FieldType::TextList,
        "the main factual claims made by the page",
    ),
    field(
        "sources",
        FieldType::TextList,
        "domains of sources that support or refute the claims",
    ),
    field("analysis", FieldType::Text, "detailed summary of the assessment"),
];

const PEACE_IMPACT: &[FieldSpec] = &[
    field(
        "peaceImpactScore",
        FieldType::Number {
            min: 0.0,
            max: 100.0,
        },
        "how much the content contributes to peace; higher is more constructive",
    ),
    field(
        "escalationRisk",
        FieldType::Number {
            min: 0.0,
            max: 100.0,
        },
        "risk that the content escalates tension",
    ),
    field(
        "constructiveElements",
        FieldType::TextList,
        "passages or framings that support dialogue",
    ),
    field(
        "divisiveElements",
        FieldType::TextList,
        "passages or framings that inflame or divide",
    ),
    field("summary", FieldType::Text, "one-paragraph summary"),
];

/// Required fields of the result object for `kind`.
pub fn schema_for(kind: AnalysisKind) -> &'static [FieldSpec] {
    match kind {
        AnalysisKind::Conflict => CONFLICT,
        AnalysisKind::FactCheck => FACT_CHECK,
        AnalysisKind::PeaceImpact => PEACE_IMPACT,
    }
}
