pub type AnyValue = serde_json::Value;

/// Ordered JSON object, as produced by the document parser.
pub type Mapping = serde_json::Map<String, serde_json::Value>;
