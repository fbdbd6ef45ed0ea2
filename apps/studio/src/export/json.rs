//! JSON export of the current document.

use crate::models::resume::ResumeDocument;

pub const JSON_FILENAME: &str = "resume.json";

/// Two-space indented JSON with the document's wire keys.
pub fn to_pretty_json(document: &ResumeDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::fixtures::jane_doe;

    #[test]
    fn test_pretty_json_reads_back_as_same_document() {
        let doc = jane_doe();
        let text = to_pretty_json(&doc).unwrap();

        assert!(text.starts_with("{\n  \"personalInfo\": {\n    \"name\": \"Jane Doe\""));
        let back: ResumeDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }
}
