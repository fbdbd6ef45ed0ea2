//! The structured resume document produced by one generation cycle.
//!
//! Wire keys follow the response schema exactly (`personalInfo`, `Technical`, ...),
//! so a document serializes back into the same JSON the generation service produced.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    /// Target or current job title.
    pub title: String,
    pub phone: String,
    pub email: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    /// Free-form, e.g. "Jan 2020 - Present". Never parsed.
    pub dates: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub dates: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Education {
    /// Details worth showing: present and not blank.
    pub fn visible_details(&self) -> Option<&str> {
        self.details
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// The three fixed skill categories. Order here is rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    Technical,
    Soft,
    Certifications,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 3] = [
        SkillCategory::Technical,
        SkillCategory::Soft,
        SkillCategory::Certifications,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SkillCategory::Technical => "Technical",
            SkillCategory::Soft => "Soft",
            SkillCategory::Certifications => "Certifications",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(rename = "Technical")]
    pub technical: Vec<String>,
    #[serde(rename = "Soft")]
    pub soft: Vec<String>,
    #[serde(rename = "Certifications")]
    pub certifications: Vec<String>,
}

impl Skills {
    pub fn get(&self, category: SkillCategory) -> &[String] {
        match category {
            SkillCategory::Technical => &self.technical,
            SkillCategory::Soft => &self.soft,
            SkillCategory::Certifications => &self.certifications,
        }
    }

    /// Categories in fixed order, each with its (possibly empty) items.
    pub fn categories(&self) -> impl Iterator<Item = (SkillCategory, &[String])> {
        SkillCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// The complete contract the generation client must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Skills,
}


#[cfg(test)]
mod tests {
    use super::fixtures::jane_doe;
    use super::*;

    #[test]
    fn test_document_uses_schema_wire_keys() {
        let value = serde_json::to_value(jane_doe()).unwrap();
        assert!(value.get("personalInfo").is_some());
        assert!(value["skills"].get("Technical").is_some());
        assert!(value["skills"].get("Certifications").is_some());
        assert!(value.get("personal_info").is_none());
    }

    #[test]
    fn test_missing_skills_fails_deserialization() {
        let mut value = serde_json::to_value(jane_doe()).unwrap();
        value.as_object_mut().unwrap().remove("skills");
        let result: Result<ResumeDocument, _> = serde_json::from_value(value);
        assert!(result.is_err(), "skills is mandatory");
    }

    #[test]
    fn test_education_details_optional() {
        let json = r#"{"institution":"MIT","degree":"B.S.","dates":"2010 - 2014"}"#;
        let edu: Education = serde_json::from_str(json).unwrap();
        assert!(edu.details.is_none());
        assert!(edu.visible_details().is_none());
    }

    #[test]
    fn test_blank_details_not_visible() {
        let edu = Education {
            institution: "MIT".to_string(),
            degree: "B.S.".to_string(),
            dates: "2010 - 2014".to_string(),
            details: Some("   ".to_string()),
        };
        assert!(edu.visible_details().is_none());
    }

    #[test]
    fn test_skill_categories_keep_fixed_order_when_empty() {
        let skills = Skills::default();
        let order: Vec<SkillCategory> = skills.categories().map(|(c, _)| c).collect();
        assert_eq!(order, SkillCategory::ALL.to_vec());
        assert!(skills.categories().all(|(_, items)| items.is_empty()));
    }
}
