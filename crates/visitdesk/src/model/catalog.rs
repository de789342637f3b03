//! Choices offered by the kiosk: purposes, staff roster, grades and classes.

use serde::{Deserialize, Serialize};

/// The grade whose students must also pick a class number.
pub const CLASS_REQUIRED_GRADE: &str = "3";

const DEFAULT_PURPOSES: &[&str] = &[
    "과제 제출",
    "질문 있어요",
    "상담 요청",
    "서류 발급",
    "분실물 문의",
    "기타",
];

const DEFAULT_TEACHERS: &[(&str, &str, &str)] = &[
    ("t1", "유은희 선생님", "국어"),
    ("t2", "최여경 선생님", "음악"),
    ("t3", "조민정 선생님", "사회"),
    ("t4", "김선옥 선생님", "역사"),
    ("t5", "이지수학 선생님", "수학"),
    ("t6", "권택형 선생님", "기가"),
    ("t7", "윤영중 선생님", "정보"),
];

/// A staff member students can ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default = "default_purposes")]
    pub purposes: Vec<String>,
    #[serde(default = "default_teachers")]
    pub teachers: Vec<Teacher>,
    #[serde(default = "default_grades")]
    pub grades: Vec<String>,
    #[serde(default = "default_class_numbers")]
    pub class_numbers: Vec<String>,
    #[serde(default = "default_class_required_grade")]
    pub class_required_grade: String,
}

impl Catalog {
    pub fn teacher_by_name(&self, name: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.name == name)
    }

    /// Whether a student in `grade` must also give a class number.
    pub fn requires_class(&self, grade: &str) -> bool {
        grade == self.class_required_grade
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            purposes: default_purposes(),
            teachers: default_teachers(),
            grades: default_grades(),
            class_numbers: default_class_numbers(),
            class_required_grade: default_class_required_grade(),
        }
    }
}

fn default_purposes() -> Vec<String> {
    DEFAULT_PURPOSES.iter().map(|p| p.to_string()).collect()
}

fn default_teachers() -> Vec<Teacher> {
    DEFAULT_TEACHERS
        .iter()
        .map(|(id, name, subject)| Teacher {
            id: id.to_string(),
            name: name.to_string(),
            subject: subject.to_string(),
        })
        .collect()
}

fn default_grades() -> Vec<String> {
    (1..=3).map(|g| g.to_string()).collect()
}

fn default_class_numbers() -> Vec<String> {
    (1..=6).map(|c| c.to_string()).collect()
}

fn default_class_required_grade() -> String {
    CLASS_REQUIRED_GRADE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.purposes.len(), 6);
        assert_eq!(catalog.teachers.len(), 7);
        assert_eq!(catalog.grades, vec!["1", "2", "3"]);
        assert_eq!(catalog.class_numbers.len(), 6);
        assert!(catalog.requires_class("3"));
        assert!(!catalog.requires_class("2"));
    }

    #[test]
    fn test_teacher_lookup() {
        let catalog = Catalog::default();
        let teacher = catalog.teacher_by_name("윤영중 선생님").unwrap();
        assert_eq!(teacher.subject, "정보");
        assert!(catalog.teacher_by_name("없는 선생님").is_none());
    }

    #[test]
    fn test_partial_catalog_fills_defaults() {
        let catalog: Catalog = serde_json::from_str(r#"{"purposes": ["상담"]}"#).unwrap();
        assert_eq!(catalog.purposes, vec!["상담"]);
        assert_eq!(catalog.teachers.len(), 7);
        assert_eq!(catalog.class_required_grade, "3");
    }
}
