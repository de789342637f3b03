//! Builders for test data.

#![allow(dead_code)]

use visitdesk::config::{AssistantConfig, Config, DatabaseConfig, QueueConfig};
use visitdesk::model::{Catalog, NewVisit, Teacher};

/// Builder for `NewVisit` requests. Defaults to a complete grade-2 request.
pub struct NewVisitBuilder {
    purpose: String,
    grade: String,
    class_num: Option<String>,
    name: String,
    teacher: String,
}

impl NewVisitBuilder {
    pub fn new() -> Self {
        Self {
            purpose: "질문 있어요".to_string(),
            grade: "2".to_string(),
            class_num: None,
            name: "김학생".to_string(),
            teacher: "조민정 선생님".to_string(),
        }
    }

    pub fn purpose(mut self, purpose: &str) -> Self {
        self.purpose = purpose.to_string();
        self
    }

    pub fn grade(mut self, grade: &str) -> Self {
        self.grade = grade.to_string();
        self
    }

    pub fn class_num(mut self, class_num: &str) -> Self {
        self.class_num = Some(class_num.to_string());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn teacher(mut self, teacher: &str) -> Self {
        self.teacher = teacher.to_string();
        self
    }

    pub fn build(self) -> NewVisit {
        NewVisit {
            purpose: self.purpose,
            grade: self.grade,
            class_num: self.class_num,
            name: self.name,
            teacher: self.teacher,
        }
    }
}

impl Default for NewVisitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Config` instances. Defaults to an in-memory store with the
/// assistant disabled.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config {
                database: DatabaseConfig {
                    path: None,
                    in_memory: true,
                },
                assistant: AssistantConfig {
                    enabled: false,
                    ..AssistantConfig::default()
                },
                ..Config::default()
            },
        }
    }

    pub fn database_path(mut self, path: &str) -> Self {
        self.config.database = DatabaseConfig {
            path: Some(path.to_string()),
            in_memory: false,
        };
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.queue = QueueConfig {
            event_capacity: capacity,
        };
        self
    }

    pub fn teacher(mut self, id: &str, name: &str, subject: &str) -> Self {
        self.config.catalog.teachers.push(Teacher {
            id: id.to_string(),
            name: name.to_string(),
            subject: subject.to_string(),
        });
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.config.catalog = catalog;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.config).unwrap()
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
