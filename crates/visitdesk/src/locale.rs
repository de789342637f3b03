//! Korean display strings, kept apart from the domain types.

use crate::model::{Visit, VisitStatus};

pub const STATUS_UPDATE_FAILED: &str = "상태 업데이트 중 오류가 발생했습니다.";
pub const REGISTRATION_FAILED: &str = "접수 중 오류가 발생했습니다.";
pub const SUBMISSION_RETRY: &str = "접수에 실패했습니다. 다시 시도해주세요.";
pub const LOAD_FAILED: &str = "데이터를 불러오는 데 실패했습니다.";
pub const STORE_CONFIG_FAILED: &str = "데이터베이스 연결 실패. 설정을 확인해주세요.";
pub const STORE_CONNECTION_FAILED: &str = "데이터베이스 연결에 실패했습니다.";
pub const INVALID_ACCESS: &str = "잘못된 접근입니다.";

pub const ASSISTANT_NOT_CONFIGURED: &str = "AI 도우미를 설정해주세요. (API 키가 없습니다)";
pub const ASSISTANT_APOLOGY: &str =
    "죄송해요, 지금은 답변을 드릴 수 없어요. 잠시 후 다시 시도해주세요.";
pub const ASSISTANT_GREETING: &str =
    "안녕하세요! 학교 생활에 대해 궁금한 점을 물어보세요. (예: 오늘 급식 메뉴 알려줘)";

/// Short label for a status, as shown on queue cards.
pub fn status_label(status: VisitStatus) -> &'static str {
    match status {
        VisitStatus::Pending => "대기중",
        VisitStatus::Approved => "승인됨",
        VisitStatus::Serving => "처리중",
        VisitStatus::Done => "완료됨",
    }
}

/// "3학년 4반 홍길동" / "2학년 홍길동".
pub fn student_label(visit: &Visit) -> String {
    match &visit.class_num {
        Some(class_num) => format!("{}학년 {}반 {}", visit.grade, class_num, visit.name),
        None => format!("{}학년 {}", visit.grade, visit.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VisitId;

    fn visit(class_num: Option<&str>) -> Visit {
        Visit {
            id: VisitId::new("v1"),
            grade: "3".to_string(),
            class_num: class_num.map(str::to_string),
            name: "홍길동".to_string(),
            purpose: "기타".to_string(),
            teacher: "조민정 선생님".to_string(),
            timestamp: 0,
            status: VisitStatus::Pending,
        }
    }

    #[test]
    fn test_student_label() {
        assert_eq!(student_label(&visit(Some("4"))), "3학년 4반 홍길동");
        assert_eq!(student_label(&visit(None)), "3학년 홍길동");
    }

    #[test]
    fn test_status_labels_are_distinct() {
        let labels: std::collections::HashSet<_> =
            VisitStatus::ALL.iter().map(|s| status_label(*s)).collect();
        assert_eq!(labels.len(), 4);
    }
}
