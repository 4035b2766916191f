//! # 문자열 유틸리티
//!
//! 문자열 처리와 관련된 공통 유틸리티 함수들입니다.

use serde::Deserialize;
use validator::ValidationErrors;

use crate::errors::AppError;

/// 필수 문자열 검증 및 정리
///
/// 앞뒤 공백을 제거한 뒤 비어 있으면 `ValidationError`를 반환합니다.
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field_name)));
    }
    Ok(trimmed.to_string())
}

/// 선택적 문자열 정리 (빈 문자열은 `None`)
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 이메일 주소 정규화
///
/// 저장소의 유니크 인덱스와 조회 키가 항상 같은 형태가 되도록
/// 공백을 제거하고 소문자로 변환합니다.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 로그 출력용 이메일 마스킹 (`alice@example.com` → `a***@example.com`)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

/// `validator` 에러를 사람이 읽을 수 있는 한 줄 메시지로 변환
///
/// 필드 이름 순으로 정렬하여 응답이 항상 같은 순서를 갖도록 합니다.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();

    if messages.is_empty() {
        "Invalid request".to_string()
    } else {
        messages.join(", ")
    }
}

/// serde 역직렬화 시 빈 문자열을 `None`으로 처리
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(email(message = "Please enter a valid email"))]
        email: String,
        #[validate(length(min = 6))]
        password: String,
    }

    #[test]
    fn test_validate_required_string() {
        assert_eq!(validate_required_string("  World  ", "name").unwrap(), "World");
        assert!(validate_required_string("", "name").is_err());
        assert!(validate_required_string("\t\n", "name").is_err());
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn test_format_validation_errors() {
        let probe = Probe {
            email: "nope".to_string(),
            password: "123".to_string(),
        };
        let errors = probe.validate().unwrap_err();

        assert_eq!(
            format_validation_errors(&errors),
            "Please enter a valid email, password is invalid"
        );
    }
}
