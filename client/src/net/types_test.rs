use super::*;
use serde_json::json;

#[test]
fn user_info_reads_camel_case() {
    let user: UserInfo = serde_json::from_value(json!({
        "id": 7,
        "email": "nomad@example.com",
        "nickname": "노마드",
        "profileImageUrl": "https://cdn.example.com/p.png",
        "createdAt": "2025-07-01T00:00:00.000Z",
        "updatedAt": "2025-07-02T00:00:00.000Z"
    }))
    .unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.profile_image_url.as_deref(), Some("https://cdn.example.com/p.png"));
}

#[test]
fn user_info_profile_image_is_optional() {
    let user: UserInfo = serde_json::from_value(json!({
        "id": 1,
        "email": "a@b.c",
        "nickname": "a",
        "createdAt": "x",
        "updatedAt": "y"
    }))
    .unwrap();
    assert_eq!(user.profile_image_url, None);
}

#[test]
fn user_info_writes_camel_case() {
    let user = UserInfo {
        id: 1,
        email: "a@b.c".into(),
        nickname: "a".into(),
        profile_image_url: None,
        created_at: "x".into(),
        updated_at: "y".into(),
    };
    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["createdAt"], "x");
    assert!(value.get("created_at").is_none());
}

#[test]
fn refresh_response_tolerates_missing_expiry() {
    let refreshed: RefreshResponse = serde_json::from_value(json!({})).unwrap();
    assert_eq!(refreshed.access_token_expires_at, None);
}

#[test]
fn error_body_reads_message_and_code() {
    let body: ErrorBody = serde_json::from_value(json!({ "message": "중복", "code": "DUPLICATE" })).unwrap();
    assert_eq!(body.message.as_deref(), Some("중복"));
    assert_eq!(body.code.as_deref(), Some("DUPLICATE"));
}
