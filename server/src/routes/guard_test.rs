use super::*;

#[test]
fn protected_paths_are_recognized() {
    for path in [
        "/activity/new",
        "/activity/new/",
        "/activity/123/edit",
        "/mypage",
        "/mypage/",
        "/mypage/reservations",
        "/mypage/activities/4/edit",
    ] {
        assert!(is_protected(path), "{path} should be protected");
    }
}

#[test]
fn public_paths_are_not_protected() {
    for path in [
        "/",
        "/login",
        "/signup",
        "/activity/123",
        "/activity/123/reviews",
        "/activity/new/extra",
        "/activities/new",
        "/mypages",
        "/api/my-activities",
    ] {
        assert!(!is_protected(path), "{path} should be public");
    }
}

#[test]
fn login_redirect_encodes_target() {
    assert_eq!(login_redirect("/mypage"), "/login?redirect=%2Fmypage");
    assert_eq!(
        login_redirect("/activity/7/edit?tab=schedule&x=1"),
        "/login?redirect=%2Factivity%2F7%2Fedit%3Ftab%3Dschedule%26x%3D1"
    );
}
