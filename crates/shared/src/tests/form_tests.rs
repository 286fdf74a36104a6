use super::*;
use crate::domain::PostId;

fn filled(user_id: &str, title: &str, body: &str) -> PostForm {
    PostForm {
        user_id: user_id.to_string(),
        title: title.to_string(),
        body: body.to_string(),
    }
}

#[test]
fn empty_form_reports_every_required_field() {
    let errors = PostForm::default().errors();
    assert_eq!(
        errors,
        vec![
            FieldError::Required(PostField::UserId),
            FieldError::Required(PostField::Title),
            FieldError::Required(PostField::Body),
        ]
    );
}

#[test]
fn user_id_must_be_digits_only() {
    for raw in ["12a", "-4", "1.5", "3 4"] {
        let errors = filled(raw, "t", "b").errors();
        assert_eq!(errors, vec![FieldError::NotNumeric(PostField::UserId)], "{raw}");
    }
}

#[test]
fn oversized_user_id_is_out_of_range() {
    let errors = filled("99999999999999999999", "t", "b").errors();
    assert_eq!(errors, vec![FieldError::OutOfRange(PostField::UserId)]);
}

#[test]
fn whitespace_only_title_counts_as_missing() {
    let errors = filled("1", "   ", "b").errors();
    assert_eq!(errors, vec![FieldError::Required(PostField::Title)]);
}

#[test]
fn valid_form_produces_draft() {
    let draft = filled("10", "hello", "world").to_draft().expect("valid");
    assert_eq!(draft.user_id, UserId(10));
    assert_eq!(draft.title, "hello");
    assert_eq!(draft.body, "world");
}

#[test]
fn patch_only_carries_changed_fields() {
    let original = Post {
        id: Some(PostId(1)),
        user_id: UserId(2),
        title: "T".to_string(),
        body: "B".to_string(),
    };
    let mut form = PostForm::from_post(&original);
    assert!(form.to_patch(&original).expect("valid").is_empty());

    form.set(PostField::Title, "T2");
    let patch = form.to_patch(&original).expect("valid");
    assert_eq!(
        patch,
        PostPatch {
            title: Some("T2".to_string()),
            ..PostPatch::default()
        }
    );
}

#[test]
fn invalid_edit_is_rejected() {
    let original = Post {
        id: Some(PostId(1)),
        user_id: UserId(2),
        title: "T".to_string(),
        body: "B".to_string(),
    };
    let mut form = PostForm::from_post(&original);
    form.set(PostField::Body, "");
    let errors = form.to_patch(&original).expect_err("body missing");
    assert_eq!(errors[0].field(), PostField::Body);
}
