use kidcard_core::{validate, ProfileForm};

fn form(age: &str, height: &str, weight: &str) -> ProfileForm {
    ProfileForm {
        full_name: "Mia Park".to_string(),
        age: age.to_string(),
        height: height.to_string(),
        weight: weight.to_string(),
        gender: String::new(),
        medical_notes: String::new(),
    }
}

#[test]
fn values_at_every_bound_validate() {
    for (age, height, weight) in [
        ("0", "30", "2"),
        ("18", "250", "2"),
        ("9", "140", "200"),
        ("4.5", "102.5", "16.5"),
    ] {
        let draft = validate(&form(age, height, weight)).unwrap();
        assert_eq!(draft.full_name, "Mia Park");
    }
}

#[test]
fn one_unit_outside_each_bound_fails_naming_the_field() {
    let errors = validate(&form("-1", "140", "20")).unwrap_err();
    assert_eq!(errors.message("age"), Some("must be between 0 and 18"));

    let errors = validate(&form("19", "140", "20")).unwrap_err();
    assert_eq!(errors.message("age"), Some("must be between 0 and 18"));

    let errors = validate(&form("9", "29", "20")).unwrap_err();
    assert_eq!(errors.message("height"), Some("must be between 30 and 250"));

    let errors = validate(&form("9", "251", "20")).unwrap_err();
    assert_eq!(errors.message("height"), Some("must be between 30 and 250"));

    let errors = validate(&form("9", "140", "1")).unwrap_err();
    assert_eq!(errors.message("weight"), Some("must be at least 2"));
}

#[test]
fn numeric_looking_text_coerces_before_range_checks() {
    let draft = validate(&form("7", "120", "25")).unwrap();
    assert_eq!(draft.age, 7.0);
    assert_eq!(draft.height, 120.0);
    assert_eq!(draft.weight, 25.0);
}

#[test]
fn non_numeric_text_fails_that_field_only() {
    let errors = validate(&form("five", "120", "25")).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.message("age"), Some("must be a number"));
}

#[test]
fn short_name_fails_with_exact_message() {
    let mut input = form("5", "110", "18");
    input.full_name = "A".to_string();
    let errors = validate(&input).unwrap_err();
    assert_eq!(
        errors.message("fullName"),
        Some("must be at least 2 characters")
    );
}

#[test]
fn optional_fields_may_be_absent_or_filled() {
    let mut input = form("5", "110", "18");
    input.gender = "girl".to_string();
    input.medical_notes = "Peanut allergy".to_string();
    let draft = validate(&input).unwrap();
    assert_eq!(draft.gender.as_deref(), Some("girl"));
    assert_eq!(draft.medical_notes.as_deref(), Some("Peanut allergy"));

    let draft = validate(&form("5", "110", "18")).unwrap();
    assert_eq!(draft.gender, None);
    assert_eq!(draft.medical_notes, None);
}

#[test]
fn medical_notes_length_is_enforced_only_when_present() {
    let mut input = form("5", "110", "18");
    input.medical_notes = "n".repeat(300);
    assert!(validate(&input).is_ok());

    input.medical_notes = "n".repeat(301);
    let errors = validate(&input).unwrap_err();
    assert_eq!(
        errors.message("medicalNotes"),
        Some("must be 300 characters or fewer")
    );
}

#[test]
fn errors_iterate_in_stable_field_order() {
    let input = ProfileForm {
        full_name: "A".to_string(),
        age: "x".to_string(),
        height: "x".to_string(),
        weight: "x".to_string(),
        gender: String::new(),
        medical_notes: String::new(),
    };
    let errors = validate(&input).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
    assert_eq!(fields, vec!["age", "fullName", "height", "weight"]);
}
