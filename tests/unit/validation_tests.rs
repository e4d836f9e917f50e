// ===============================
// tests/unit/validation_tests.rs
// ===============================
//! Field grammar over whole records
use conch_backend::validation::{
    validate, validate_account, validate_invoice, validate_patch, Field, ValidationReport,
    ACCOUNT_FIELDS,
};
use conch_common::{AccountRequest, InvoiceRequest};

fn account() -> AccountRequest {
    AccountRequest {
        fname: "Ann".into(),
        lname: "Lee".into(),
        address: "12 Oak Rd".into(),
        username: "annlee01".into(),
        password: "Passw0rd".into(),
    }
}

#[test]
fn test_valid_account_has_no_violations() {
    assert!(validate_account(&account()).is_empty());
}

#[test]
fn test_weak_password_yields_exactly_three_violations() {
    let mut weak = account();
    weak.password = "pass".into();
    let report = validate_account(&weak);
    assert_eq!(
        report.messages(),
        vec![
            "Error: Password is too short, expected 8-16 chars",
            "Error: Password must contain one or more capital letters",
            "Error: Password must contain one or more digits",
        ]
    );
}

#[test]
fn test_password_bounds() {
    for (password, ok) in [
        ("Passw0r", false),
        ("Passw0rd", true),
        ("Passw0rdPassw0rd", true),
        ("Passw0rdPassw0rd1", false),
    ] {
        let mut report = ValidationReport::new();
        validate(Field::Password, password, &mut report);
        assert_eq!(!report.has_failed(), ok, "{password}: {:?}", report.messages());
    }
}

#[test]
fn test_violations_follow_field_order() {
    let bad = AccountRequest {
        fname: "Ann1".into(),
        lname: "Lee!".into(),
        address: "12 Oak Rd".into(),
        username: "ann".into(),
        password: "Passw0rd".into(),
    };
    assert_eq!(
        validate_account(&bad).messages(),
        vec![
            "Error: Fname can't have any digits",
            "Error: Lname can't have any punctuation",
            "Error: Username is too short, expected 8-16 chars",
        ]
    );
    assert_eq!(ACCOUNT_FIELDS[0], Field::Fname);
}

#[test]
fn test_patch_blank_reproduces_original() {
    let mut report = ValidationReport::new();
    for field in [Field::Product, Field::Category, Field::Username, Field::Password] {
        assert_eq!(validate_patch(field, "", "orig", &mut report), "orig");
    }
    assert!(!report.has_failed());
}

#[test]
fn test_invoice_validation() {
    let invoice = InvoiceRequest {
        product: "Bolt?".into(),
        category: "Parts2".into(),
        price: -4.0,
        quantity: 0,
    };
    assert_eq!(
        validate_invoice(&invoice).messages(),
        vec![
            "Error: Product can't have any punctuation",
            "Error: Category can't have any digits",
            "Error: The price can't be negative",
            "Error: Quantity can't be zero",
        ]
    );
}
