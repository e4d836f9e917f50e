// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Field grammar rules for account and invoice text.
//!
//! Every check appends to a [`ValidationReport`] instead of returning early, so a
//! single pass reports every problem with a record. Records are walked through
//! fixed, ordered field lists, which keeps message order stable between runs.

use axum::http::StatusCode;
use conch_common::{AccountRequest, InvoiceRequest};
use std::ops::RangeInclusive;

const DIGITS: &str = "0123456789";

const DEFAULT_PUNCTUATION: &str = ".,?!'\"`:;";
const NAME_PUNCTUATION: &str = " .,?!'\"`:;";
const PRODUCT_PUNCTUATION: &str = "?!'\";";
const CATEGORY_PUNCTUATION: &str = ".?!'\"`:;";

const DEFAULT_SYMBOLS: &str = "~@#%$^|><&*()[]{}_-+=\\/";
const PRODUCT_SYMBOLS: &str = "~#$*{}[]_\\+=><^";
const CATEGORY_SYMBOLS: &str = "~@#%$^|><*()[]{}_-+=\\/";
const SHIPPING_SYMBOLS: &str = "~@#&%$^|><*()[]{}_+=\\/";

/// Character bounds for usernames and passwords
pub const CREDENTIAL_LENGTH: RangeInclusive<usize> = 8..=16;

/// Account fields in the order they are reported
pub const ACCOUNT_FIELDS: [Field; 5] = [
    Field::Fname,
    Field::Lname,
    Field::Address,
    Field::Username,
    Field::Password,
];

/// Invoice text fields in the order they are reported
pub const INVOICE_FIELDS: [Field; 2] = [Field::Product, Field::Category];

/// A validated text field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Fname,
    Lname,
    Address,
    Username,
    Password,
    Product,
    Category,
    Shipping,
}

impl Field {
    /// Name used inside error messages
    pub fn label(self) -> &'static str {
        match self {
            Field::Fname => "Fname",
            Field::Lname => "Lname",
            Field::Address => "Address",
            Field::Username => "Username",
            Field::Password => "Password",
            Field::Product => "Product",
            Field::Category => "Category",
            Field::Shipping => "Shipping",
        }
    }

    fn rule(self) -> &'static FieldRule {
        match self {
            Field::Fname | Field::Lname => &NAME_RULE,
            Field::Address => &ADDRESS_RULE,
            Field::Username => &USERNAME_RULE,
            Field::Password => &PASSWORD_RULE,
            Field::Product => &PRODUCT_RULE,
            Field::Category => &CATEGORY_RULE,
            Field::Shipping => &SHIPPING_RULE,
        }
    }
}

/// Static grammar for one field
#[derive(Debug)]
struct FieldRule {
    forbid_digits: bool,
    punctuation: Option<&'static str>,
    symbols: Option<&'static str>,
    length: Option<RangeInclusive<usize>>,
    needs_capital_and_digit: bool,
}

static NAME_RULE: FieldRule = FieldRule {
    forbid_digits: true,
    punctuation: Some(NAME_PUNCTUATION),
    symbols: Some(DEFAULT_SYMBOLS),
    length: None,
    needs_capital_and_digit: false,
};

static ADDRESS_RULE: FieldRule = FieldRule {
    forbid_digits: false,
    punctuation: Some(CATEGORY_PUNCTUATION),
    symbols: Some(DEFAULT_SYMBOLS),
    length: None,
    needs_capital_and_digit: false,
};

static USERNAME_RULE: FieldRule = FieldRule {
    forbid_digits: false,
    punctuation: Some(DEFAULT_PUNCTUATION),
    symbols: Some(DEFAULT_SYMBOLS),
    length: Some(CREDENTIAL_LENGTH),
    needs_capital_and_digit: false,
};

static PASSWORD_RULE: FieldRule = FieldRule {
    forbid_digits: false,
    punctuation: None,
    symbols: None,
    length: Some(CREDENTIAL_LENGTH),
    needs_capital_and_digit: true,
};

static PRODUCT_RULE: FieldRule = FieldRule {
    forbid_digits: false,
    punctuation: Some(PRODUCT_PUNCTUATION),
    symbols: Some(PRODUCT_SYMBOLS),
    length: None,
    needs_capital_and_digit: false,
};

static CATEGORY_RULE: FieldRule = FieldRule {
    forbid_digits: true,
    punctuation: Some(CATEGORY_PUNCTUATION),
    symbols: Some(CATEGORY_SYMBOLS),
    length: None,
    needs_capital_and_digit: false,
};

static SHIPPING_RULE: FieldRule = FieldRule {
    forbid_digits: true,
    punctuation: Some(DEFAULT_PUNCTUATION),
    symbols: Some(SHIPPING_SYMBOLS),
    length: None,
    needs_capital_and_digit: false,
};

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub status: StatusCode,
    pub message: String,
}

/// Ordered accumulator of rule violations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a 400 violation
    pub fn add(&mut self, message: impl Into<String>) {
        self.add_with_status(StatusCode::BAD_REQUEST, message);
    }

    pub fn add_with_status(&mut self, status: StatusCode, message: impl Into<String>) {
        self.violations.push(Violation { status, message: message.into() });
    }

    /// True once any violation has been recorded
    pub fn has_failed(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }

    /// Status of the most recent violation, 400 when empty
    pub fn status(&self) -> StatusCode {
        self.violations
            .last()
            .map_or(StatusCode::BAD_REQUEST, |v| v.status)
    }

    /// `Ok(())` when nothing failed, the report itself otherwise
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.has_failed() {
            Err(self)
        } else {
            Ok(())
        }
    }
}

fn contains_any(value: &str, set: &str) -> bool {
    value.chars().any(|c| set.contains(c))
}

/// Run the character-class, length and content checks for `field`
fn check_grammar(field: Field, value: &str, report: &mut ValidationReport) {
    let rule = field.rule();
    let label = field.label();

    // Empty values have no characters to classify.
    if !value.is_empty() {
        if rule.forbid_digits && contains_any(value, DIGITS) {
            report.add(format!("Error: {label} can't have any digits"));
        }
        if rule.punctuation.is_some_and(|set| contains_any(value, set)) {
            report.add(format!("Error: {label} can't have any punctuation"));
        }
        if rule.symbols.is_some_and(|set| contains_any(value, set)) {
            report.add(format!("Error: {label} can't have any Symbols"));
        }
    }

    if let Some(bounds) = &rule.length {
        let len = value.chars().count();
        let (min, max) = (bounds.start(), bounds.end());
        if len < *min {
            report.add(format!("Error: {label} is too short, expected {min}-{max} chars"));
        }
        if len > *max {
            report.add(format!("Error: {label} is too long, expected {min}-{max} chars"));
        }
    }

    if rule.needs_capital_and_digit {
        if !value.chars().any(|c| c.is_ascii_uppercase()) {
            report.add(format!("Error: {label} must contain one or more capital letters"));
        }
        if !contains_any(value, DIGITS) {
            report.add(format!("Error: {label} must contain one or more digits"));
        }
    }
}

/// Full check of one field value
pub fn validate(field: Field, value: &str, report: &mut ValidationReport) {
    if value.is_empty() {
        report.add(format!("Error: {} can't be empty", field.label()));
    }
    check_grammar(field, value, report);
}

/// Patch check: an empty `new` keeps `original` and is not checked.
///
/// Returns the value that should be stored.
pub fn validate_patch<'a>(
    field: Field,
    new: &'a str,
    original: &'a str,
    report: &mut ValidationReport,
) -> &'a str {
    if new.is_empty() {
        return original;
    }
    check_grammar(field, new, report);
    new
}

/// Full check of a price
pub fn validate_price(price: f64, report: &mut ValidationReport) {
    if price == 0.0 {
        report.add("Error: Price can't be zero");
    } else if price < 0.0 {
        report.add("Error: The price can't be negative");
    }
}

/// Full check of a quantity
pub fn validate_quantity(quantity: i64, report: &mut ValidationReport) {
    if quantity == 0 {
        report.add("Error: Quantity can't be zero");
    } else if quantity < 0 {
        report.add("Error: The quantity can't be negative");
    }
}

/// Patch check of a price: zero keeps `original`
pub fn validate_price_patch(new: f64, original: f64, report: &mut ValidationReport) -> f64 {
    if new == 0.0 {
        return original;
    }
    if new < 0.0 {
        report.add("Error: The price can't be negative");
    }
    new
}

/// Patch check of a quantity: zero keeps `original`
pub fn validate_quantity_patch(new: i64, original: i64, report: &mut ValidationReport) -> i64 {
    if new == 0 {
        return original;
    }
    if new < 0 {
        report.add("Error: The quantity can't be negative");
    }
    new
}

/// Check every text field of an account registration
pub fn validate_account(account: &AccountRequest) -> ValidationReport {
    let mut report = ValidationReport::new();
    for field in ACCOUNT_FIELDS {
        let value = match field {
            Field::Fname => &account.fname,
            Field::Lname => &account.lname,
            Field::Address => &account.address,
            Field::Username => &account.username,
            Field::Password => &account.password,
            _ => continue,
        };
        validate(field, value, &mut report);
    }
    report
}

/// Check every field of a full invoice write
pub fn validate_invoice(invoice: &InvoiceRequest) -> ValidationReport {
    let mut report = ValidationReport::new();
    for field in INVOICE_FIELDS {
        let value = match field {
            Field::Product => &invoice.product,
            Field::Category => &invoice.category,
            _ => continue,
        };
        validate(field, value, &mut report);
    }
    validate_price(invoice.price, &mut report);
    validate_quantity(invoice.quantity, &mut report);
    report
}
