//! Field validation for the order and warranty forms.

use std::collections::BTreeMap;

use crate::domain::order::{CustomerDetails, CustomerField};

/// Field-scoped validation messages, keyed in form order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<CustomerField, String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: CustomerField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> Vec<CustomerField> {
        self.errors.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CustomerField, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn clear_field(&mut self, field: CustomerField) {
        self.errors.remove(&field);
    }

    fn insert(&mut self, field: CustomerField, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

pub fn validate_customer(customer: &CustomerDetails) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if customer.first_name.trim().is_empty() {
        errors.insert(CustomerField::FirstName, "First name is required");
    }
    if customer.last_name.trim().is_empty() {
        errors.insert(CustomerField::LastName, "Last name is required");
    }
    if customer.address.trim().is_empty() {
        errors.insert(CustomerField::Address, "Address is required");
    }
    if customer.city.trim().is_empty() {
        errors.insert(CustomerField::City, "City is required");
    }

    if customer.mobile.trim().is_empty() {
        errors.insert(CustomerField::Mobile, "Mobile number is required");
    } else if !is_valid_mobile(&customer.mobile) {
        errors.insert(CustomerField::Mobile, "Please enter a valid mobile number");
    }

    if customer.zip_code.trim().is_empty() {
        errors.insert(CustomerField::ZipCode, "ZIP code is required");
    } else if !is_valid_zip_code(&customer.zip_code) {
        errors.insert(CustomerField::ZipCode, "Please enter a valid ZIP code");
    }

    if !customer.email.is_empty() && !is_valid_email(&customer.email) {
        errors.insert(CustomerField::Email, "Please enter a valid email address");
    }

    errors
}

/// International number: optional `+`, then 1 to 15 digits with a non-zero lead.
/// Whitespace anywhere in the input is ignored.
pub fn is_valid_mobile(raw: &str) -> bool {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    let mut chars = digits.chars();
    let leading_ok = matches!(chars.next(), Some('1'..='9'));
    leading_ok && digits.len() <= 15 && chars.all(|ch| ch.is_ascii_digit())
}

/// US ZIP or ZIP+4.
pub fn is_valid_zip_code(raw: &str) -> bool {
    let all_digits = |part: &str, len: usize| {
        part.len() == len && part.chars().all(|ch| ch.is_ascii_digit())
    };

    match raw.split_once('-') {
        Some((zip, plus_four)) => all_digits(zip, 5) && all_digits(plus_four, 4),
        None => all_digits(raw, 5),
    }
}

/// `local@domain.tld` shape check; no whitespace and exactly one `@`.
pub fn is_valid_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

pub const DEFAULT_MIN_SERIAL_LENGTH: usize = 3;

/// Minimum-length gate for warranty serial lookups, applied to the trimmed input.
pub fn is_valid_serial(raw: &str, min_length: usize) -> bool {
    raw.trim().chars().count() >= min_length
}
