use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SimpleLogin API key.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "api_key";

    /// HTTP header the key is sent in on every API request.
    pub const HEADER: &'static str = "Authentication";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// An email address used as a mailbox or recipient identity.
///
/// Invariant: non-empty local part and domain around a single `@`. This is a
/// plausibility check, not full RFC 5321 parsing; the SMTP layer performs the
/// authoritative parse when composing a message.
pub struct EmailAddress(String);

impl EmailAddress {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "email";

    /// Create a validated [`EmailAddress`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(ValidationError::InvalidEmailAddress {
                input: trimmed.to_owned(),
            }),
        }
    }

    /// Borrow the validated address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A domain name used for custom aliases (e.g. `example.com`).
///
/// Invariant: non-empty after trimming, no whitespace, no `@`.
pub struct Hostname(String);

impl Hostname {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "hostname";

    /// Create a validated [`Hostname`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if trimmed.contains('@') || trimmed.contains(char::is_whitespace) {
            return Err(ValidationError::InvalidHostname {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated hostname.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
/// A phone number together with its digit-only normalization.
///
/// Normalization strips every non-digit character and nothing else; no
/// international-format validation is performed. Equality, ordering, and
/// hashing are based on the digit string.
pub struct PhoneNumber {
    raw: String,
    digits: String,
}

impl PhoneNumber {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "phone_number";

    /// Create a phone number, rejecting input that contains no digits at all.
    pub fn new(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(ValidationError::NoDigits { input: raw });
        }

        Ok(Self { raw, digits })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Digit-only normalization used as the alias-lookup key.
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.digits.hash(state);
    }
}

impl std::cmp::PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.digits.cmp(&other.digits)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// SimpleLogin alias id.
pub struct AliasId(i64);

impl AliasId {
    /// Construct an alias id from its integer representation.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the underlying id.
    pub fn value(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// SimpleLogin mailbox id.
pub struct MailboxId(i64);

impl MailboxId {
    /// Construct a mailbox id from its integer representation.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the underlying id.
    pub fn value(self) -> i64 {
        self.0
    }
}
