//! Named input validators.
//!
//! Each check returns `Ok(())` or a [`Rejection`] naming the field, a reason
//! code and a message fit for the client. Handlers call these instead of
//! carrying their own patterns.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static USERNAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("username regex should compile")
});

/// Stricter notes rule: a leading letter, then letters, digits or `_`.
static NOTES_USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("notes username regex should compile")
});

static LOWERCASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]").expect("lowercase regex should compile"));

static UPPERCASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("uppercase regex should compile"));

static DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]").expect("digit regex should compile"));

/// Two or three digit area code, a dash, then digits.
static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2,3}-[0-9]+$").expect("phone regex should compile"));

const MIN_PHONE_LENGTH: usize = 8;
const MIN_NOTE_LENGTH: usize = 5;
const MIN_PERSON_NAME_LENGTH: usize = 3;

/// Keeps any realistic number of blogs far from `i64` overflow when summed.
pub const MAX_LIKES: i64 = u32::MAX as i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Missing,
    TooShort,
    TooLong,
    InvalidCharacter,
    MissingLowercase,
    MissingUppercase,
    MissingDigit,
    MissingSymbol,
    InvalidFormat,
    Negative,
    TooLarge,
}

impl Reason {
    pub fn code(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::InvalidCharacter => "invalid_character",
            Self::MissingLowercase => "missing_lowercase",
            Self::MissingUppercase => "missing_uppercase",
            Self::MissingDigit => "missing_digit",
            Self::MissingSymbol => "missing_symbol",
            Self::InvalidFormat => "invalid_format",
            Self::Negative => "negative",
            Self::TooLarge => "too_large",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Rejection {
    pub field: &'static str,
    pub reason: Reason,
    pub message: String,
}

impl Rejection {
    pub fn new(field: &'static str, reason: Reason, message: impl Into<String>) -> Self {
        Self {
            field,
            reason,
            message: message.into(),
        }
    }
}

/// Present and not blank. The value comes back untrimmed.
pub fn required_text(field: &'static str, value: Option<String>) -> Result<String, Rejection> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(Rejection::new(field, Reason::Missing, format!("{field} missing"))),
    }
}

pub fn required<T>(field: &'static str, value: Option<T>) -> Result<T, Rejection> {
    value.ok_or_else(|| Rejection::new(field, Reason::Missing, format!("{field} missing")))
}

/// Character set only; length is [`UsernamePolicy`]'s business.
pub fn valid_username_chars(username: &str) -> bool {
    USERNAME_CHARS.is_match(username)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsernamePolicy {
    pub min_len: usize,
    pub max_len: usize,
    pub rules: Preset,
}

impl Default for UsernamePolicy {
    fn default() -> Self {
        Self::preset(Preset::Bloglist)
    }
}

impl UsernamePolicy {
    pub fn preset(rules: Preset) -> Self {
        Self {
            min_len: 3,
            max_len: 15,
            rules,
        }
    }

    pub fn check(&self, username: &str) -> Result<(), Rejection> {
        let invalid = |message: &str| {
            Err(Rejection::new("username", Reason::InvalidCharacter, message))
        };

        match self.rules {
            Preset::Bloglist if !valid_username_chars(username) => {
                return invalid("username contains invalid characters");
            }
            Preset::Notes if !NOTES_USERNAME.is_match(username) => {
                return if username.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    invalid("username may only contain letters, digits and _")
                } else {
                    invalid("username must start with a letter")
                };
            }
            _ => {}
        }

        let len = username.chars().count();
        if len < self.min_len {
            return Err(Rejection::new(
                "username",
                Reason::TooShort,
                format!("username must be at least {} characters long", self.min_len),
            ));
        }
        if len > self.max_len {
            return Err(Rejection::new(
                "username",
                Reason::TooLong,
                format!("username must be at most {} characters long", self.max_len),
            ));
        }
        Ok(())
    }
}

/// The two account-holding backends historically disagreed on username
/// characters and password symbols. Each preset keeps one of those rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Bloglist,
    Notes,
}

impl Preset {
    pub fn symbols(self) -> &'static str {
        match self {
            Self::Bloglist => "@$!%*?&",
            Self::Notes => "!@#$%^&*",
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bloglist" => Ok(Self::Bloglist),
            "notes" => Ok(Self::Notes),
            other => Err(format!("unknown policy '{other}' (expected bloglist or notes)")),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bloglist => f.write_str("bloglist"),
            Self::Notes => f.write_str("notes"),
        }
    }
}

/// Password strength rules: one lowercase, one uppercase, one digit, one
/// symbol from `symbols`, nothing outside letters/digits/`symbols`, and at
/// least `min_length` characters.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    symbols: String,
    symbol: Regex,
    allowed: Regex,
}

impl PasswordPolicy {
    pub const DEFAULT_MIN_LENGTH: usize = 8;

    /// Fails only when `symbols` is empty.
    pub fn new(min_length: usize, symbols: &str) -> Result<Self, regex::Error> {
        let escaped = regex::escape(symbols);
        Ok(Self {
            min_length,
            symbols: symbols.to_string(),
            symbol: Regex::new(&format!("[{escaped}]"))?,
            allowed: Regex::new(&format!("^[A-Za-z0-9{escaped}]*$"))?,
        })
    }

    pub fn preset(preset: Preset) -> Self {
        Self::new(Self::DEFAULT_MIN_LENGTH, preset.symbols())
            .expect("preset symbol sets are non-empty")
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn symbols(&self) -> &str {
        &self.symbols
    }

    pub fn is_strong(&self, password: &str) -> bool {
        self.check(password).is_ok()
    }

    /// Reports the first rule the password breaks, length first.
    pub fn check(&self, password: &str) -> Result<(), Rejection> {
        let fail = |reason, message: String| Err(Rejection::new("password", reason, message));

        if password.chars().count() < self.min_length {
            return fail(
                Reason::TooShort,
                format!("password must be at least {} characters long", self.min_length),
            );
        }
        if !self.allowed.is_match(password) {
            return fail(
                Reason::InvalidCharacter,
                format!("password may only contain letters, digits and {}", self.symbols),
            );
        }
        if !LOWERCASE.is_match(password) {
            return fail(
                Reason::MissingLowercase,
                "password must contain at least one lowercase letter".into(),
            );
        }
        if !UPPERCASE.is_match(password) {
            return fail(
                Reason::MissingUppercase,
                "password must contain at least one uppercase letter".into(),
            );
        }
        if !DIGIT.is_match(password) {
            return fail(
                Reason::MissingDigit,
                "password must contain at least one digit".into(),
            );
        }
        if !self.symbol.is_match(password) {
            return fail(
                Reason::MissingSymbol,
                format!("password must contain at least one of {}", self.symbols),
            );
        }
        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::preset(Preset::Bloglist)
    }
}

pub fn note_content(content: &str) -> Result<(), Rejection> {
    if content.chars().count() < MIN_NOTE_LENGTH {
        return Err(Rejection::new(
            "content",
            Reason::TooShort,
            format!("content must be at least {MIN_NOTE_LENGTH} characters long"),
        ));
    }
    Ok(())
}

pub fn person_name(name: &str) -> Result<(), Rejection> {
    if name.chars().count() < MIN_PERSON_NAME_LENGTH {
        return Err(Rejection::new(
            "name",
            Reason::TooShort,
            format!("name must be at least {MIN_PERSON_NAME_LENGTH} characters long"),
        ));
    }
    Ok(())
}

pub fn phone_number(number: &str) -> Result<(), Rejection> {
    if number.len() < MIN_PHONE_LENGTH || !PHONE_NUMBER.is_match(number) {
        return Err(Rejection::new(
            "number",
            Reason::InvalidFormat,
            format!("{number} is not a valid phone number"),
        ));
    }
    Ok(())
}

pub fn likes(likes: i64) -> Result<(), Rejection> {
    if likes < 0 {
        return Err(Rejection::new(
            "likes",
            Reason::Negative,
            "likes must not be negative",
        ));
    }
    if likes > MAX_LIKES {
        return Err(Rejection::new(
            "likes",
            Reason::TooLarge,
            format!("likes must be at most {MAX_LIKES}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_charset() {
        assert!(valid_username_chars("mluukkai"));
        assert!(valid_username_chars("a.b-c_9"));
        assert!(!valid_username_chars("has space"));
        assert!(!valid_username_chars("semi;colon"));
        assert!(!valid_username_chars("ümlaut"));
        assert!(!valid_username_chars(""));
    }

    #[test]
    fn username_length_is_checked_after_charset() {
        let policy = UsernamePolicy::default();
        assert!(policy.check("abc").is_ok());
        assert!(policy.check("fifteen_chars_x").is_ok());
        assert_eq!(policy.check("ab").unwrap_err().reason, Reason::TooShort);
        assert_eq!(
            policy.check("sixteen_chars_xx").unwrap_err().reason,
            Reason::TooLong
        );
        assert_eq!(
            policy.check("a!").unwrap_err().reason,
            Reason::InvalidCharacter
        );
    }

    #[test]
    fn notes_usernames_start_with_a_letter() {
        let policy = UsernamePolicy::preset(Preset::Notes);
        assert!(policy.check("root").is_ok());
        assert!(policy.check("john_doe2").is_ok());
        assert_eq!(
            policy.check("john-doe").unwrap_err().reason,
            Reason::InvalidCharacter
        );
        assert_eq!(
            policy.check("john.doe").unwrap_err().reason,
            Reason::InvalidCharacter
        );
        assert_eq!(
            policy.check("1john").unwrap_err().message,
            "username must start with a letter"
        );
        assert_eq!(policy.check("jo").unwrap_err().reason, Reason::TooShort);

        // Both accepted by the bloglist rules
        let bloglist = UsernamePolicy::default();
        assert!(bloglist.check("john-doe").is_ok());
        assert!(bloglist.check("1john").is_ok());
    }

    #[test]
    fn strong_password_passes_both_presets() {
        let bloglist = PasswordPolicy::preset(Preset::Bloglist);
        let notes = PasswordPolicy::preset(Preset::Notes);
        assert!(bloglist.is_strong("Secret12!"));
        assert!(notes.is_strong("Secret12!"));
    }

    #[test]
    fn presets_differ_on_symbols() {
        let bloglist = PasswordPolicy::preset(Preset::Bloglist);
        let notes = PasswordPolicy::preset(Preset::Notes);

        // '?' is only in the bloglist set, '#' only in the notes set
        assert!(bloglist.is_strong("Secret12?"));
        assert_eq!(
            notes.check("Secret12?").unwrap_err().reason,
            Reason::InvalidCharacter
        );
        assert!(notes.is_strong("Secret12#"));
        assert_eq!(
            bloglist.check("Secret12#").unwrap_err().reason,
            Reason::InvalidCharacter
        );
    }

    #[test]
    fn each_missing_class_has_its_own_reason() {
        let policy = PasswordPolicy::default();
        let reason = |pw: &str| policy.check(pw).unwrap_err().reason;

        assert_eq!(reason("Sh0rt!"), Reason::TooShort);
        assert_eq!(reason("SECRET12!"), Reason::MissingLowercase);
        assert_eq!(reason("secret12!"), Reason::MissingUppercase);
        assert_eq!(reason("Secretss!"), Reason::MissingDigit);
        assert_eq!(reason("Secret123"), Reason::MissingSymbol);
    }

    #[test]
    fn min_length_is_configurable() {
        let policy = PasswordPolicy::default().with_min_length(12);
        assert_eq!(policy.min_length(), 12);
        assert!(!policy.is_strong("Secret12!"));
        assert!(policy.is_strong("Secret12!Secret"));
    }

    #[test]
    fn custom_symbol_sets_are_escaped() {
        let policy = PasswordPolicy::new(8, "-]^\\").unwrap();
        assert!(policy.is_strong("Secret12-"));
        assert!(policy.is_strong("Secret12]"));
        assert!(policy.is_strong("Secret12\\"));
        assert!(!policy.is_strong("Secret12!"));
    }

    #[test]
    fn empty_symbol_set_is_refused() {
        assert!(PasswordPolicy::new(8, "").is_err());
    }

    #[test]
    fn preset_names_parse() {
        assert_eq!("notes".parse::<Preset>(), Ok(Preset::Notes));
        assert_eq!("BlogList".parse::<Preset>(), Ok(Preset::Bloglist));
        assert!("strict".parse::<Preset>().is_err());
    }

    #[test]
    fn phone_numbers() {
        assert!(phone_number("040-123456").is_ok());
        assert!(phone_number("09-1234556").is_ok());
        assert!(phone_number("0400-12345").is_err());
        assert!(phone_number("1-22334455").is_err());
        assert!(phone_number("10-22-334455").is_err());
        assert!(phone_number("12-3456").is_err());
    }

    #[test]
    fn required_text_rejects_blank() {
        assert_eq!(required_text("title", Some("x".into())), Ok("x".to_string()));
        assert_eq!(
            required_text("title", Some("   ".into())).unwrap_err().message,
            "title missing"
        );
        assert_eq!(
            required_text("title", None).unwrap_err().reason,
            Reason::Missing
        );
    }

    #[test]
    fn resource_fields() {
        assert!(note_content("HTML is easy").is_ok());
        assert!(note_content("HTML").is_err());
        assert!(person_name("Ada").is_ok());
        assert!(person_name("Al").is_err());
        assert!(likes(0).is_ok());
        assert_eq!(likes(-1).unwrap_err().reason, Reason::Negative);
        assert!(likes(MAX_LIKES).is_ok());
        assert_eq!(likes(MAX_LIKES + 1).unwrap_err().reason, Reason::TooLarge);
        assert_eq!(likes(i64::MAX).unwrap_err().reason, Reason::TooLarge);
    }
}
