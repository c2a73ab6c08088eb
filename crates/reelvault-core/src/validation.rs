//! Field validation rules kept as data.
//!
//! Each entity publishes a table of `FieldRule`s; `validate` walks the table
//! against anything that can expose its fields by name. Absent fields are
//! skipped, which is what partial updates need.

use crate::error::DomainError;

/// Year of the earliest known motion picture.
pub const FIRST_FILM_YEAR: i32 = 1888;

/// A value read from an input object for checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Int(i32),
}

/// A single constraint on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Text must contain something other than whitespace.
    NotBlank,
    /// Text length limit, in characters.
    MaxChars(usize),
    /// Minimum text length, in characters.
    MinChars(usize),
    /// Rough `local@domain.tld` shape check.
    Email,
    /// Integer year in `[min, current_year + years_ahead]`.
    Year { min: i32, years_ahead: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub constraint: Constraint,
}

/// Rules for movie attributes on create and update.
pub const MOVIE_RULES: &[FieldRule] = &[
    FieldRule {
        field: "title",
        constraint: Constraint::NotBlank,
    },
    FieldRule {
        field: "title",
        constraint: Constraint::MaxChars(255),
    },
    FieldRule {
        field: "publishingYear",
        constraint: Constraint::Year {
            min: FIRST_FILM_YEAR,
            years_ahead: 1,
        },
    },
    FieldRule {
        field: "poster",
        constraint: Constraint::MaxChars(2048),
    },
];

/// Rules for account registration.
pub const REGISTRATION_RULES: &[FieldRule] = &[
    FieldRule {
        field: "email",
        constraint: Constraint::Email,
    },
    FieldRule {
        field: "email",
        constraint: Constraint::MaxChars(255),
    },
    FieldRule {
        field: "password",
        constraint: Constraint::MinChars(8),
    },
];

fn looks_like_email(text: &str) -> bool {
    let Some((local, domain)) = text.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !text.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Anything whose fields can be looked up by their wire name.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl Constraint {
    fn check(&self, field: &str, value: FieldValue<'_>, current_year: i32) -> Option<String> {
        match (self, value) {
            (Constraint::NotBlank, FieldValue::Text(text)) if text.trim().is_empty() => {
                Some(format!("{field} should not be empty"))
            }
            (Constraint::MaxChars(max), FieldValue::Text(text)) if text.chars().count() > *max => {
                Some(format!("{field} must be at most {max} characters"))
            }
            (Constraint::MinChars(min), FieldValue::Text(text)) if text.chars().count() < *min => {
                Some(format!("{field} must be at least {min} characters"))
            }
            (Constraint::Email, FieldValue::Text(text)) if !looks_like_email(text) => {
                Some(format!("{field} must be an email"))
            }
            (Constraint::Year { min, .. }, FieldValue::Int(year)) if year < *min => {
                Some(format!("{field} must not be less than {min}"))
            }
            (Constraint::Year { years_ahead, .. }, FieldValue::Int(year))
                if year > current_year + years_ahead =>
            {
                Some(format!(
                    "{field} must not be greater than {}",
                    current_year + years_ahead
                ))
            }
            (
                Constraint::NotBlank
                | Constraint::MaxChars(_)
                | Constraint::MinChars(_)
                | Constraint::Email,
                FieldValue::Int(_),
            )
            | (Constraint::Year { .. }, FieldValue::Text(_)) => {
                Some(format!("{field} has the wrong type"))
            }
            _ => None,
        }
    }
}

/// Check `source` against `rules`, collecting every failure.
pub fn validate(
    rules: &[FieldRule],
    source: &impl FieldSource,
    current_year: i32,
) -> Result<(), DomainError> {
    let errors: Vec<String> = rules
        .iter()
        .filter_map(|rule| {
            let value = source.field(rule.field)?;
            rule.constraint.check(rule.field, value, current_year)
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MovieChanges, NewAccount, NewMovie};

    const YEAR: i32 = 2026;

    fn movie(title: &str, year: i32) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            publishing_year: year,
            poster: None,
        }
    }

    #[test]
    fn test_year_boundaries() {
        assert!(validate(MOVIE_RULES, &movie("Old", 1887), YEAR).is_err());
        assert!(validate(MOVIE_RULES, &movie("Old", 1888), YEAR).is_ok());
        assert!(validate(MOVIE_RULES, &movie("Soon", YEAR + 1), YEAR).is_ok());
        assert!(validate(MOVIE_RULES, &movie("Later", YEAR + 2), YEAR).is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        let err = validate(MOVIE_RULES, &movie("   ", 2000), YEAR).unwrap_err();
        match err {
            DomainError::Validation(messages) => {
                assert_eq!(messages, vec!["title should not be empty".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_collects_every_failure() {
        let err = validate(MOVIE_RULES, &movie("", 1500), YEAR).unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m.len() == 2));
    }

    #[test]
    fn test_partial_changes_skip_absent_fields() {
        let changes = MovieChanges {
            publishing_year: Some(1999),
            ..Default::default()
        };
        assert!(validate(MOVIE_RULES, &changes, YEAR).is_ok());

        let changes = MovieChanges {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(validate(MOVIE_RULES, &changes, YEAR).is_err());
    }

    #[test]
    fn test_title_length_counts_characters() {
        let long = "é".repeat(255);
        assert!(validate(MOVIE_RULES, &movie(&long, 2000), YEAR).is_ok());
        let too_long = "é".repeat(256);
        assert!(validate(MOVIE_RULES, &movie(&too_long, 2000), YEAR).is_err());
    }

    #[test]
    fn test_registration_rules() {
        let ok = NewAccount {
            email: "a@x.com",
            password: "password",
        };
        assert!(validate(REGISTRATION_RULES, &ok, YEAR).is_ok());

        let short = NewAccount {
            email: "a@x.com",
            password: "pass",
        };
        assert!(validate(REGISTRATION_RULES, &short, YEAR).is_err());

        for email in ["", "ax.com", "a@", "@x.com", "a@x", "a b@x.com"] {
            let account = NewAccount {
                email,
                password: "password",
            };
            assert!(
                validate(REGISTRATION_RULES, &account, YEAR).is_err(),
                "{email} accepted"
            );
        }
    }
}
