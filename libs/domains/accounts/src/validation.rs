//! Field-level input checks run before any store mutation.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

use crate::error::{AccountError, AccountResult};

static LETTERS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").expect("static regex"));

/// Favorite cake must be non-empty and letters only
pub fn validate_cake(cake: &str) -> Result<(), ValidationError> {
    if cake.is_empty() {
        return Err(ValidationError::new("cake_empty")
            .with_message(Cow::Borrowed("Favorite cake can't be empty")));
    }

    if !LETTERS_ONLY.is_match(cake) {
        return Err(ValidationError::new("cake_charset")
            .with_message(Cow::Borrowed("Favorite cake can contain only letters")));
    }

    Ok(())
}

/// Run the derived validator and fold the failures into a single message.
///
/// Messages are ordered by field name so the output is stable.
pub fn validate_input<T: Validate>(input: &T) -> AccountResult<()> {
    input.validate().map_err(|errors| {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect::<Vec<_>>()
            .join("; ");

        AccountError::Validation(message)
    })
}
