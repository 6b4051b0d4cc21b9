//! User contact details collected before chatting.
//!
//! Collection is a small state machine: fields are requested one at a time in a
//! fixed order (name, email, phone) and a field is asked again until the answer
//! passes validation. There is no retry limit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    Email,
    Phone,
}

impl ProfileField {
    pub fn prompt(self) -> &'static str {
        match self {
            ProfileField::Name => "What's your name?",
            ProfileField::Email => "What's your email address?",
            ProfileField::Phone => "What's your phone number?",
        }
    }
}

/// Why an answer was rejected. The messages are shown to the user verbatim.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Please enter your name.")]
    EmptyName,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a valid phone number.")]
    InvalidPhone,
}

/// The outcome of feeding one answer into the collection flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileStep {
    /// Ask for this field next.
    Ask(ProfileField),
    /// The answer was rejected; ask for the same field again.
    Retry {
        field: ProfileField,
        error: ProfileError,
    },
    /// Every field is filled in.
    Complete { welcome: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Set once the welcome message has been delivered.
    pub greeted: bool,
}

impl UserProfile {
    pub fn next_missing(&self) -> Option<ProfileField> {
        if self.name.is_empty() {
            Some(ProfileField::Name)
        } else if self.email.is_empty() {
            Some(ProfileField::Email)
        } else if self.phone.is_empty() {
            Some(ProfileField::Phone)
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next_missing().is_none()
    }

    pub fn display_name(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    /// Validates and stores one field.
    pub fn submit(&mut self, field: ProfileField, answer: &str) -> Result<(), ProfileError> {
        let answer = answer.trim();
        match field {
            ProfileField::Name => {
                if answer.is_empty() {
                    return Err(ProfileError::EmptyName);
                }
                self.name = title_case(answer);
            }
            ProfileField::Email => {
                if !answer.contains('@') {
                    return Err(ProfileError::InvalidEmail);
                }
                self.email = answer.to_string();
            }
            ProfileField::Phone => {
                if answer.chars().count() < 10 {
                    return Err(ProfileError::InvalidPhone);
                }
                self.phone = answer.to_string();
            }
        }
        Ok(())
    }

    /// Advances the collection flow.
    ///
    /// Without an answer this only reports what to ask next. With an answer, the
    /// answer fills the currently missing field.
    pub fn advance(&mut self, answer: Option<&str>) -> ProfileStep {
        let Some(field) = self.next_missing() else {
            return self.complete();
        };
        let Some(answer) = answer else {
            return ProfileStep::Ask(field);
        };
        if let Err(error) = self.submit(field, answer) {
            return ProfileStep::Retry { field, error };
        }
        match self.next_missing() {
            Some(next) => ProfileStep::Ask(next),
            None => self.complete(),
        }
    }

    fn complete(&mut self) -> ProfileStep {
        self.greeted = true;
        ProfileStep::Complete {
            welcome: format!("Thank you, {}! How can I assist you today?", self.name),
        }
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
