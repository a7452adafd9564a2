//! Site users and their ordered favorites.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{
    errors::{ConverterError, Result},
    utils::is_safe_key,
};

use super::{
    common::Displayable,
    formula::Formula,
};

const USERNAME_MIN: usize = 6;
const USERNAME_MAX: usize = 25;
const EMAIL_MAX: usize = 50;

/// Authorisation role attached to a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("ROLE_USER"),
        }
    }
}

/// Ordered favorites of a user. Position in the list is the rank.
///
/// The list is never mutated in place: every change produces a new list that
/// replaces the old one on the owning [`SiteUser`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesList(Vec<Formula>);

impl FavoritesList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Formula> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Formula] {
        &self.0
    }

    pub fn contains(&self, formula_name: &str) -> bool {
        self.position(formula_name).is_some()
    }

    pub fn position(&self, formula_name: &str) -> Option<usize> {
        self.0
            .iter()
            .position(|formula| formula.formula_name() == formula_name)
    }

    /// Formula identifiers in rank order.
    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(Formula::formula_name).collect()
    }

    /// Returns a copy of this list with `formula` appended.
    pub fn appended(&self, formula: Formula) -> Self {
        let mut formulas = Vec::with_capacity(self.0.len() + 1);
        formulas.extend(self.0.iter().cloned());
        formulas.push(formula);
        Self(formulas)
    }

    /// Returns a copy of this list without any entry for `formula_name`.
    pub fn without(&self, formula_name: &str) -> Self {
        Self(
            self.0
                .iter()
                .filter(|formula| formula.formula_name() != formula_name)
                .cloned()
                .collect(),
        )
    }
}

impl From<Vec<Formula>> for FavoritesList {
    fn from(formulas: Vec<Formula>) -> Self {
        Self(formulas)
    }
}

impl<'a> IntoIterator for &'a FavoritesList {
    type Item = &'a Formula;
    type IntoIter = std::slice::Iter<'a, Formula>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A registered account, keyed by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteUser {
    username: String,
    email: String,
    #[serde(default)]
    roles: Vec<Role>,
    #[serde(default, alias = "favoritesList")]
    favorites: FavoritesList,
}

impl SiteUser {
    /// Creates a user with the default role and no favorites.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let username = username.into().trim().to_string();
        let email = email.into().trim().to_string();
        validate_username(&username)?;
        validate_email(&email)?;
        Ok(Self {
            username,
            email,
            roles: vec![Role::User],
            favorites: FavoritesList::new(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn favorites(&self) -> &FavoritesList {
        &self.favorites
    }

    /// Replaces the favorites wholesale.
    pub fn with_favorites(mut self, favorites: FavoritesList) -> Self {
        self.favorites = favorites;
        self
    }

    pub fn summary(&self) -> SiteUserSummary {
        SiteUserSummary {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl Displayable for SiteUser {
    fn display_label(&self) -> String {
        format!("{} <{}>", self.username, self.email)
    }
}

/// Public view of a user without roles or favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteUserSummary {
    pub username: String,
    pub email: String,
}

pub fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(ConverterError::InvalidInput(format!(
            "username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )));
    }
    if !is_safe_key(username) {
        return Err(ConverterError::InvalidInput(
            "username may only contain letters, digits, `_`, `-` or `.`".into(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() || email.chars().count() > EMAIL_MAX {
        return Err(ConverterError::InvalidInput(format!(
            "email must be between 1 and {EMAIL_MAX} characters"
        )));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ConverterError::InvalidInput(format!(
            "`{email}` is not a valid email address"
        )))
    }
}
