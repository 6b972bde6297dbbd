//! Utilities for generating deterministic, URL-safe slugs.
//!
//! Titles on this site are Turkish, so slug derivation lower-cases the input
//! and maps the Turkish-specific letters (ğ ü ş ı ö ç) onto their ASCII
//! counterparts before filtering. Consumers provide their own uniqueness
//! predicate to avoid persistence conflicts while keeping the derivation pure.

use std::future::Future;

use thiserror::Error;

const MAX_SUFFIX_ATTEMPTS: usize = 64;

/// Errors that can occur while generating a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("exhausted attempts to find a unique slug for `{base}`")]
    Exhausted { base: String },
}

/// Errors that can occur while generating a slug via an async uniqueness check.
#[derive(Debug, Error)]
pub enum SlugAsyncError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Predicate(E),
}

/// Lower-case, transliterate and filter a title into slug characters.
///
/// The output contains only `a-z`, `0-9` and single hyphens, with no leading
/// or trailing hyphen. It may be empty when the input holds nothing usable;
/// [`derive_slug`] turns that case into an error.
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut out = String::with_capacity(lowered.len());

    for ch in lowered.chars() {
        let ch = transliterate(ch);
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            // Whitespace runs and hyphen runs both collapse to one hyphen.
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        }
        // Anything else is dropped without acting as a separator.
    }

    while out.ends_with('-') {
        out.pop();
    }

    out
}

/// Derive a slug from the provided human-readable title, rejecting inputs
/// that cannot produce one.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Produce a slug that does not collide according to the supplied predicate.
///
/// The `is_unique` closure must return `true` when the candidate does not
/// already exist. Collisions retry with a monotonic numeric suffix
/// (`-1`, `-2`, …), so the result is deterministic for a fixed existing set.
pub fn generate_unique_slug<F>(input: &str, mut is_unique: F) -> Result<String, SlugError>
where
    F: FnMut(&str) -> bool,
{
    let base = derive_slug(input)?;

    if is_unique(&base) {
        return Ok(base);
    }

    for attempt in 1..=MAX_SUFFIX_ATTEMPTS {
        let candidate = format!("{base}-{attempt}");
        if is_unique(&candidate) {
            return Ok(candidate);
        }
    }

    Err(SlugError::Exhausted { base })
}

/// Async variant of [`generate_unique_slug`] that awaits the uniqueness
/// predicate, typically a repository existence check.
pub async fn generate_unique_slug_async<F, Fut, E>(
    input: &str,
    mut is_unique: F,
) -> Result<String, SlugAsyncError<E>>
where
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let base = derive_slug(input)?;

    if is_unique(&base).await.map_err(SlugAsyncError::Predicate)? {
        return Ok(base);
    }

    for attempt in 1..=MAX_SUFFIX_ATTEMPTS {
        let candidate = format!("{base}-{attempt}");
        if is_unique(&candidate)
            .await
            .map_err(SlugAsyncError::Predicate)?
        {
            return Ok(candidate);
        }
    }

    Err(SlugAsyncError::Slug(SlugError::Exhausted { base }))
}

fn transliterate(ch: char) -> char {
    match ch {
        'ğ' => 'g',
        'ü' => 'u',
        'ş' => 's',
        'ı' => 'i',
        'ö' => 'o',
        'ç' => 'c',
        other => other,
    }
}
