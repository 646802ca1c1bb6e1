//! Origin resolver: the static proxy rule.
//!
//! Every local-prefixed path maps verbatim, path and query preserved,
//! onto the configured backend origin, so application code only ever
//! addresses same-origin-looking routes. Pure pass-through: no header,
//! body, or status transformation happens here.

use thiserror::Error;
use url::Url;

/// Validation errors raised when constructing an [`OriginResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverValidationError {
    /// The origin URL cannot carry request paths.
    #[error("origin must be a base URL")]
    OriginCannotBeABase,
    /// The prefix did not start with `/`.
    #[error("prefix must start with '/'")]
    PrefixMissingLeadingSlash,
    /// The prefix ended with `/`.
    #[error("prefix must not end with '/'")]
    PrefixTrailingSlash,
}

/// Failure to map a logical path onto the origin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to resolve '{path}' against the origin: {detail}")]
pub struct ResolveError {
    /// The localized path that failed to resolve.
    pub path: String,
    /// Underlying URL error description.
    pub detail: String,
}

/// Static rewriting rule mapping local API paths to the backend origin.
#[derive(Debug, Clone)]
pub struct OriginResolver {
    origin: Url,
    prefix: String,
}

impl OriginResolver {
    /// Build the rule for one origin and local prefix.
    pub fn new(origin: Url, prefix: impl Into<String>) -> Result<Self, ResolverValidationError> {
        if origin.cannot_be_a_base() {
            return Err(ResolverValidationError::OriginCannotBeABase);
        }
        let prefix = prefix.into();
        if !prefix.starts_with('/') {
            return Err(ResolverValidationError::PrefixMissingLeadingSlash);
        }
        if prefix.ends_with('/') {
            return Err(ResolverValidationError::PrefixTrailingSlash);
        }
        Ok(Self { origin, prefix })
    }

    /// Ensure a logical path carries the local prefix.
    ///
    /// Paths already under the prefix pass through unchanged, so callers
    /// may address either form.
    pub fn localize(&self, path: &str) -> String {
        let under_prefix = path
            .strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'));
        if under_prefix {
            path.to_owned()
        } else if path.starts_with('/') {
            format!("{}{}", self.prefix, path)
        } else {
            format!("{}/{}", self.prefix, path)
        }
    }

    /// Map a logical path verbatim onto the backend origin.
    ///
    /// The local prefix is stripped and the remainder, query string
    /// included, joins the origin untouched.
    pub fn resolve(&self, path: &str) -> Result<Url, ResolveError> {
        let localized = self.localize(path);
        let forwarded = localized
            .strip_prefix(self.prefix.as_str())
            .unwrap_or(localized.as_str());
        let forwarded = if forwarded.is_empty() { "/" } else { forwarded };
        self.origin.join(forwarded).map_err(|error| ResolveError {
            path: localized.clone(),
            detail: error.to_string(),
        })
    }
}
