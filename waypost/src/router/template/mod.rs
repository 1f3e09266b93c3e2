//! Defines `PathTemplate`, the compiled form of a URI template.
//!
//! Templates are `/`-delimited. Each token is either literal text, matched case-insensitively
//! (and itself a pattern), or a variable:
//!
//! | Token          | Meaning                                   |
//! |----------------|-------------------------------------------|
//! | `{name}`       | required variable                         |
//! | `{name?}`      | optional variable                         |
//! | `{name:int}`   | required variable, integer coercion       |
//! | `{name:num}`   | required variable, numeric normalisation  |
//! | `{name:int?}`  | optional variable, integer coercion       |
//! | `{name:num?}`  | optional variable, numeric normalisation  |
//!
//! The template is fully tokenized before the directory-index filename is stripped, so braces and
//! `?` inside variable tokens are never mistaken for file extensions or query strings.

pub mod regex;
pub mod segment;

use std::fmt;

use log::trace;

use crate::error::TemplateError;
use crate::router::template::segment::Segment;

/// An ordered list of `Segment` values, aligned index-for-index with request path positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compiles a single URI template with no prefix and no directory-index removal.
    ///
    /// ```rust
    /// # use waypost::router::template::PathTemplate;
    /// let template = PathTemplate::parse("/users/{id:int}").unwrap();
    /// assert_eq!(template.len(), 2);
    /// assert_eq!(template.to_string(), "/users/{id:int}");
    /// ```
    pub fn parse(uri: &str) -> Result<Self, TemplateError> {
        PathTemplate::compile::<&str>(&[], uri, None)
    }

    /// Compiles `uri` beneath the active group `prefixes`.
    ///
    /// A trailing literal token of `uri` equal to `directory_index` is dropped, so `/blog/index.php`
    /// compiles exactly like `/blog`.
    pub fn compile<S>(
        prefixes: &[S],
        uri: &str,
        directory_index: Option<&str>,
    ) -> Result<Self, TemplateError>
    where
        S: AsRef<str>,
    {
        let mut tokens: Vec<&str> = tokenize(uri).collect();

        if let (Some(index), Some(last)) = (directory_index, tokens.last()) {
            if *last == index {
                trace!(" dropping directory index `{}` from template `{}`", index, uri);
                tokens.pop();
            }
        }

        let segments = prefixes
            .iter()
            .flat_map(|p| tokenize(p.as_ref()))
            .chain(tokens)
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PathTemplate { segments })
    }

    /// The compiled segments, in path order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the root template `/`, which has no segments.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Alias for `is_root`.
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }
}

fn tokenize(uri: &str) -> impl Iterator<Item = &str> {
    uri.trim()
        .split('/')
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::template::segment::Constraint;

    fn names(template: &PathTemplate) -> Vec<String> {
        template.segments().iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn root_template_has_no_segments() {
        assert!(PathTemplate::parse("/").unwrap().is_root());
        assert!(PathTemplate::parse("").unwrap().is_root());
        assert_eq!(PathTemplate::parse("/").unwrap().to_string(), "/");
    }

    #[test]
    fn empty_tokens_are_skipped() {
        let template = PathTemplate::parse("//users///{id}/").unwrap();
        assert_eq!(names(&template), vec!["users", "{id}"]);
    }

    #[test]
    fn optional_variables_survive_directory_index_removal() {
        let template =
            PathTemplate::compile::<&str>(&[], "/posts/{slug?}", Some("index.php")).unwrap();
        assert_eq!(names(&template), vec!["posts", "{slug?}"]);

        let variable = template.segments()[1].variable().unwrap();
        assert!(variable.is_optional());
        assert_eq!(variable.constraint(), None);
    }

    #[test]
    fn directory_index_is_stripped() {
        let template =
            PathTemplate::compile::<&str>(&[], "/blog/index.php", Some("index.php")).unwrap();
        assert_eq!(names(&template), vec!["blog"]);

        let template = PathTemplate::compile::<&str>(&[], "/index.php", Some("index.php")).unwrap();
        assert!(template.is_root());

        let template = PathTemplate::compile::<&str>(&[], "/blog/index.php", None).unwrap();
        assert_eq!(names(&template), vec!["blog", "index.php"]);
    }

    #[test]
    fn prefixes_come_first() {
        let template =
            PathTemplate::compile(&["/admin", "{lang}/"], "/users/{id:int?}", None).unwrap();
        assert_eq!(names(&template), vec!["admin", "{lang}", "users", "{id:int?}"]);
        assert_eq!(
            template.segments()[3].variable().unwrap().constraint(),
            Some(Constraint::Int)
        );
    }

    #[test]
    fn prefix_applies_to_root_template() {
        let template = PathTemplate::compile(&["admin"], "/", None).unwrap();
        assert_eq!(names(&template), vec!["admin"]);
    }

    #[test]
    fn errors_are_reported() {
        assert!(PathTemplate::parse("/users/{}").is_err());
        assert!(PathTemplate::parse("/users/[").is_err());
    }
}
