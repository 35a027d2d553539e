/// AMP document validation
///
/// Validates fetched page HTML before it is trusted as an AMP document. The
/// full AMP validator is an external collaborator; `BasicAmpValidator` checks the
/// structural requirements every valid AMP page must satisfy.
use std::fmt;

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Overall validator verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    Pass,
    Fail,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Pass => write!(f, "PASS"),
            ValidationStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Validator verdict plus the errors behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        let status = if errors.is_empty() {
            ValidationStatus::Pass
        } else {
            ValidationStatus::Fail
        };
        Self { status, errors }
    }

    pub fn passed(&self) -> bool {
        self.status == ValidationStatus::Pass
    }
}

/// AMP HTML validator trait
pub trait AmpValidator: Send + Sync {
    /// Validate a complete HTML document
    fn validate_str(&self, html: &str) -> ValidationReport;
}

const AMP_RUNTIME_SRC: &str = "https://cdn.ampproject.org/v0.js";
const AMP_CDN_PREFIX: &str = "https://cdn.ampproject.org/";

/// Structural AMP checks
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicAmpValidator;

impl BasicAmpValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_html_tag(doc: &str, errors: &mut Vec<ValidationError>) {
        let Some(tag) = first_tag(doc, "html") else {
            errors.push(ValidationError::new("html", "Missing <html> tag"));
            return;
        };

        let is_amp = tag
            .split(|c: char| c.is_whitespace() || c == '>')
            .skip(1)
            .map(|attr| attr.split('=').next().unwrap_or(attr))
            .any(|name| name == "⚡" || name == "amp");

        if !is_amp {
            errors.push(ValidationError::new(
                "html",
                "The <html> tag is missing the mandatory ⚡ or amp attribute",
            ));
        }
    }

    fn check_head(doc: &str, errors: &mut Vec<ValidationError>) {
        let metas = all_tags(doc, "meta");
        if !metas.iter().any(|t| t.contains("charset=\"utf-8\"") || t.contains("charset=utf-8")) {
            errors.push(ValidationError::new(
                "head > meta[charset]",
                "Missing mandatory <meta charset=\"utf-8\"> tag",
            ));
        }
        if !metas.iter().any(|t| t.contains("name=\"viewport\"") || t.contains("name=viewport")) {
            errors.push(ValidationError::new(
                "head > meta[name=viewport]",
                "Missing mandatory viewport <meta> tag",
            ));
        }

        let links = all_tags(doc, "link");
        if !links.iter().any(|t| t.contains("rel=\"canonical\"") || t.contains("rel=canonical")) {
            errors.push(ValidationError::new(
                "head > link[rel=canonical]",
                "Missing mandatory canonical <link> tag",
            ));
        }

        let styles = all_tags(doc, "style");
        if !styles.iter().any(|t| t.contains("amp-boilerplate")) {
            errors.push(ValidationError::new(
                "head > style[amp-boilerplate]",
                "Missing mandatory amp-boilerplate <style> tag",
            ));
        }
    }

    fn check_scripts(doc: &str, errors: &mut Vec<ValidationError>) {
        let scripts = all_tags(doc, "script");

        if !scripts.iter().any(|t| t.contains(AMP_RUNTIME_SRC)) {
            errors.push(ValidationError::new(
                "head > script[src]",
                format!("Missing mandatory AMP runtime script {}", AMP_RUNTIME_SRC),
            ));
        }

        for tag in scripts {
            let is_data = tag.contains("application/ld+json") || tag.contains("application/json");
            let is_amp_cdn = tag.contains(&format!("src=\"{}", AMP_CDN_PREFIX))
                || tag.contains(&format!("src={}", AMP_CDN_PREFIX));
            if !is_data && !is_amp_cdn {
                errors.push(ValidationError::new(
                    "script",
                    format!("Custom JavaScript is not allowed: {}", tag),
                ));
            }
        }
    }
}

impl AmpValidator for BasicAmpValidator {
    fn validate_str(&self, html: &str) -> ValidationReport {
        let doc = html.to_lowercase();
        let mut errors = Vec::new();

        Self::check_html_tag(&doc, &mut errors);
        Self::check_head(&doc, &mut errors);
        Self::check_scripts(&doc, &mut errors);

        ValidationReport::from_errors(errors)
    }
}

fn first_tag<'a>(doc: &'a str, name: &str) -> Option<&'a str> {
    all_tags(doc, name).into_iter().next()
}

/// Opening tags named `name`, from `<` through the closing `>`
fn all_tags<'a>(doc: &'a str, name: &str) -> Vec<&'a str> {
    let needle = format!("<{}", name);
    let mut tags = Vec::new();
    let mut offset = 0;

    while let Some(pos) = doc[offset..].find(&needle) {
        let start = offset + pos;
        let after_name = start + needle.len();
        // Skip longer tag names sharing the prefix, e.g. <header> for <head
        let boundary = doc[after_name..]
            .chars()
            .next()
            .map_or(true, |c| c.is_whitespace() || c == '>' || c == '/');
        let end = doc[start..].find('>').map_or(doc.len(), |e| start + e + 1);

        if boundary {
            tags.push(&doc[start..end]);
        }
        offset = end.max(after_name);
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_AMP: &str = r#"<!doctype html>
<html ⚡ lang="en">
  <head>
    <meta charset="utf-8">
    <script async src="https://cdn.ampproject.org/v0.js"></script>
    <title>Hello, AMPs</title>
    <link rel="canonical" href="https://amp.dev/documentation/guides-and-tutorials/start/create/basic_markup/">
    <meta name="viewport" content="width=device-width">
    <script type="application/ld+json">{"@context": "http://schema.org"}</script>
    <style amp-boilerplate>body{visibility:hidden}</style>
  </head>
  <body>
    <h1>Welcome to the mobile web</h1>
  </body>
</html>"#;

    #[test]
    fn test_valid_document_passes() {
        let report = BasicAmpValidator::new().validate_str(VALID_AMP);
        assert!(report.passed(), "unexpected errors: {:?}", report.errors);
        assert_eq!(report.status.to_string(), "PASS");
    }

    #[test]
    fn test_amp_attribute_variant_passes() {
        let html = VALID_AMP.replace("<html ⚡ lang=\"en\">", "<html amp lang=\"en\">");
        assert!(BasicAmpValidator::new().validate_str(&html).passed());
    }

    #[test]
    fn test_plain_html_fails_with_errors() {
        let html = "<html><head><title>x</title></head><body></body></html>";
        let report = BasicAmpValidator::new().validate_str(html);

        assert_eq!(report.status, ValidationStatus::Fail);
        let paths: Vec<&str> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"html"));
        assert!(paths.contains(&"head > meta[charset]"));
        assert!(paths.contains(&"head > link[rel=canonical]"));
        assert!(paths.contains(&"head > script[src]"));
    }

    #[test]
    fn test_custom_script_rejected() {
        let html = VALID_AMP.replace(
            "</body>",
            "<script src=\"https://example.com/app.js\"></script></body>",
        );
        let report = BasicAmpValidator::new().validate_str(&html);

        assert!(!report.passed());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.starts_with("Custom JavaScript is not allowed"));
    }

    #[test]
    fn test_head_prefix_does_not_match_header() {
        let tags = all_tags("<header class=\"x\"><head><meta charset=\"utf-8\">", "head");
        assert_eq!(tags, vec!["<head>"]);
    }

    #[test]
    fn test_missing_html_tag() {
        let report = BasicAmpValidator::new().validate_str("just text");
        assert!(report.errors.iter().any(|e| e.message == "Missing <html> tag"));
    }
}
