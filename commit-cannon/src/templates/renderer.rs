//! Template renderer.

use super::{TemplateError, DEFAULT_BODY_TEMPLATE};
use handlebars::{no_escape, Handlebars, Template};
use serde::Serialize;

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Disable HTML escaping for markdown output
    hbs.register_escape_fn(no_escape);

    // Enable strict mode to catch missing variables
    hbs.set_strict_mode(true);

    hbs
}

/// Variables available to PR body templates.
#[derive(Debug, Clone, Serialize)]
pub struct PrBodyContext<'a> {
    /// Batch description.
    pub description: &'a str,

    /// Result strings of the applied actions, in order.
    pub results: &'a [String],

    /// Repository full name.
    pub repository: &'a str,

    /// Head branch of the PR.
    pub branch: &'a str,

    /// PR title.
    pub title: &'a str,
}

/// Renderer for PR descriptions.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Checks that `template` compiles.
    ///
    /// # Errors
    ///
    /// Returns an error describing the syntax problem.
    pub fn check(template: &str) -> Result<(), TemplateError> {
        Template::compile(template)?;
        Ok(())
    }

    /// Renders a PR body, using [`DEFAULT_BODY_TEMPLATE`] when `template` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_pr_body(
        &self,
        template: Option<&str>,
        context: &PrBodyContext<'_>,
    ) -> Result<String, TemplateError> {
        let template = template.unwrap_or(DEFAULT_BODY_TEMPLATE);
        Ok(self.handlebars.render_template(template, context)?)
    }
}
