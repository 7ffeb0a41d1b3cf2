//! Pull request description rendering using Handlebars.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, PrBodyContext, TemplateRenderer};

/// Default PR body: the batch description followed by one bullet per applied action.
pub const DEFAULT_BODY_TEMPLATE: &str = "{{#if description}}{{description}}

{{/if}}Changes applied by commit-cannon:
{{#each results}}  * {{this}}
{{/each}}";
