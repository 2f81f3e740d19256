//! Insight formatting
//!
//! Two paths to insight text: a deterministic template that is always
//! available, and AI generation through a [`TextGenClient`](crate::ai::TextGenClient)
//! that silently falls back to the template when the collaborator is absent
//! or failing. Callers never see a collaborator error.

mod formatter;
mod template;

pub use formatter::{Insight, InsightFormatter, InsightSource};
pub use template::{build_prompt, render_template};
