use std::collections::HashSet;

use crate::Result;
use motif_domain::{Requirements, text};

/// Query derived from one set of requirements, in the two shapes the retrievers need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
	/// Natural-language rendering fed to the embedding provider.
	pub text: String,
	/// Deduplicated lexical tokens in first-seen order.
	pub terms: Vec<String>,
}

/// Renders requirements as `"<type> component with props: a, b; variants: x; accessibility: y"`.
///
/// Empty sections are omitted. Events and states only feed the lexical terms.
pub fn build_query(requirements: &Requirements) -> Result<Query> {
	requirements.validate()?;

	let component_type = requirements.component_type.trim();
	let mut text = format!("{component_type} component");
	let sections: Vec<String> = [
		("props", &requirements.props),
		("variants", &requirements.variants),
		("accessibility", &requirements.a11y),
	]
	.into_iter()
	.filter(|(_, terms)| !terms.is_empty())
	.map(|(label, terms)| format!("{label}: {}", terms.join(", ")))
	.collect();

	if !sections.is_empty() {
		text.push_str(" with ");
		text.push_str(&sections.join("; "));
	}

	let mut terms = Vec::new();
	let mut seen = HashSet::new();

	text::push_tokens(&mut terms, &mut seen, component_type);

	for list in [
		&requirements.props,
		&requirements.variants,
		&requirements.a11y,
		&requirements.events,
		&requirements.states,
	] {
		for term in list {
			text::push_tokens(&mut terms, &mut seen, term);
		}
	}

	Ok(Query { text, terms })
}
