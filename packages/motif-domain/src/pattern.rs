use serde::{Deserialize, Serialize};

use crate::text;

/// A pre-built component template. Immutable once loaded into an index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
	pub id: String,
	pub name: String,
	#[serde(alias = "component_type")]
	pub category: String,
	#[serde(default)]
	pub framework: String,
	#[serde(default)]
	pub library: String,
	/// Opaque payload handed to code generation untouched.
	#[serde(default)]
	pub code: String,
	/// `None` for malformed records. Such patterns stay searchable but only get a low-detail
	/// explanation.
	#[serde(default)]
	pub metadata: Option<PatternMetadata>,
}
impl Pattern {
	pub fn category_matches(&self, component_type: &str) -> bool {
		text::terms_equal(&self.category, component_type)
	}

	pub fn props(&self) -> &[String] {
		self.metadata.as_ref().map(|meta| meta.props.as_slice()).unwrap_or_default()
	}

	pub fn variants(&self) -> &[String] {
		self.metadata.as_ref().map(|meta| meta.variants.as_slice()).unwrap_or_default()
	}

	pub fn a11y(&self) -> &[String] {
		self.metadata.as_ref().map(|meta| meta.a11y.as_slice()).unwrap_or_default()
	}

	pub fn description(&self) -> &str {
		self.metadata.as_ref().map(|meta| meta.description.as_str()).unwrap_or_default()
	}

	/// Text embedded at index build time. Mirrors the shape of query text so both land in the
	/// same region of the embedding space.
	pub fn embedding_text(&self) -> String {
		let mut out = format!("{} component", self.name.trim());

		if !text::terms_equal(&self.name, &self.category) {
			out.push_str(&format!(" ({})", self.category.trim()));
		}

		let mut sections = Vec::new();

		for (label, terms) in
			[("props", self.props()), ("variants", self.variants()), ("accessibility", self.a11y())]
		{
			if !terms.is_empty() {
				sections.push(format!("{label}: {}", terms.join(", ")));
			}
		}

		if !sections.is_empty() {
			out.push_str(" with ");
			out.push_str(&sections.join("; "));
		}

		let description = self.description().trim();

		if !description.is_empty() {
			out.push_str(". ");
			out.push_str(description);
		}

		out
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternMetadata {
	#[serde(default)]
	pub props: Vec<String>,
	#[serde(default)]
	pub variants: Vec<String>,
	#[serde(default)]
	pub a11y: Vec<String>,
	#[serde(default)]
	pub description: String,
}
