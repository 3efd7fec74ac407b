use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result, text};

const LIST_FIELDS: [&str; 5] = ["props", "variants", "events", "states", "a11y"];

/// What the caller needs from a component. Read-only for the lifetime of a request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Requirements {
	pub component_type: String,
	pub props: Vec<String>,
	pub variants: Vec<String>,
	pub events: Vec<String>,
	pub states: Vec<String>,
	pub a11y: Vec<String>,
}
impl Requirements {
	pub fn new(component_type: impl Into<String>) -> Self {
		Self { component_type: component_type.into(), ..Default::default() }
	}

	pub fn with_props<I, S>(mut self, props: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.props = props.into_iter().map(Into::into).collect();

		self
	}

	pub fn with_variants<I, S>(mut self, variants: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.variants = variants.into_iter().map(Into::into).collect();

		self
	}

	pub fn with_a11y<I, S>(mut self, a11y: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.a11y = a11y.into_iter().map(Into::into).collect();

		self
	}

	pub fn with_events<I, S>(mut self, events: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.events = events.into_iter().map(Into::into).collect();

		self
	}

	pub fn with_states<I, S>(mut self, states: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.states = states.into_iter().map(Into::into).collect();

		self
	}

	pub fn validate(&self) -> Result<()> {
		if self.component_type.trim().is_empty() {
			return Err(Error::requirements("component_type", "must be a non-empty string."));
		}

		Ok(())
	}

	/// Coerces a loosely-typed payload into strict requirements.
	///
	/// List fields accept an array of strings, a comma-separated string, or null.
	pub fn from_value(value: &Value) -> Result<Self> {
		let Some(object) = value.as_object() else {
			return Err(Error::requirements("requirements", "must be a JSON object."));
		};
		let raw_type = object.get("component_type").or_else(|| object.get("componentType"));
		let component_type = match raw_type {
			Some(Value::String(raw)) if !raw.trim().is_empty() => raw.trim().to_string(),
			Some(Value::String(_)) | Some(Value::Null) | None =>
				return Err(Error::requirements("component_type", "must be a non-empty string.")),
			Some(_) => return Err(Error::requirements("component_type", "must be a string.")),
		};
		let [props, variants, events, states, a11y] =
			LIST_FIELDS.map(|field| coerce_list(object, field));

		Ok(Self {
			component_type,
			props: props?,
			variants: variants?,
			events: events?,
			states: states?,
			a11y: a11y?,
		})
	}
}
impl TryFrom<Value> for Requirements {
	type Error = Error;

	fn try_from(value: Value) -> Result<Self> {
		Self::from_value(&value)
	}
}

fn coerce_list(object: &Map<String, Value>, field: &str) -> Result<Vec<String>> {
	let raw: Vec<&str> = match object.get(field) {
		None | Some(Value::Null) => return Ok(Vec::new()),
		Some(Value::String(text)) => text.split(',').collect(),
		Some(Value::Array(items)) => {
			let mut out = Vec::with_capacity(items.len());

			for item in items {
				let Some(text) = item.as_str() else {
					return Err(Error::requirements(field, "must contain only strings."));
				};

				out.push(text);
			}

			out
		},
		Some(_) =>
			return Err(Error::requirements(
				field,
				"must be an array of strings or a comma-separated string.",
			)),
	};

	Ok(clean_terms(raw))
}

fn clean_terms(raw: Vec<&str>) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for term in raw {
		let trimmed = term.trim();

		if trimmed.is_empty() {
			continue;
		}
		if seen.insert(text::normalize_term(trimmed)) {
			out.push(trimmed.to_string());
		}
	}

	out
}
