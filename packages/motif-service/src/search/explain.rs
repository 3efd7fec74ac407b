use std::collections::HashSet;

use super::MatchHighlights;
use motif_domain::{Pattern, Requirements, text};

/// Predicate plus bonus. Rules are evaluated in order and every applicable bonus is added.
pub struct BoostRule {
	pub name: &'static str,
	pub bonus: f32,
	/// Rules that read pattern metadata are skipped when it is missing.
	pub needs_metadata: bool,
	pub applies: fn(&MatchContext<'_>) -> bool,
}

pub struct MatchContext<'a> {
	pub requirements: &'a Requirements,
	pub pattern: &'a Pattern,
	pub highlights: &'a MatchHighlights,
}

pub const BOOST_RULES: [BoostRule; 4] = [
	BoostRule {
		name: "category_match",
		bonus: 0.10,
		needs_metadata: false,
		applies: |ctx| ctx.pattern.category_matches(&ctx.requirements.component_type),
	},
	BoostRule {
		name: "props_coverage",
		bonus: 0.05,
		needs_metadata: true,
		applies: |ctx| majority(ctx.highlights.matched_props.len(), &ctx.requirements.props),
	},
	BoostRule {
		name: "variants_coverage",
		bonus: 0.05,
		needs_metadata: true,
		applies: |ctx| majority(ctx.highlights.matched_variants.len(), &ctx.requirements.variants),
	},
	BoostRule {
		name: "a11y_present",
		bonus: 0.05,
		needs_metadata: true,
		applies: |ctx| !ctx.highlights.matched_a11y.is_empty(),
	},
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfidenceBand {
	High,
	Good,
	Fair,
	Weak,
}
impl ConfidenceBand {
	pub fn from_confidence(confidence: f32) -> Self {
		if confidence >= 0.9 {
			Self::High
		} else if confidence >= 0.7 {
			Self::Good
		} else if confidence >= 0.5 {
			Self::Fair
		} else {
			Self::Weak
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::High => "High",
			Self::Good => "Good",
			Self::Fair => "Fair",
			Self::Weak => "Weak",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Explanation {
	pub confidence: f32,
	pub text: String,
	pub highlights: MatchHighlights,
	pub applied_boosts: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
	#[error("Pattern {pattern_id} has no metadata.")]
	MissingMetadata { pattern_id: String },
	#[error("Pattern {pattern_id} has a non-finite final score.")]
	NonFiniteScore { pattern_id: String },
}

/// Full explanation: matched highlights, boosted confidence, and a sentence citing the matches.
pub fn explain(
	requirements: &Requirements,
	pattern: &Pattern,
	final_score: f32,
) -> Result<Explanation, ExplainError> {
	if !final_score.is_finite() {
		return Err(ExplainError::NonFiniteScore { pattern_id: pattern.id.clone() });
	}
	if pattern.metadata.is_none() {
		return Err(ExplainError::MissingMetadata { pattern_id: pattern.id.clone() });
	}

	let highlights = MatchHighlights {
		matched_props: text::match_terms(&requirements.props, pattern.props()),
		matched_variants: text::match_terms(&requirements.variants, pattern.variants()),
		matched_a11y: text::match_terms(&requirements.a11y, pattern.a11y()),
	};
	let ctx = MatchContext { requirements, pattern, highlights: &highlights };
	let (boost, applied_boosts) = apply_rules(&ctx, true);
	let confidence = (final_score.clamp(0.0, 1.0) + boost).min(1.0);
	let band = ConfidenceBand::from_confidence(confidence);
	let mut clauses = vec![category_clause(requirements, pattern)];

	for (label, requested, matched) in [
		("props", &requirements.props, &highlights.matched_props),
		("variants", &requirements.variants, &highlights.matched_variants),
		("accessibility", &requirements.a11y, &highlights.matched_a11y),
	] {
		let requested = distinct_count(requested);

		if requested == 0 {
			continue;
		}

		let mut clause = format!("{label} {}/{requested} matched", matched.len());

		if !matched.is_empty() {
			clause.push_str(&format!(" ({})", matched.join(", ")));
		}

		clauses.push(clause);
	}

	let text = format!(
		"{} match (confidence {confidence:.2}) for {}: {}.",
		band.label(),
		pattern.name,
		clauses.join("; ")
	);

	Ok(Explanation { confidence, text, highlights, applied_boosts })
}

/// Low-detail explanation used when [`explain`] fails: band and score only.
///
/// Rules that need metadata are skipped; the category rule still applies.
pub fn explain_basic(
	requirements: &Requirements,
	pattern: &Pattern,
	final_score: f32,
) -> Explanation {
	let highlights = MatchHighlights::default();
	let ctx = MatchContext { requirements, pattern, highlights: &highlights };
	let (boost, applied_boosts) = apply_rules(&ctx, false);
	let base = if final_score.is_finite() { final_score.clamp(0.0, 1.0) } else { 0.0 };
	let confidence = (base + boost).min(1.0);
	let band = ConfidenceBand::from_confidence(confidence);
	let text = format!(
		"{} match (confidence {confidence:.2}) for {}. Match details are unavailable.",
		band.label(),
		pattern.name
	);

	Explanation { confidence, text, highlights, applied_boosts }
}

pub fn explain_or_fallback(
	requirements: &Requirements,
	pattern: &Pattern,
	final_score: f32,
) -> Explanation {
	explain(requirements, pattern, final_score).unwrap_or_else(|err| {
		tracing::warn!(
			error = %err,
			pattern_id = %pattern.id,
			"Explanation failed. Falling back to a basic explanation."
		);

		explain_basic(requirements, pattern, final_score)
	})
}

fn apply_rules(ctx: &MatchContext<'_>, has_metadata: bool) -> (f32, Vec<String>) {
	let mut boost = 0.0;
	let mut applied = Vec::new();

	for rule in &BOOST_RULES {
		if rule.needs_metadata && !has_metadata {
			continue;
		}
		if (rule.applies)(ctx) {
			boost += rule.bonus;

			applied.push(rule.name.to_string());
		}
	}

	(boost, applied)
}

fn category_clause(requirements: &Requirements, pattern: &Pattern) -> String {
	let requested = requirements.component_type.trim();

	if pattern.category_matches(requested) {
		format!("category {} matches", pattern.category)
	} else {
		format!("category {} differs from requested {requested}", pattern.category)
	}
}

fn majority(matched: usize, requested: &[String]) -> bool {
	let requested = distinct_count(requested);

	requested > 0 && matched as f32 / requested as f32 > 0.5
}

fn distinct_count(terms: &[String]) -> usize {
	terms.iter().map(|term| text::normalize_term(term)).collect::<HashSet<_>>().len()
}
