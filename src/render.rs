//! Plain-text rendering of candidates, the status panel, and result cards.

use minijinja::{Environment, context};
use serde::Serialize;
use thiserror::Error;

use crate::address::domain::{AddressCandidate, Postcode};
use crate::pipeline::domain::{CollectedResults, StatusMap, TaskStatus};

const CANDIDATES: &str = "candidates.txt";
const STATUS_PANEL: &str = "status_panel.txt";
const RESULT_CARDS: &str = "result_cards.txt";

const CANDIDATES_TEMPLATE: &str = "\
{% if candidates %}Addresses for {{ postcode }}:
{% for candidate in candidates %}  {{ loop.index }}. {{ candidate }}
{% endfor %}{% else %}No addresses found for {{ postcode }}.
{% endif %}";

const STATUS_PANEL_TEMPLATE: &str = "\
API status
{% for row in rows %}  {{ row.marker }} {{ row.label }} {{ row.status }}
{% endfor %}";

const RESULT_CARDS_TEMPLATE: &str = "\
{% for card in cards %}== {{ card.title }} ==
{{ card.body }}

{% endfor %}";

/// Errors raised while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A template failed to compile or render.
    #[error("failed to render {template}: {source}")]
    Template {
        /// Template name.
        template: &'static str,
        /// Underlying template error.
        source: minijinja::Error,
    },
    /// A result payload could not be pretty-printed.
    #[error("failed to format result {task}: {source}")]
    Payload {
        /// Task whose payload failed.
        task: String,
        /// Underlying serialization error.
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize)]
struct PanelRow<'a> {
    marker: &'static str,
    label: String,
    status: &'a str,
}

#[derive(Debug, Serialize)]
struct Card<'a> {
    title: &'a str,
    body: String,
}

/// Marker shown beside a status in the panel.
#[must_use]
pub const fn status_marker(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Success => "✓",
        TaskStatus::Error => "✗",
        TaskStatus::Pending | TaskStatus::Loading => "…",
    }
}

/// Template-backed text renderer.
#[derive(Debug)]
pub struct Renderer {
    environment: Environment<'static>,
}

impl Renderer {
    /// Compiles the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] if a template does not compile.
    pub fn new() -> Result<Self, RenderError> {
        let mut environment = Environment::new();
        for (name, source) in [
            (CANDIDATES, CANDIDATES_TEMPLATE),
            (STATUS_PANEL, STATUS_PANEL_TEMPLATE),
            (RESULT_CARDS, RESULT_CARDS_TEMPLATE),
        ] {
            environment
                .add_template(name, source)
                .map_err(|source| RenderError::Template {
                    template: name,
                    source,
                })?;
        }
        Ok(Self { environment })
    }

    /// Renders the numbered candidate list for `postcode`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] on template failure.
    pub fn candidates(
        &self,
        postcode: &Postcode,
        candidates: &[AddressCandidate],
    ) -> Result<String, RenderError> {
        let names: Vec<&str> = candidates.iter().map(AddressCandidate::as_str).collect();
        self.render(
            CANDIDATES,
            context! { postcode => postcode.as_str(), candidates => names },
        )
    }

    /// Renders one row per task; an empty map renders nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] on template failure.
    pub fn status_panel(&self, statuses: &StatusMap) -> Result<String, RenderError> {
        if statuses.is_empty() {
            return Ok(String::new());
        }
        let width = statuses
            .names()
            .map(|name| name.as_str().chars().count())
            .max()
            .unwrap_or_default();
        let rows: Vec<PanelRow<'_>> = statuses
            .iter()
            .map(|(name, status)| PanelRow {
                marker: status_marker(status),
                label: format!("{:<width$}", name.as_str()),
                status: status.as_str(),
            })
            .collect();
        self.render(STATUS_PANEL, context! { rows => rows })
    }

    /// Renders a card per collected result with its payload pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] on template or formatting failure.
    pub fn result_cards(&self, results: &CollectedResults) -> Result<String, RenderError> {
        let cards = results
            .iter()
            .map(|(name, payload)| {
                serde_json::to_string_pretty(payload)
                    .map(|body| Card {
                        title: name.as_str(),
                        body,
                    })
                    .map_err(|source| RenderError::Payload {
                        task: name.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.render(RESULT_CARDS, context! { cards => cards })
    }

    fn render(
        &self,
        template: &'static str,
        ctx: minijinja::Value,
    ) -> Result<String, RenderError> {
        self.environment
            .get_template(template)
            .and_then(|compiled| compiled.render(ctx))
            .map_err(|source| RenderError::Template { template, source })
    }
}
