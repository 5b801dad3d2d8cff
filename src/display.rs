//! # Display Module
//!
//! Renders the prompt segment: one template execution per tool, in tool-name
//! order, concatenated.
//!
//! Templates use minijinja syntax. The context exposes `tool`, `tool_icon`,
//! `is_installed`, `resolved_version`, `is_latest`, `is_outdated`,
//! `config_version`, `newest_version` and `latest_version`; the callable
//! functions are `eq`, `ne`, `fg_color`, `bg_color` and `reset`.

use minijinja::{Environment, Value};
use serde::Serialize;
use tracing::debug;

use crate::colors::{self, RESET};
use crate::models::{Config, OutdatedMap, OutdatedStatus, StatusMap, ToolStatus, ToolStyle};

/// Template used when the config leaves `template` empty
pub const DEFAULT_TEMPLATE: &str = concat!(
    "{{ tool_icon }} ",
    "{% if is_installed %}",
    "{% if eq(resolved_version, newest_version) %}{{ fg_color(\"#1c5f2a\") }}",
    "{% elif is_outdated %}{{ fg_color(\"#8b6914\") }}",
    "{% else %}{{ fg_color(\"#1c5f2a\") }}{% endif %}",
    " {{ resolved_version }} {{ reset() }}",
    "{% else %}{{ fg_color(\"red\") }} Missing {{ reset() }}{% endif %}",
);

/// Per-tool values handed to the template
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ToolContext<'a> {
    pub tool: &'a str,
    pub tool_icon: String,
    pub is_installed: bool,
    pub resolved_version: &'a str,
    pub is_latest: bool,
    pub is_outdated: bool,
    pub config_version: &'a str,
    pub newest_version: &'a str,
    pub latest_version: &'a str,
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

impl<'a> ToolContext<'a> {
    pub fn new(
        tool: &'a str,
        status: &'a ToolStatus,
        outdated: Option<&'a OutdatedStatus>,
        style: Option<&ToolStyle>,
    ) -> Self {
        let resolved = status.resolved_version.as_deref().unwrap_or("");
        let newest = outdated
            .and_then(|o| non_empty(&o.newest_version))
            .unwrap_or(resolved);
        let latest = outdated
            .and_then(|o| non_empty(&o.latest_version))
            .unwrap_or(resolved);

        Self {
            tool,
            tool_icon: tool_icon(tool, style),
            is_installed: status.is_installed,
            resolved_version: resolved,
            is_latest: outdated.is_some_and(|o| o.is_latest),
            is_outdated: outdated.is_some_and(|o| o.is_outdated),
            config_version: status.config_version.as_deref().unwrap_or(""),
            newest_version: newest,
            latest_version: latest,
        }
    }
}

/// Colored glyph from the tool's style, or the bare tool name without one
pub fn tool_icon(tool: &str, style: Option<&ToolStyle>) -> String {
    match style {
        Some(style) => format!(
            "{}{}{}",
            colors::fg_color(&style.color),
            colors::decode_unicode_hex(&style.icon),
            RESET
        ),
        None => tool.to_string(),
    }
}

fn template_env<'s>() -> Environment<'s> {
    let mut env = Environment::new();
    env.add_function("eq", |a: Value, b: Value| a == b);
    env.add_function("ne", |a: Value, b: Value| a != b);
    env.add_function("fg_color", |color: String| colors::fg_color(&color));
    env.add_function("bg_color", |color: String| colors::bg_color(&color));
    env.add_function("reset", || RESET.to_string());
    env
}

/// Render every tool through the configured template.
///
/// A template that fails to compile yields an empty string; a tool whose
/// render fails is left out. Only trailing spaces are trimmed.
pub fn render(tools: &StatusMap, outdated: &OutdatedMap, config: &Config) -> String {
    let source = if config.template.is_empty() {
        DEFAULT_TEMPLATE
    } else {
        config.template.as_str()
    };

    let env = template_env();
    let template = match env.template_from_str(source) {
        Ok(t) => t,
        Err(err) => {
            debug!("template compile failed: {err}");
            return String::new();
        }
    };

    let mut formatted = String::new();
    // StatusMap is ordered by tool name
    for (tool, status) in tools {
        let ctx = ToolContext::new(tool, status, outdated.get(tool), config.tools.get(tool));
        match template.render(&ctx) {
            Ok(out) => formatted.push_str(&out),
            Err(err) => debug!(tool = %tool, "template render failed: {err}"),
        }
    }

    formatted.trim_end_matches(' ').to_string()
}
