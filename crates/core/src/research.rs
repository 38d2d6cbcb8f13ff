use crate::api::BuildApi;
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSection {
    pub text: String,
    #[serde(rename = "graph-data", alias = "graph_data", default)]
    pub graph_data: Vec<f64>,
}

/// Market research result as the build page shows it: the raw model text,
/// plus the structured sections when the text parses.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResearchView {
    pub error: bool,
    pub raw: Option<String>,
    pub sections: Vec<ResearchSection>,
}

pub fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        // Remove Markdown fences (```json ... ``` or ``` ... ```), on one
        // line or several.
        let mut inner = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        return Some(inner.trim().to_string());
    }

    // Best-effort extraction: the outermost array or object, whichever
    // opens first.
    let start = trimmed.find(['[', '{'])?;
    let close = if trimmed[start..].starts_with('[') { ']' } else { '}' };
    let end = trimmed.rfind(close)?;
    (start < end).then(|| trimmed[start..=end].trim().to_string())
}

/// Sections from the model output. A lone object is accepted as one section.
pub fn parse_research_sections(text: &str) -> anyhow::Result<Vec<ResearchSection>> {
    let json_str = extract_json(text).unwrap_or_else(|| text.trim().to_string());

    if let Ok(sections) = serde_json::from_str::<Vec<ResearchSection>>(&json_str) {
        return Ok(sections);
    }
    let single = serde_json::from_str::<ResearchSection>(&json_str)
        .with_context(|| format!("research output is not valid section JSON: {json_str}"))?;
    Ok(vec![single])
}

/// Runs one research query. Blank input leaves the view untouched.
pub async fn research(api: &dyn BuildApi, view: &mut ResearchView, input: &str) {
    let input = input.trim();
    if input.is_empty() {
        return;
    }

    let result = api.market_research(input).await;

    let mut next = ResearchView::default();
    match result {
        Ok(raw) => {
            match parse_research_sections(&raw) {
                Ok(sections) => next.sections = sections,
                Err(err) => {
                    tracing::warn!(error = %err, "market research output unstructured; showing raw text");
                }
            }
            next.raw = Some(raw);
        }
        Err(err) => {
            tracing::error!(error = %err, "market research request failed");
            next.error = true;
        }
    }
    *view = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBuildApi;
    use std::sync::atomic::Ordering;

    #[test]
    fn extract_json_handles_fenced_blocks() {
        let body = r#"[{"text":"a","graph-data":[1]}]"#;
        let fenced = format!("```json\n{body}\n```\n");
        assert_eq!(extract_json(&fenced), Some(body.to_string()));
    }

    #[test]
    fn extract_json_handles_single_line_fences() {
        let body = r#"[{"text":"a","graph-data":[1]}]"#;
        assert_eq!(extract_json(&format!("```json{body}```")), Some(body.to_string()));
        assert_eq!(extract_json(&format!("```{body}```")), Some(body.to_string()));
    }

    #[test]
    fn extract_json_takes_whichever_opens_first() {
        let s = r#"Here you go: [{"text":"a"}] thanks"#;
        assert_eq!(extract_json(s), Some(r#"[{"text":"a"}]"#.to_string()));
        assert_eq!(extract_json("x {\"a\":1} y"), Some("{\"a\":1}".to_string()));
        assert_eq!(
            extract_json(r#"Result: {"text":"t","graph-data":[1,2]}."#),
            Some(r#"{"text":"t","graph-data":[1,2]}"#.to_string())
        );
        assert_eq!(extract_json("no json"), None);
    }

    #[test]
    fn parses_sections_with_graph_data() {
        let raw = "```json\n[\n {\"text\": \"Target audience: urban commuters\", \"graph-data\": [10, 20.5, 30]},\n {\"text\": \"Risks\", \"graph-data\": []}\n]\n```";
        let sections = parse_research_sections(raw).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].graph_data, vec![10.0, 20.5, 30.0]);
        assert!(sections[1].graph_data.is_empty());
    }

    #[test]
    fn single_object_is_one_section() {
        let sections = parse_research_sections(r#"{"text":"only"}"#).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].text, "only");

        let sections = parse_research_sections(r#"{"text":"only","graph-data":[1,2]}"#).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].graph_data, vec![1.0, 2.0]);
    }

    #[test]
    fn prose_is_rejected() {
        assert!(parse_research_sections("The market is large.").is_err());
    }

    #[tokio::test]
    async fn blank_query_makes_no_request() {
        let api = FakeBuildApi::default();
        let mut view = ResearchView::default();
        research(&api, &mut view, "  ").await;
        assert_eq!(api.research_calls.load(Ordering::SeqCst), 0);
        assert!(view.raw.is_none());
    }

    #[tokio::test]
    async fn unstructured_result_keeps_raw_text() {
        let api = FakeBuildApi {
            research_reply: Some("Tea is popular.".to_string()),
            ..Default::default()
        };
        let mut view = ResearchView::default();
        research(&api, &mut view, "tea delivery").await;
        assert!(!view.error);
        assert_eq!(view.raw.as_deref(), Some("Tea is popular."));
        assert!(view.sections.is_empty());
    }

    #[tokio::test]
    async fn failure_replaces_previous_result_with_error_flag() {
        let api = FakeBuildApi::failing();
        let mut view = ResearchView {
            raw: Some("old".to_string()),
            ..Default::default()
        };
        research(&api, &mut view, "tea delivery").await;
        assert!(view.error);
        assert!(view.raw.is_none());
        assert_eq!(api.research_calls.load(Ordering::SeqCst), 1);
    }
}
