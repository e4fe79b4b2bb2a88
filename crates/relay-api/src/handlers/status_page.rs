//! HTML status page.

use axum::{extract::State, response::Html};
use relay_models::TrackedEntity;
use tracing::warn;

use crate::state::AppState;

/// GET / - human-readable overview of tracked databases and triggers.
pub async fn status_page(State(state): State<AppState>) -> Html<String> {
    let entities = match state.registry.list_tracked_entities().await {
        Ok(entities) => entities,
        Err(e) => {
            warn!(error = %e, "Status page could not list entities");
            return Html(render_page(
                "<p class=\"error\">Could not reach the entity registry.</p>".to_string(),
            ));
        }
    };

    let mut rows = String::new();
    for entity in &entities {
        rows.push_str(&render_row(state.clone(), entity).await);
    }

    let body = format!(
        "<table>\n<tr><th>Database</th><th>Repository</th><th>Trigger</th></tr>\n{rows}</table>"
    );
    Html(render_page(body))
}

/// Renders one table row for an entity.
async fn render_row(state: AppState, entity: &TrackedEntity) -> String {
    let repo = entity
        .dispatch_target
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "(none)".to_string());

    let trigger = match state.coordinator.trigger_state(&entity.id).await {
        Some(record) if record.pending => format!("pending (fires at {} ms)", record.next_trigger_time),
        _ => "idle".to_string(),
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        escape(&entity.title),
        escape(&repo),
        trigger
    )
}

/// Wraps page body in the shared shell.
fn render_page(body: String) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Relay</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; margin: 2rem; }}\n\
         table {{ border-collapse: collapse; }}\n\
         td, th {{ border: 1px solid #ccc; padding: 0.4rem 0.8rem; text-align: left; }}\n\
         .error {{ color: #b00; }}\n\
         </style>\n</head>\n<body>\n<h1>Relay</h1>\n{body}\n</body>\n</html>"
    )
}

/// Minimal HTML escaping for text cells.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&c"), "a&lt;b&gt;&amp;c");
    }

    #[test]
    fn test_render_page_shell() {
        let page = render_page("<p>hi</p>".to_string());
        assert!(page.contains("<title>Relay</title>"));
        assert!(page.contains("<p>hi</p>"));
    }
}
