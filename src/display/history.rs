use serde::Serialize;

use crate::core::Locale;
use crate::table::{ActionKind, ActionRecord};

/// One line of the action history panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub actor: String,
    pub label: String,
    pub amount: Option<u64>,
    pub detail: Option<String>,
}

/// History lines for the panel. Reveals are shown on the seats instead, so
/// they are left out here.
pub fn history_entries(log: &[ActionRecord], locale: Locale) -> Vec<HistoryEntry> {
    log.iter()
        .filter(|r| r.action != ActionKind::HandReveal)
        .map(|r| HistoryEntry {
            actor: r.actor_name.clone().unwrap_or_else(|| "System".to_string()),
            label: action_text(&r.action, locale),
            amount: r.amount.filter(|a| *a > 0),
            detail: r.detail.as_deref().map(|d| detail_text(d, locale)),
        })
        .collect()
}

fn action_text(kind: &ActionKind, locale: Locale) -> String {
    match (kind, locale) {
        (ActionKind::Refund, Locale::Japanese) => "返却".to_string(),
        (kind, Locale::Japanese) => kind.wire_name(),
        (kind, Locale::English) => kind.label().to_string(),
    }
}

fn detail_text(detail: &str, locale: Locale) -> String {
    match (detail, locale) {
        ("uncalled", Locale::Japanese) => "未コール分".to_string(),
        ("uncalled", Locale::English) => "uncalled bet".to_string(),
        (other, _) => other.to_string(),
    }
}
