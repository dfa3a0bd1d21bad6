//! Queue display helpers shared by the live monitor and the staff queue.

use crate::net::types::{LiveQueue, Token, TokenStatus};

/// Tokens a queue board shows: every waiting token in order, then the first
/// called token (the one being served), if any.
#[must_use]
pub fn display_tokens(tokens: &[Token]) -> Vec<Token> {
    let mut shown: Vec<Token> = tokens
        .iter()
        .filter(|t| t.has_status(&TokenStatus::Waiting))
        .cloned()
        .collect();
    if let Some(called) = current_called(tokens) {
        shown.push(called.clone());
    }
    shown
}

/// The token currently being served.
#[must_use]
pub fn current_called(tokens: &[Token]) -> Option<&Token> {
    tokens.iter().find(|t| t.has_status(&TokenStatus::Called))
}

/// Narrow live queues to displayable tokens matching `term`.
///
/// A token matches when its id or its queue's category name contains the
/// term, ignoring case. Categories left with no tokens are dropped. An empty
/// term matches everything.
#[must_use]
pub fn filter_live_queues(queues: &[LiveQueue], term: &str) -> Vec<LiveQueue> {
    let needle = term.to_lowercase();
    queues
        .iter()
        .filter_map(|queue| {
            let category_hit = queue
                .category
                .as_ref()
                .and_then(|c| c.name.as_deref())
                .is_some_and(|name| name.to_lowercase().contains(&needle));
            let tokens: Vec<Token> = display_tokens(&queue.tokens)
                .into_iter()
                .filter(|t| category_hit || t.token_id.to_lowercase().contains(&needle))
                .collect();
            (!tokens.is_empty()).then(|| LiveQueue { category: queue.category.clone(), tokens })
        })
        .collect()
}

/// Admin token search: id, category label, or status contains `term`.
#[must_use]
pub fn search_tokens<'a>(tokens: &'a [Token], term: &str) -> Vec<&'a Token> {
    let needle = term.to_lowercase();
    tokens
        .iter()
        .filter(|t| {
            t.token_id.to_lowercase().contains(&needle)
                || t.category_label().is_some_and(|c| c.to_lowercase().contains(&needle))
                || t.status.as_ref().is_some_and(|s| s.as_str().to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
#[path = "queue_test.rs"]
mod tests;
