//! Sidebar navigation shell
//!
//! Only the form creation view is implemented; every other entry resolves
//! to the "coming soon" placeholder.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::api::AppState;

pub const MENU_TITLE: &str = "📊 Menu Principal";
pub const FOOTER: &str = "© 2025 - 2M Software | Em desenvolvimento 🚀";
pub const PLACEHOLDER_TITLE: &str = "🚧 Esta funcionalidade será desenvolvida em breve.";
pub const PLACEHOLDER_DETAIL: &str = "Em breve você poderá usar todos os recursos desta seção.";

/// Sidebar entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuItem {
    Dashboard,
    Mapping,
    FormCreation,
    DocumentGeneration,
    History,
    PlanManagement,
}

impl MenuItem {
    pub const ALL: [MenuItem; 6] = [
        MenuItem::Dashboard,
        MenuItem::Mapping,
        MenuItem::FormCreation,
        MenuItem::DocumentGeneration,
        MenuItem::History,
        MenuItem::PlanManagement,
    ];

    pub const DEFAULT_INDEX: usize = 0;

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Dashboard => "Dashboard",
            MenuItem::Mapping => "Mapeamento",
            MenuItem::FormCreation => "Criação Form",
            MenuItem::DocumentGeneration => "Geração de Documento",
            MenuItem::History => "Histórico",
            MenuItem::PlanManagement => "Gerenciar Plano",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            MenuItem::Dashboard => "speedometer2",
            MenuItem::Mapping => "map",
            MenuItem::FormCreation => "ui-checks-grid",
            MenuItem::DocumentGeneration => "file-earmark-text",
            MenuItem::History => "clock-history",
            MenuItem::PlanManagement => "credit-card-2-front",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            MenuItem::Dashboard => "dashboard",
            MenuItem::Mapping => "mapeamento",
            MenuItem::FormCreation => "criacao-form",
            MenuItem::DocumentGeneration => "geracao-documento",
            MenuItem::History => "historico",
            MenuItem::PlanManagement => "gerenciar-plano",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.slug() == slug)
    }
}

#[derive(Debug, Serialize)]
pub struct MenuEntry {
    pub item: MenuItem,
    pub label: &'static str,
    pub icon: &'static str,
    pub slug: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MenuView {
    pub title: &'static str,
    pub entries: Vec<MenuEntry>,
    pub default_index: usize,
    pub footer: &'static str,
}

/// What the main area shows for a menu entry
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewContent {
    FormBuilder {
        title: &'static str,
        sessions_url: &'static str,
    },
    Placeholder {
        title: &'static str,
        detail: &'static str,
    },
}

pub fn resolve_view(item: MenuItem) -> ViewContent {
    match item {
        MenuItem::FormCreation => ViewContent::FormBuilder {
            title: "🧩 Criador de Formulário Dinâmico",
            sessions_url: "/api/sessions",
        },
        _ => ViewContent::Placeholder {
            title: PLACEHOLDER_TITLE,
            detail: PLACEHOLDER_DETAIL,
        },
    }
}

pub fn menu() -> MenuView {
    MenuView {
        title: MENU_TITLE,
        entries: MenuItem::ALL
            .into_iter()
            .map(|item| MenuEntry {
                item,
                label: item.label(),
                icon: item.icon(),
                slug: item.slug(),
            })
            .collect(),
        default_index: MenuItem::DEFAULT_INDEX,
        footer: FOOTER,
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/menu", get(get_menu))
        .route("/views/:slug", get(get_view))
}

pub async fn get_menu() -> Json<MenuView> {
    Json(menu())
}

pub async fn get_view(Path(slug): Path<String>) -> Response {
    match MenuItem::from_slug(&slug) {
        Some(item) => Json(resolve_view(item)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(crate::error::ErrorBody {
                code: "view_not_found".to_string(),
                message: format!("no view '{}'", slug),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_form_creation_is_implemented() {
        for item in MenuItem::ALL {
            let view = resolve_view(item);
            match item {
                MenuItem::FormCreation => {
                    assert!(matches!(view, ViewContent::FormBuilder { .. }))
                }
                _ => assert!(matches!(view, ViewContent::Placeholder { .. })),
            }
        }
    }

    #[test]
    fn test_menu_order_and_default() {
        let view = menu();
        let labels: Vec<_> = view.entries.iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                "Dashboard",
                "Mapeamento",
                "Criação Form",
                "Geração de Documento",
                "Histórico",
                "Gerenciar Plano"
            ]
        );
        assert_eq!(view.entries[view.default_index].item, MenuItem::Dashboard);
    }

    #[test]
    fn test_slugs_resolve() {
        for item in MenuItem::ALL {
            assert_eq!(MenuItem::from_slug(item.slug()), Some(item));
        }
        assert_eq!(MenuItem::from_slug("relatorios"), None);
    }
}
