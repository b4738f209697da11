// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use askama::Template;
use axum::{http::StatusCode, response::Html};

use crate::web::middleware::auth::RequireStaff;

/// Whether the demo pages are compiled in; the shared nav hides their
/// links otherwise.
pub const DEMO_ENABLED: bool = cfg!(feature = "demo");

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    title: String,
    demo_enabled: bool,
}

/// Home page handler
pub async fn index() -> Result<Html<String>, StatusCode> {
    let template = IndexTemplate {
        title: "Welcome to FastOpp".to_string(),
        demo_enabled: DEMO_ENABLED,
    };
    Ok(Html(
        template
            .render()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
    ))
}

#[derive(Template)]
#[template(path = "webinar_registrants.html")]
struct WebinarRegistrantsTemplate {
    title: String,
    user_email: String,
    demo_enabled: bool,
}

/// Webinar registrants management page (staff only)
pub async fn webinar_registrants(
    RequireStaff(user): RequireStaff,
) -> Result<Html<String>, StatusCode> {
    let template = WebinarRegistrantsTemplate {
        title: "Webinar Registrants".to_string(),
        user_email: user.email,
        demo_enabled: DEMO_ENABLED,
    };
    Ok(Html(
        template
            .render()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
    ))
}

#[cfg(feature = "demo")]
mod demo {
    use super::*;
    use std::time::Duration;

    #[derive(Template)]
    #[template(path = "dashboard_demo.html")]
    struct DashboardDemoTemplate {
        title: String,
        demo_enabled: bool,
    }

    /// Product dashboard demo page
    pub async fn dashboard_demo() -> Result<Html<String>, StatusCode> {
        let template = DashboardDemoTemplate {
            title: "Product Dashboard Demo".to_string(),
            demo_enabled: DEMO_ENABLED,
        };
        Ok(Html(
            template
                .render()
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
        ))
    }

    #[derive(Template)]
    #[template(path = "webinar_demo.html")]
    struct WebinarDemoTemplate {
        title: String,
        demo_enabled: bool,
    }

    /// Marketing page showcasing webinar attendees
    pub async fn webinar_demo() -> Result<Html<String>, StatusCode> {
        let template = WebinarDemoTemplate {
            title: "Webinar Demo".to_string(),
            demo_enabled: DEMO_ENABLED,
        };
        Ok(Html(
            template
                .render()
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
        ))
    }

    #[derive(Template)]
    #[template(path = "ai_demo.html")]
    struct AiDemoTemplate {
        title: String,
        demo_enabled: bool,
    }

    /// AI chat demo page
    pub async fn ai_demo() -> Result<Html<String>, StatusCode> {
        let template = AiDemoTemplate {
            title: "AI Chat Demo".to_string(),
            demo_enabled: DEMO_ENABLED,
        };
        Ok(Html(
            template
                .render()
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
        ))
    }

    pub struct AiStat {
        pub metric: &'static str,
        pub value: &'static str,
        pub icon: &'static str,
    }

    #[derive(Template)]
    #[template(path = "partials/ai_stats.html")]
    struct AiStatsTemplate {
        stats: Vec<AiStat>,
    }

    /// HTMX partial with canned AI marketing statistics
    pub async fn ai_stats() -> Result<Html<String>, StatusCode> {
        // Simulate processing time so the HTMX spinner is visible
        tokio::time::sleep(Duration::from_secs(1)).await;

        let stats = vec![
            AiStat { metric: "Content Generation Speed", value: "10x Faster", icon: "⚡" },
            AiStat { metric: "Campaign ROI", value: "+340%", icon: "📈" },
            AiStat { metric: "Time Saved", value: "87%", icon: "⏰" },
            AiStat { metric: "Engagement Rate", value: "+280%", icon: "🎯" },
        ];

        let template = AiStatsTemplate { stats };
        Ok(Html(
            template
                .render()
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
        ))
    }
}

#[cfg(feature = "demo")]
pub use demo::{ai_demo, ai_stats, dashboard_demo, webinar_demo};
