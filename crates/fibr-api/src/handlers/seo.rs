//! Public crawler assets.

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use fibr_service::PublicAsset;

use crate::state::AppState;

/// Serve a public asset.
pub fn serve(state: &AppState, asset: PublicAsset) -> Response {
    let public_url = state.config.ui.public_url.trim_end_matches('/');
    match asset {
        PublicAsset::Robots => (
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            robots(public_url),
        )
            .into_response(),
        PublicAsset::Sitemap => (
            [(CONTENT_TYPE, "application/xml; charset=utf-8")],
            sitemap(public_url),
        )
            .into_response(),
    }
}

/// Only the landing page may be indexed.
fn robots(public_url: &str) -> String {
    format!("User-agent: *\nAllow: /$\nDisallow: /\nSitemap: {public_url}/sitemap.xml\n")
}

fn sitemap(public_url: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n  \
         <url>\n    <loc>{}/</loc>\n  </url>\n\
         </urlset>\n",
        escape_xml(public_url)
    )
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
