/// Server-rendered page: a title picker and the resulting recommendation cards
///
/// No styling. Failures scoped to the request render as an empty
/// state with the reason instead of an error page.
use std::fmt::Write;

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::{
    models::Recommendation,
    routes::AppState,
    services::{featured::FEATURED_LIMIT, featured_posters, recommend},
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    title: Option<String>,
}

/// Outcome of the optional recommendation request made by the page
enum Results {
    NotRequested,
    Found(Vec<Recommendation>),
    Empty(Option<String>),
}

pub async fn index(State(state): State<AppState>, Query(params): Query<PageQuery>) -> Html<String> {
    let selected = params.title.filter(|t| !t.is_empty());

    let results = async {
        let Some(title) = &selected else {
            return Results::NotRequested;
        };
        match recommend(&state.store, state.metadata.as_ref(), title, state.max_results).await {
            Ok(found) if found.is_empty() => Results::Empty(None),
            Ok(found) => Results::Found(found),
            Err(e) => {
                tracing::warn!(title = %title, error = %e, "Page recommendation failed");
                Results::Empty(Some(e.to_string()))
            }
        }
    };
    let posters = featured_posters(
        state.metadata.as_ref(),
        &state.featured_movie_ids,
        FEATURED_LIMIT,
    );
    let (results, posters) = tokio::join!(results, posters);

    Html(render_page(&state, selected.as_deref(), &posters, &results))
}

fn render_page(
    state: &AppState,
    selected: Option<&str>,
    posters: &[String],
    results: &Results,
) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>The Watch List</title></head>\n<body>\n");
    html.push_str("<h1>The Watch List</h1>\n");

    if !posters.is_empty() {
        html.push_str("<div class=\"featured\">\n");
        for poster in posters {
            let _ = writeln!(html, "<img src=\"{}\" alt=\"\">", escape(poster));
        }
        html.push_str("</div>\n");
    }

    html.push_str("<form method=\"get\" action=\"/\">\n<label for=\"title\">Select a movie to get recommendations</label>\n<select id=\"title\" name=\"title\">\n");
    for title in state.store.titles() {
        let marker = if Some(title) == selected { " selected" } else { "" };
        let escaped = escape(title);
        let _ = writeln!(html, "<option value=\"{}\"{}>{}</option>", escaped, marker, escaped);
    }
    html.push_str("</select>\n<button type=\"submit\">Show Recommendations</button>\n</form>\n");

    match results {
        Results::NotRequested => {}
        Results::Found(recommendations) => {
            html.push_str("<h2>Recommended Movies</h2>\n<div class=\"recommendations\">\n");
            for recommendation in recommendations {
                render_card(&mut html, state, recommendation);
            }
            html.push_str("</div>\n");
        }
        Results::Empty(reason) => {
            html.push_str("<p class=\"empty\">No recommendations found for this movie.</p>\n");
            if let Some(reason) = reason {
                let _ = writeln!(html, "<p class=\"diagnostic\">{}</p>", escape(reason));
            }
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_card(html: &mut String, state: &AppState, recommendation: &Recommendation) {
    let title = escape(&recommendation.title);
    let _ = write!(
        html,
        "<div class=\"recommendation\">\n\
         <img class=\"poster\" src=\"{poster}\" alt=\"{title}\">\n\
         <div class=\"title\">{title}</div>\n\
         <div class=\"rating\">&#11088; {rating}</div>\n\
         <div class=\"overview\">{overview}</div>\n\
         <a href=\"{link}\" target=\"_blank\" rel=\"noopener\">View on TMDB</a>\n\
         </div>\n",
        poster = escape(&recommendation.poster_url),
        title = title,
        rating = escape(&recommendation.rating),
        overview = escape(&recommendation.overview),
        link = escape(&state.detail_url(recommendation.movie_id)),
    );
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
