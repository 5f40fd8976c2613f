//! Static informational pages.

use actix_web::HttpResponse;

use crate::render;

use super::html_response;

pub async fn author() -> HttpResponse {
    html_response(render::about_author_page())
}

pub async fn tech() -> HttpResponse {
    html_response(render::about_tech_page())
}
