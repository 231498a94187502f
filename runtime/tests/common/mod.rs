//! Mock recipe site shared by the integration tests.

#![allow(dead_code)]

use recipe_import::http_client::SiteClient;
use recipe_import::import::Importer;
use recipe_import::site::Site;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "tok-e2e";

/// A listing page with the given detail hrefs and optional "Next" control.
pub fn listing_html(hrefs: &[&str], next: bool) -> String {
    let items: String = hrefs
        .iter()
        .map(|h| format!(r#"<li><a href="{h}">A recipe</a></li>"#))
        .collect();
    let next_item = if next {
        r##"<li><a href="#">Next &raquo;</a></li>"##
    } else {
        ""
    };
    format!(
        r##"<html><body>
             <div class="row"><ul>{items}</ul></div>
             <div class="pagination"><ul><li><a href="#">&laquo; Previous</a></li>{next_item}</ul></div>
           </body></html>"##
    )
}

/// A detail page with every structural region populated.
pub fn detail_html(title: &str) -> String {
    format!(
        r#"<html><body>
             <div class="page-header"><h1>{title}</h1></div>
             <div id="times">
               <div><span class="label">Prep</span> 10 mins</div>
               <div><span class="label">Total</span> 40 mins</div>
             </div>
             <div id="ingredients"><ul class="ingredients">
               <li class="ingredient">1 cup flour</li>
               <li class="ingredient">2 eggs</li>
             </ul></div>
             <div id="instructions"><ol class="method">
               <li class="step">Mix.</li>
               <li class="step">Bake.</li>
             </ol></div>
             <ul id="tagsList"><li><a class="tagname" href="/t/baking">baking</a></li></ul>
             <a href="https://source.example.com/{title}">View recipe</a>
           </body></html>"#
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Mount a listing page that must be fetched exactly once with the token.
pub async fn mount_listing(server: &MockServer, page: u32, hrefs: &[&str], next: bool) {
    Mock::given(method("GET"))
        .and(path(format!("/recipes/recent/{page}")))
        .and(header("cookie", format!("s={TOKEN}").as_str()))
        .respond_with(html(listing_html(hrefs, next)))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a detail page that must be fetched exactly once with the token.
pub async fn mount_detail(server: &MockServer, route: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("cookie", format!("s={TOKEN}").as_str()))
        .respond_with(html(detail_html(title)))
        .expect(1)
        .mount(server)
        .await;
}

/// Serve `body` at `route` for any number of requests.
pub async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Two listing pages (2 + 1 links) and three full detail pages.
pub async fn mount_two_page_site(server: &MockServer) {
    mount_listing(server, 1, &["/recipe/1/pancakes", "/recipe/2/waffles"], true).await;
    mount_listing(server, 2, &["/recipe/3/crepes"], false).await;
    mount_detail(server, "/recipe/1/pancakes", "Pancakes").await;
    mount_detail(server, "/recipe/2/waffles", "Waffles").await;
    mount_detail(server, "/recipe/3/crepes", "Crepes").await;
}

pub fn importer_for(server: &MockServer) -> Importer {
    let client = SiteClient::new(Duration::from_secs(5)).expect("client");
    Importer::new(client, Site::new(server.uri()))
}
