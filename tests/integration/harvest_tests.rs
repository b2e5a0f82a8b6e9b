//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the storefront and run the
//! full harvest cycle end-to-end: session setup, category pagination over
//! HTTP, and writing the output file.

use listing_harvester::config::{parse_config, Config, OutputFormat};
use listing_harvester::crawler::{harvest, Termination};
use listing_harvester::output::open_sink;
use listing_harvester::state::ExhaustReason;
use listing_harvester::{HarvestError, SessionError};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a listing page in the storefront's default markup
///
/// Each item is `(name, price)`. `next` is `None` for no pagination control,
/// `Some((href, disabled))` otherwise.
fn listing_page(items: &[(&str, &str)], next: Option<(&str, bool)>) -> String {
    let mut html = String::from(r#"<html><body><div class="p13n-desktop-grid">"#);
    for (name, price) in items {
        html.push_str(&format!(
            r#"<div class="zg-grid-general-faceout">
                <div class="_cDEzb_p13n-sc-css-line-clamp-3_g3dy1">{}</div>
                <span class="_cDEzb_p13n-sc-price_3mJ9Z">{}</span>
                <span class="a-icon-alt">4.2 out of 5 stars</span>
            </div>"#,
            name, price
        ));
    }
    html.push_str(r#"</div><ul class="a-pagination">"#);
    match next {
        Some((href, true)) => html.push_str(&format!(
            r#"<li class="a-disabled a-last"><a href="{}">Next page</a></li>"#,
            href
        )),
        Some((href, false)) => html.push_str(&format!(
            r#"<li class="a-last"><a href="{}">Next page</a></li>"#,
            href
        )),
        None => {}
    }
    html.push_str("</ul></body></html>");
    html
}

/// Creates a test configuration against the mock server
///
/// `session_extra` is appended to the `[session]` table.
fn test_config(base_url: &str, session_extra: &str, cap: usize, categories: &[&str]) -> Config {
    let mut toml = format!(
        r#"
[crawler]
max-products-per-category = {cap}
wait-timeout-ms = 2000
page-settle-ms = 0
next-settle-ms = 0
poll-interval-ms = 10

[session]
base-url = "{base}/"
login-url = "{base}/ap/signin"
user-agent = "HarvestTest/1.0"
{session_extra}

[output]
path = "products.csv"
"#,
        cap = cap,
        base = base_url,
        session_extra = session_extra,
    );

    for category in categories {
        toml.push_str(&format!("\n[[category]]\nurl = \"{}{}\"\n", base_url, category));
    }

    parse_config(&toml).expect("Failed to parse test config")
}

fn cookie_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create cookie file");
    file.write_all(br#"[{"name": "session-id", "value": "abc123", "path": "/", "sameSite": "Lax"}]"#)
        .expect("Failed to write cookie file");
    file.flush().expect("Failed to flush cookie file");
    file
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cookie_session_multi_page_category() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let cookies = cookie_file();

    // Every request must carry the replayed session cookie
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("cookie", "session-id=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>home</html>"))
        .expect(1)
        .mount(&server)
        .await;

    for (route, items, next) in [
        (
            "/gp/bestsellers/kitchen",
            vec![("Kettle", "₹1,299.00"), ("Toaster", "₹2,049")],
            ("/gp/bestsellers/kitchen/page-2", false),
        ),
        (
            "/gp/bestsellers/kitchen/page-2",
            vec![("Mixer", "₹3,499")],
            ("/gp/bestsellers/kitchen/page-3", false),
        ),
        (
            "/gp/bestsellers/kitchen/page-3",
            vec![("Blender", "₹999")],
            ("/gp/bestsellers/kitchen/page-4", true),
        ),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("cookie", "session-id=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&items, Some(next))))
            .expect(1)
            .mount(&server)
            .await;
    }

    let config = test_config(
        &base_url,
        &format!("cookies-file = \"{}\"", cookies.path().display()),
        100,
        &["/gp/bestsellers/kitchen"],
    );

    let report = harvest(&config).await.expect("Harvest failed");

    let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Kettle", "Toaster", "Mixer", "Blender"]);
    assert_eq!(report.records[0].price_inr, "1299.00");
    assert_eq!(report.records[0].category, "kitchen");
    assert_eq!(report.records[0].rating, "4.2 out of 5 stars");

    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.categories[0].pages_visited, 3);
    assert_eq!(
        report.categories[0].termination,
        Termination::Exhausted(ExhaustReason::NextDisabled)
    );
}

#[tokio::test]
async fn test_two_categories_end_to_end() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let cookies = cookie_file();

    mount_page(&server, "/", "<html>home</html>".to_string()).await;
    mount_page(
        &server,
        "/gp/bestsellers/kitchen",
        listing_page(&[("Kettle", "₹1,299")], None),
    )
    .await;
    mount_page(
        &server,
        "/gp/bestsellers/shoes",
        listing_page(&[("Runner", "₹2,499")], Some(("#", true))),
    )
    .await;

    let config = test_config(
        &base_url,
        &format!("cookies-file = \"{}\"", cookies.path().display()),
        100,
        &["/gp/bestsellers/kitchen", "/gp/bestsellers/shoes"],
    );

    let report = harvest(&config).await.expect("Harvest failed");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].category, "kitchen");
    assert_eq!(report.records[0].name, "Kettle");
    assert_eq!(report.records[1].category, "shoes");
    assert_eq!(report.records[1].name, "Runner");
    assert_eq!(
        report.categories[0].termination,
        Termination::Exhausted(ExhaustReason::NoNextControl)
    );

    // Write the harvest out and check the file
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("products.csv");
    let mut sink = open_sink(&output, OutputFormat::Csv).expect("Failed to open sink");
    sink.write(&report.records).expect("Failed to write records");
    drop(sink);

    let content = std::fs::read_to_string(&output).expect("Failed to read output");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Category,Name,Price (INR),Discount (%),Rating,Sold By");
    assert_eq!(
        lines[1],
        "kitchen,Kettle,1299,Not Available,4.2 out of 5 stars,Not Available"
    );
    assert_eq!(lines.len(), 3);
}

#[tokio::test]
async fn test_cap_stops_pagination() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let cookies = cookie_file();

    mount_page(&server, "/", "<html>home</html>".to_string()).await;
    mount_page(
        &server,
        "/gp/bestsellers/toys",
        listing_page(
            &[("Kite", "₹499"), ("Yo-yo", "₹99"), ("Puzzle", "₹799")],
            Some(("/gp/bestsellers/toys/page-2", false)),
        ),
    )
    .await;

    // The second page exists but must never be requested
    Mock::given(method("GET"))
        .and(path("/gp/bestsellers/toys/page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[("Ball", "₹199")], None)))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(
        &base_url,
        &format!("cookies-file = \"{}\"", cookies.path().display()),
        2,
        &["/gp/bestsellers/toys"],
    );

    let report = harvest(&config).await.expect("Harvest failed");

    let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Kite", "Yo-yo"]);
    assert_eq!(report.categories[0].termination, Termination::CapReached);
}

#[tokio::test]
async fn test_login_fallback_succeeds() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    std::env::set_var("HARVEST_IT_PASSWORD_OK", "secret");

    mount_page(
        &server,
        "/ap/signin",
        r#"<html><body>
            <form name="signIn" method="post" action="/ap/signin/submit">
                <input type="hidden" name="appActionToken" value="tok123">
                <input type="email" name="email">
                <input type="password" name="password">
            </form>
        </body></html>"#
            .to_string(),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/ap/signin/submit"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session-id=fresh; Path=/")
                .set_body_string(r#"<html><body><div id="nav-belt">Hello</div></body></html>"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    // The cookie set at login must be sent with the listing request
    Mock::given(method("GET"))
        .and(path("/gp/bestsellers/garden"))
        .and(header("cookie", "session-id=fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[("Hose", "₹650")], None)))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(
        &base_url,
        r#"cookies-file = "/nonexistent/cookies.json"
username = "buyer@example.com"
password-env = "HARVEST_IT_PASSWORD_OK""#,
        100,
        &["/gp/bestsellers/garden"],
    );

    let report = harvest(&config).await.expect("Harvest failed");

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].name, "Hose");
}

#[tokio::test]
async fn test_login_over_separate_email_and_password_pages() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    std::env::set_var("HARVEST_IT_PASSWORD_TWO_STEP", "secret");

    mount_page(
        &server,
        "/ap/signin",
        r#"<form name="signIn" method="post" action="/ap/signin/email">
            <input type="hidden" name="workflowState" value="w1">
            <input type="email" name="email">
        </form>"#
            .to_string(),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/ap/signin/email"))
        .and(body_string_contains("email=buyer%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<form name="signIn" method="post" action="/ap/signin/password">
                <input type="hidden" name="workflowState" value="w2">
                <input type="password" name="password">
            </form>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ap/signin/password"))
        .and(body_string_contains("password=secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><div id="nav-belt">Hello</div></body></html>"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    mount_page(
        &server,
        "/gp/bestsellers/garden",
        listing_page(&[("Hose", "₹650")], None),
    )
    .await;

    let config = test_config(
        &base_url,
        r#"username = "buyer@example.com"
password-env = "HARVEST_IT_PASSWORD_TWO_STEP""#,
        100,
        &["/gp/bestsellers/garden"],
    );

    let report = harvest(&config).await.expect("Harvest failed");

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].name, "Hose");
}

#[tokio::test]
async fn test_cookie_and_login_failure_is_fatal() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    std::env::set_var("HARVEST_IT_PASSWORD_BAD", "wrong");

    mount_page(
        &server,
        "/ap/signin",
        r#"<form name="signIn" action="/ap/signin/submit"><input name="email"></form>"#.to_string(),
    )
    .await;

    // Rejected sign-in: the form comes back without the signed-in marker
    Mock::given(method("POST"))
        .and(path("/ap/signin/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><div id="auth-error-message-box">Incorrect password</div></body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gp/bestsellers/garden"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[("Hose", "₹650")], None)))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(
        &base_url,
        r#"cookies-file = "/nonexistent/cookies.json"
username = "buyer@example.com"
password-env = "HARVEST_IT_PASSWORD_BAD""#,
        100,
        &["/gp/bestsellers/garden"],
    );

    let result = harvest(&config).await;

    assert!(matches!(
        result,
        Err(HarvestError::Session(SessionError::Authentication(_)))
    ));
}

#[tokio::test]
async fn test_missing_listing_keeps_later_categories() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let cookies = cookie_file();

    mount_page(&server, "/", "<html>home</html>".to_string()).await;
    mount_page(
        &server,
        "/gp/bestsellers/books",
        "<html><body>Try again later</body></html>".to_string(),
    )
    .await;
    mount_page(
        &server,
        "/gp/bestsellers/music",
        listing_page(&[("Vinyl", "₹1,999")], None),
    )
    .await;

    let config = test_config(
        &base_url,
        &format!("cookies-file = \"{}\"", cookies.path().display()),
        100,
        &["/gp/bestsellers/books", "/gp/bestsellers/music"],
    );

    let report = harvest(&config).await.expect("Harvest failed");

    assert_eq!(report.failed_categories(), 1);
    assert!(matches!(report.categories[0].termination, Termination::PageError(_)));
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].category, "music");
}
