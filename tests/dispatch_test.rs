//! End-to-end dispatch tests against the bundled language packs
//! Run with: cargo test --test dispatch_test

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;

use igor_bot::application::errors::PluginError;
use igor_bot::application::services::CommandService;
use igor_bot::domain::entities::{Catalog, CommandEntry, LanguageEntry, Request, Response};
use igor_bot::domain::traits::{Fetched, Fetcher, Invocation, Plugin};
use igor_bot::infrastructure::config::{Config, Settings};
use igor_bot::plugins::{self, Candidate, PluginRegistry};

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

const TOKEN: &str = "secret";

const CONFIG: &str = r#"
token: secret
weather:
  api-token: owm-key
  default-city: Amsterdam
randomtumblr:
  staff:
    name: Tumblr Staff
    url: https://staff.tumblr.com
remember:
  database: ":memory:"
  admins: [arjen]
"#;

/// Serves canned bodies for URLs containing a pattern and records every call
#[derive(Default)]
struct CannedFetcher {
    routes: Vec<(&'static str, Fetched)>,
    calls: Mutex<Vec<String>>,
}

impl CannedFetcher {
    fn route(mut self, pattern: &'static str, fetched: Fetched) -> Self {
        self.routes.push((pattern, fetched));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for CannedFetcher {
    async fn get(&self, url: &str) -> Result<Fetched, PluginError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.routes
            .iter()
            .find(|(pattern, _)| url.contains(pattern))
            .map(|(_, fetched)| fetched.clone())
            .ok_or_else(|| PluginError::Network(format!("no route for {}", url)))
    }
}

fn service_with(fetcher: Arc<CannedFetcher>, allow: &[&str], deny: &[&str]) -> CommandService {
    ensure_init();
    let settings = Settings::from_config(Config::parse(CONFIG).unwrap()).unwrap();
    let allow: Vec<String> = allow.iter().map(|s| s.to_string()).collect();
    let deny: Vec<String> = deny.iter().map(|s| s.to_string()).collect();
    let registry = PluginRegistry::build(plugins::available(&settings, fetcher), &allow, &deny);
    CommandService::new(TOKEN, Arc::new(registry))
}

fn service() -> CommandService {
    service_with(Arc::new(CannedFetcher::default()), &[], &[])
}

fn request(text: &str) -> Request {
    Request::from_text(text)
        .with_token(TOKEN)
        .with_command("/igor")
        .with_user("U1", "arjen")
}

#[tokio::test]
async fn test_every_configured_plugin_is_active() {
    let service = service();
    let mut names = service.registry().names();
    names.sort();
    assert_eq!(names, ["help", "remember", "status", "tumblr", "weather", "xkcd"]);
}

#[tokio::test]
async fn test_help_is_private_and_lists_commands() {
    let response = service().handle(&request("help")).await;
    assert!(!response.is_public());
    assert!(!response.attachments.is_empty());
    assert!(response.attachments.iter().any(|a| a.text.contains("help")));

    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("response_type").is_none());
}

#[tokio::test]
async fn test_dutch_help_falls_back_for_untranslated_plugins() {
    let response = service().handle(&request("hulp")).await;
    assert_eq!(response.attachments.len(), 6);

    let blank = response
        .attachments
        .iter()
        .filter(|a| a.title.is_empty() || a.text.is_empty())
        .count();
    assert_eq!(blank, 0);
    assert!(response.attachments.iter().any(|a| a.text.contains("*hulp*")));
    assert!(response.attachments.iter().any(|a| a.text.contains("*weer [stad]*")));
    assert!(response.attachments.iter().any(|a| a.text.contains("*list memories*")));
}

#[tokio::test]
async fn test_help_listing_shows_placeholders() {
    let response = service().handle(&request("help")).await;
    let listing: String = response.attachments.iter().map(|a| a.text.as_str()).collect();

    assert!(!listing.contains("[replace]"));
    assert!(listing.contains("*weather [city]*"));
    assert!(listing.contains("*show [name]*"));
    assert!(listing.contains("*tumblr staff*"));
}

#[tokio::test]
async fn test_introduce_yourself_is_public() {
    let response = service().handle(&request("introduce yourself")).await;
    assert!(response.is_public());
    assert_eq!(response.attachments.len(), 1);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["response_type"], "in_channel");
}

#[tokio::test]
async fn test_force_public_marker() {
    let response = service().handle(&request("!help")).await;
    assert!(response.is_public());
}

#[tokio::test]
async fn test_invalid_token() {
    let response = service().handle(&request("help").with_token("wrong")).await;
    assert_eq!(response.text, "Invalid token.");
    assert!(response.attachments.is_empty());
}

#[tokio::test]
async fn test_denied_plugin_falls_through() {
    let fetcher = Arc::new(CannedFetcher::default());
    let service = service_with(fetcher.clone(), &[], &["weather"]);
    let response = service.handle(&request("weather Amsterdam")).await;

    assert_eq!(response.text, "Our apologies. No Igor was able to handle your request.");
    assert!(response.attachments[0].text.contains("/igor weather Amsterdam"));
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_allow_list_keeps_help() {
    let service = service_with(Arc::new(CannedFetcher::default()), &["xkcd"], &[]);
    let mut names = service.registry().names();
    names.sort();
    assert_eq!(names, ["help", "xkcd"]);
}

#[tokio::test]
async fn test_unknown_request() {
    let response = service().handle(&request("make me a sandwich")).await;
    assert!(response.text.starts_with("Our apologies"));
    assert!(!response.is_public());
}

#[tokio::test]
async fn test_weather() {
    let body = r#"{"list":[{"name":"Amsterdam","main":{"temp":12.3,"humidity":80},
        "wind":{"speed":4.1},"sys":{"country":"NL"},
        "weather":[{"description":"light rain","icon":"10d"}],"dt":1700000000}]}"#;
    let fetcher = Arc::new(CannedFetcher::default().route("openweathermap.org/data/2.5/find", Fetched::ok(body)));
    let response = service_with(fetcher.clone(), &[], &[]).handle(&request("Weather Den Haag")).await;

    assert_eq!(response.text, "Your weather request");
    let attach = &response.attachments[0];
    assert!(attach.title.starts_with("Amsterdam, NL"));
    assert_eq!(attach.text, "light rain");
    assert!(attach.fields.iter().any(|f| f.title == "Temp" && f.value == "12 C"));
    assert!(fetcher.calls()[0].contains("q=Den%20Haag"));
}

#[tokio::test]
async fn test_weather_default_city() {
    let fetcher = Arc::new(CannedFetcher::default().route("find", Fetched::ok(r#"{"list":[]}"#)));
    service_with(fetcher.clone(), &[], &[]).handle(&request("weather")).await;
    assert!(fetcher.calls()[0].contains("q=Amsterdam"));
}

#[tokio::test]
async fn test_xkcd_specific() {
    let comic = r#"{"num":42,"title":"Geologic Time","alt":"Rocks.","img":"https://imgs.xkcd.com/comics/geologic_time.png"}"#;
    let fetcher = Arc::new(CannedFetcher::default().route("xkcd.com/42/", Fetched::ok(comic)));
    let response = service_with(fetcher, &[], &[]).handle(&request("xkcd 42")).await;

    assert_eq!(response.text, "XKCD comic #42");
    assert!(response.is_public());
    assert_eq!(response.attachments[0].title, "Geologic Time");
}

fn comic(number: u32) -> Fetched {
    Fetched::ok(format!(
        r#"{{"num":{number},"title":"Comic {number}","alt":"alt","img":"https://imgs.xkcd.com/comics/{number}.png"}}"#
    ))
}

#[tokio::test]
async fn test_xkcd_latest() {
    for text in ["xkcd", "XKCD  "] {
        let fetcher = Arc::new(CannedFetcher::default().route("xkcd.com/info.0.json", comic(2900)));
        let response = service_with(fetcher.clone(), &[], &[]).handle(&request(text)).await;

        assert_eq!(response.text, "XKCD comic #2900");
        assert!(response.is_public());
        assert_eq!(response.attachments[0].image_url.as_deref(), Some("https://imgs.xkcd.com/comics/2900.png"));
        assert_eq!(fetcher.calls(), ["https://xkcd.com/info.0.json"]);
    }
}

#[tokio::test]
async fn test_random_xkcd() {
    let fetcher = Arc::new(
        CannedFetcher::default()
            .route("xkcd.com/info.0.json", comic(5))
            .route("xkcd.com/", comic(3)),
    );
    let response = service_with(fetcher.clone(), &[], &[]).handle(&request("random xkcd")).await;

    assert_eq!(response.text, "XKCD comic #3");
    let calls = fetcher.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], "https://xkcd.com/info.0.json");
    let picked: u32 = calls[1]
        .trim_start_matches("https://xkcd.com/")
        .trim_end_matches("/info.0.json")
        .parse()
        .unwrap();
    assert!((1..=5).contains(&picked));
}

#[tokio::test]
async fn test_random_xkcd_with_single_comic() {
    let fetcher = Arc::new(CannedFetcher::default().route("xkcd.com/info.0.json", comic(1)));
    let response = service_with(fetcher.clone(), &[], &[]).handle(&request("random xkcd")).await;

    assert_eq!(response.text, "XKCD comic #1");
    assert_eq!(fetcher.calls().len(), 1);
}

#[tokio::test]
async fn test_xkcd_bad_number_goes_wrong() {
    let fetcher = Arc::new(CannedFetcher::default().route("xkcd.com", Fetched { status: 404, body: String::new() }));
    let response = service_with(fetcher, &[], &[]).handle(&request("xkcd 99999")).await;
    assert!(response.text.starts_with("Something went wrong"));
}

#[tokio::test]
async fn test_status_of_service() {
    let page = r#"{"status":{"indicator":"minor","description":"Partially Degraded Service"}}"#;
    let fetcher = Arc::new(CannedFetcher::default().route("githubstatus.com/api/v2/status.json", Fetched::ok(page)));
    let response = service_with(fetcher, &[], &[]).handle(&request("status github")).await;

    assert_eq!(response.text, "Status results:");
    assert!(response.is_public());
    let attach = &response.attachments[0];
    assert_eq!(attach.title, "GitHub");
    assert_eq!(attach.color.as_deref(), Some("warning"));
}

#[tokio::test]
async fn test_status_of_website() {
    let fetcher = Arc::new(CannedFetcher::default().route("isitup.org/example.com.json", Fetched::ok(r#"{"status_code":2}"#)));
    let response = service_with(fetcher, &[], &[]).handle(&request("status example.com")).await;

    assert_eq!(response.text, "The website is:");
    assert_eq!(response.attachments[0].text, ":thumbsdown:");
    assert_eq!(response.attachments[0].color.as_deref(), Some("danger"));
}

#[tokio::test]
async fn test_status_overview_reports_every_service() {
    let page = r#"{"status":{"indicator":"none","description":"All Systems Operational"}}"#;
    let fetcher = Arc::new(
        CannedFetcher::default()
            .route("githubstatus.com", Fetched::ok(page))
            .route("npmjs.org", Fetched::ok(page)),
    );
    let response = service_with(fetcher, &[], &[]).handle(&request("status")).await;

    assert_eq!(response.attachments.len(), igor_bot::plugins::status::SERVICES.len());
    let good = response.attachments.iter().filter(|a| a.color.as_deref() == Some("good")).count();
    assert_eq!(good, 2);
}

const TUMBLR_FEED: &str = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Staff</title>
        <link>https://staff.tumblr.com</link><description>Staff</description>
        <item><title>Hello</title><link>https://staff.tumblr.com/post/1</link>
        <description>&lt;p&gt;&lt;img src="https://64.media.tumblr.com/a.jpg"/&gt;&lt;/p&gt;</description></item>
        </channel></rss>"#;

#[tokio::test]
async fn test_tumblr_image() {
    let fetcher = Arc::new(CannedFetcher::default().route("staff.tumblr.com/rss", Fetched::ok(TUMBLR_FEED)));
    let response = service_with(fetcher, &[], &[]).handle(&request("tumblr staff")).await;

    assert_eq!(response.text, "Tumblr Staff");
    assert!(response.is_public());
    let attach = &response.attachments[0];
    assert_eq!(attach.image_url.as_deref(), Some("https://64.media.tumblr.com/a.jpg"));
    assert_eq!(attach.title_link.as_deref(), Some("https://staff.tumblr.com/post/1"));
}

#[tokio::test]
async fn test_tumblr_random_blog() {
    let fetcher = Arc::new(CannedFetcher::default().route("staff.tumblr.com/rss", Fetched::ok(TUMBLR_FEED)));
    let response = service_with(fetcher.clone(), &[], &[]).handle(&request("tumblr")).await;

    assert_eq!(response.text, "Tumblr Staff");
    assert!(response.is_public());
    assert_eq!(response.attachments[0].image_url.as_deref(), Some("https://64.media.tumblr.com/a.jpg"));
    assert_eq!(fetcher.calls(), ["https://staff.tumblr.com/rss"]);
}

#[tokio::test]
async fn test_tumblr_feed_without_images() {
    let feed = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Staff</title>
        <link>https://staff.tumblr.com</link><description>Staff</description>
        <item><title>Text only</title><description>just words</description></item>
        </channel></rss>"#;
    let fetcher = Arc::new(CannedFetcher::default().route("staff.tumblr.com/rss", Fetched::ok(feed)));
    let response = service_with(fetcher, &[], &[]).handle(&request("tumblr")).await;
    assert!(response.text.starts_with("Something went wrong"));
}

#[tokio::test]
async fn test_tumblr_unknown_blog_is_no_match() {
    let response = service().handle(&request("tumblr nonexistent")).await;
    assert!(response.text.starts_with("Our apologies"));
}

#[tokio::test]
async fn test_remember_round_trip() {
    let service = service();
    let saved = service.handle(&request("remember igor https://github.com/ArjenSchwarz/igor")).await;
    assert_eq!(saved.text, "I'll remember igor for you");

    let shown = service.handle(&request("show igor")).await;
    assert_eq!(shown.text, "https://github.com/ArjenSchwarz/igor");
    assert!(shown.is_public());
}

/// Plugin answering `ping` with a fixed outcome, counting its invocations
struct Scripted {
    name: &'static str,
    catalog: Catalog,
    outcome: fn(&'static str) -> Result<Response, PluginError>,
    calls: Arc<AtomicUsize>,
}

impl Scripted {
    fn candidate(name: &'static str, outcome: fn(&'static str) -> Result<Response, PluginError>) -> (Candidate, Arc<AtomicUsize>) {
        let mut en = LanguageEntry::default();
        en.commands.insert("ping".into(), CommandEntry::new("ping", "Ping"));
        let calls = Arc::new(AtomicUsize::new(0));
        let plugin = Self {
            name,
            catalog: Catalog::new().with_language("en", en),
            outcome,
            calls: calls.clone(),
        };
        ((name.to_string(), Ok(Arc::new(plugin) as Arc<dyn Plugin>)), calls)
    }
}

#[async_trait]
impl Plugin for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn execute(&self, _invocation: &Invocation<'_>) -> Result<Response, PluginError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)(self.name)
    }
}

fn answers(name: &'static str) -> Result<Response, PluginError> {
    Ok(Response::new(name))
}

fn declines(name: &'static str) -> Result<Response, PluginError> {
    Err(PluginError::no_match(name))
}

fn breaks(name: &'static str) -> Result<Response, PluginError> {
    Err(PluginError::Network(name.to_string()))
}

async fn ping(candidates: Vec<Candidate>) -> Response {
    ensure_init();
    let registry = PluginRegistry::build(candidates, &[], &[]);
    CommandService::new(TOKEN, Arc::new(registry)).handle(&request("ping")).await
}

#[tokio::test]
async fn test_first_match_wins() {
    let (first, first_calls) = Scripted::candidate("first", answers);
    let (second, second_calls) = Scripted::candidate("second", answers);
    let response = ping(vec![first, second]).await;

    assert_eq!(response.text, "first");
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_match_moves_on() {
    let (first, first_calls) = Scripted::candidate("first", declines);
    let (second, _) = Scripted::candidate("second", answers);
    let response = ping(vec![first, second]).await;

    assert_eq!(response.text, "second");
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_moves_on() {
    let (first, _) = Scripted::candidate("first", breaks);
    let (second, _) = Scripted::candidate("second", answers);
    assert_eq!(ping(vec![first, second]).await.text, "second");
}

#[tokio::test]
async fn test_failure_without_answer() {
    let (first, _) = Scripted::candidate("first", breaks);
    let (second, second_calls) = Scripted::candidate("second", declines);
    let response = ping(vec![first, second]).await;

    assert!(response.text.starts_with("Something went wrong"));
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_all_declined() {
    let (only, _) = Scripted::candidate("first", declines);
    assert!(ping(vec![only]).await.text.starts_with("Our apologies"));
}
