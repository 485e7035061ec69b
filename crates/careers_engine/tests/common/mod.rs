#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct Item<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub published: DateTime<Utc>,
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2013, 8, day, hour, 0, 0).unwrap()
}

pub fn item<'a>(title: &'a str, link: &'a str, published: DateTime<Utc>) -> Item<'a> {
    Item {
        title,
        link,
        published,
    }
}

pub fn rss(items: &[Item<'_>]) -> String {
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<rss version=\"2.0\">\n<channel>\n<title>jobs</title>\n<link>http://careers.example.com/</link>\n<description>feed</description>\n",
    );
    for item in items {
        body.push_str(&format!(
            "<item>\n<title>{}</title>\n<link>{}</link>\n<guid>{}</guid>\n<pubDate>{}</pubDate>\n</item>\n",
            item.title,
            item.link,
            item.link,
            item.published.to_rfc2822()
        ));
    }
    body.push_str("</channel>\n</rss>\n");
    body
}

pub async fn serve_feed(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/rss+xml"))
        .mount(server)
        .await;
}
