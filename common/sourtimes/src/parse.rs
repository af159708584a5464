use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::{Level, event};

use crate::{
    errors::{SourError, SourResult},
    model::{AutocompleteResult, ChannelInfo, Entry, QueryResult, TitleSummary},
};

static SELECTOR_LIST_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li > a").unwrap());
static SELECTOR_CHANNEL_LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul#channel-follow-list").unwrap());
static SELECTOR_CHANNEL_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.index-link").unwrap());
static SELECTOR_ENTRY_LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul#entry-item-list").unwrap());
static SELECTOR_ENTRY_AVATAR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img.avatar").unwrap());
static SELECTOR_ENTRY_DATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.entry-date").unwrap());

#[derive(Deserialize)]
struct AutocompletePayload {
    #[serde(rename = "Query")]
    query: String,
    #[serde(rename = "Titles")]
    titles: Vec<String>,
    #[serde(rename = "Nicks")]
    nicks: Vec<String>,
}

pub fn parse_autocomplete(body: &str) -> SourResult<AutocompleteResult> {
    let payload: AutocompletePayload = serde_json::from_str(body)
        .map_err(|err| SourError::malformed(format!("autocomplete: {err}")))?;
    Ok(AutocompleteResult {
        query: payload.query,
        titles: payload.titles,
        nicks: payload.nicks,
    })
}

/// Extracts `(title, count)` pairs from every `li > a` of a listing page.
///
/// The count badge only exists on titles that have entries, so an anchor that
/// does not split into exactly two text fragments is kept with the whole text
/// as its title and no count.
pub fn parse_titles(body: &str, origin: &str) -> Vec<TitleSummary> {
    let document = Html::parse_document(body);
    document
        .select(&SELECTOR_LIST_ANCHOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let (title, count) = split_title(&text_fragments(anchor));
            Some(TitleSummary::new(origin, href, title, count))
        })
        .collect()
}

/// Top rated listing: the title sits in a `span` directly under the anchor and
/// there is never a count badge. A page without a single such anchor is not a
/// top rated listing.
pub fn parse_top_rated(body: &str, origin: &str) -> SourResult<Vec<TitleSummary>> {
    let document = Html::parse_document(body);
    let titles: Vec<_> = document
        .select(&SELECTOR_LIST_ANCHOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let Some(span) = child_element(anchor, "span", None) else {
                event!(Level::DEBUG, href, "skipping anchor without title span");
                return None;
            };
            let title = text_fragments(span).concat();
            Some(TitleSummary::new(origin, href, title, None))
        })
        .collect();
    if titles.is_empty() {
        return Err(SourError::malformed("no titled anchors in top rated list"));
    }
    Ok(titles)
}

pub fn parse_channels(body: &str, origin: &str) -> SourResult<Vec<ChannelInfo>> {
    let document = Html::parse_document(body);
    let list = document
        .select(&SELECTOR_CHANNEL_LIST)
        .next()
        .ok_or_else(|| SourError::malformed("channel list not found"))?;
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|item| item.value().name() == "li")
        .map(|item| -> SourResult<ChannelInfo> {
            let link = item
                .select(&SELECTOR_CHANNEL_LINK)
                .next()
                .ok_or_else(|| SourError::malformed("channel item without link"))?;
            let href = link
                .value()
                .attr("href")
                .ok_or_else(|| SourError::malformed("channel link without href"))?;
            let title = child_element(item, "p", None)
                .ok_or_else(|| SourError::malformed("channel item without description"))?;
            Ok(ChannelInfo::new(
                origin,
                &text_fragments(link).concat(),
                text_fragments(title).join(" "),
                href,
            ))
        })
        .collect()
}

pub fn parse_entries(body: &str, origin: &str, query: &str) -> SourResult<QueryResult> {
    let document = Html::parse_document(body);
    let list = document
        .select(&SELECTOR_ENTRY_LIST)
        .next()
        .ok_or_else(|| SourError::malformed("entry list not found"))?;
    let entries = list
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|item| item.value().name() == "li")
        .map(|item| parse_entry(item, origin))
        .collect::<SourResult<Vec<_>>>()?;
    Ok(QueryResult {
        query: query.to_string(),
        entries,
    })
}

fn parse_entry(item: ElementRef<'_>, origin: &str) -> SourResult<Entry> {
    let entry_id: u64 = parse_number(item, "data-id")?;
    let author_id: u64 = parse_number(item, "data-author-id")?;
    let fav_count: u32 = parse_number(item, "data-favorite-count")?;
    let author = attr(item, "data-author")?.to_string();
    let avatar = item
        .select(&SELECTOR_ENTRY_AVATAR)
        .next()
        .and_then(|img| img.value().attr("src"))
        .ok_or_else(|| SourError::malformed(format!("entry {entry_id}: avatar not found")))?;
    let date = item
        .select(&SELECTOR_ENTRY_DATE)
        .next()
        .map(|a| text_fragments(a).join(" "))
        .ok_or_else(|| SourError::malformed(format!("entry {entry_id}: date not found")))?;
    let content = child_element(item, "div", Some("content"))
        .map(|div| text_fragments(div).join(" "))
        .ok_or_else(|| SourError::malformed(format!("entry {entry_id}: content not found")))?;
    Ok(Entry::new(
        origin, entry_id, author_id, author, avatar, fav_count, date, content,
    ))
}

fn attr<'a>(element: ElementRef<'a>, name: &str) -> SourResult<&'a str> {
    element
        .value()
        .attr(name)
        .ok_or_else(|| SourError::malformed(format!("missing attribute `{name}`")))
}

fn parse_number<T: std::str::FromStr>(element: ElementRef<'_>, name: &str) -> SourResult<T> {
    let value = attr(element, name)?;
    value
        .trim()
        .parse()
        .map_err(|_| SourError::malformed(format!("attribute `{name}` is not a number: {value}")))
}

/// Text nodes of `element` in document order, trimmed, blanks dropped.
fn text_fragments(element: ElementRef<'_>) -> Vec<&str> {
    element
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect()
}

fn split_title(fragments: &[&str]) -> (String, Option<String>) {
    match fragments {
        [title, count] => (title.to_string(), Some(count.to_string())),
        _ => (fragments.concat(), None),
    }
}

fn child_element<'a>(
    parent: ElementRef<'a>,
    name: &str,
    class: Option<&str>,
) -> Option<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| {
            child.value().name() == name
                && class.is_none_or(|class| child.value().classes().any(|c| c == class))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://eksisozluk.com";

    #[test]
    fn test_split_title() {
        assert_eq!(
            split_title(&["Foo", "123"]),
            ("Foo".to_string(), Some("123".to_string()))
        );
        assert_eq!(split_title(&["Bar"]), ("Bar".to_string(), None));
        assert_eq!(split_title(&["a", "b", "c"]), ("abc".to_string(), None));
        assert_eq!(split_title(&[]), (String::new(), None));
    }

    #[test]
    fn test_parse_titles() {
        let body = r#"
            <ul class="topic-list">
                <li><a href="/foo--1?a=popular">Foo <small>123</small></a></li>
                <li><a href="/bar--2">
                    Bar
                </a></li>
                <li><a>no href</a></li>
            </ul>
        "#;
        let titles = parse_titles(body, ORIGIN);
        assert_eq!(
            titles,
            vec![
                TitleSummary {
                    url: "https://eksisozluk.com/foo--1?a=popular".to_string(),
                    title: "Foo".to_string(),
                    count: Some("123".to_string()),
                },
                TitleSummary {
                    url: "https://eksisozluk.com/bar--2".to_string(),
                    title: "Bar".to_string(),
                    count: None,
                },
            ]
        );
    }

    #[test]
    fn test_parse_titles_ignores_nested_anchors() {
        let body = r#"<li><div><a href="/deep">deep</a></div></li>"#;
        assert!(parse_titles(body, ORIGIN).is_empty());
    }

    #[test]
    fn test_parse_top_rated_without_titles() {
        for body in [
            "<ul><li><a href='/m'>menu</a></li></ul>",
            "<html><body><p>bakım çalışması</p></body></html>",
        ] {
            assert!(matches!(
                parse_top_rated(body, ORIGIN),
                Err(SourError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn test_parse_channels_missing_list() {
        assert!(matches!(
            parse_channels("<html><body><p>bakım çalışması</p></body></html>", ORIGIN),
            Err(SourError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_channels_empty_list() -> anyhow::Result<()> {
        let body = r#"<ul id="channel-follow-list"></ul>"#;
        assert!(parse_channels(body, ORIGIN)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_top_rated() -> anyhow::Result<()> {
        let body = r#"
            <ol class="topic-list">
                <li><a href="/a"><span class="caption">Title A</span><div class="detail">ssg</div></a></li>
                <li><a href="/b"><span class="caption">Title B</span></a></li>
                <li><a href="/menu">menu</a></li>
            </ol>
        "#;
        let titles = parse_top_rated(body, ORIGIN)?;
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].url, "https://eksisozluk.com/a");
        assert_eq!(titles[0].title, "Title A");
        assert_eq!(titles[1].url, "https://eksisozluk.com/b");
        assert_eq!(titles[1].title, "Title B");
        assert!(titles.iter().all(|t| t.count.is_none()));
        Ok(())
    }

    #[test]
    fn test_parse_channels() -> anyhow::Result<()> {
        let body = r##"
            <ul id="channel-follow-list">
                <li>
                    <h3><a class="index-link" href="/basliklar/kanal/spor">#spor</a></h3>
                    <p>spor, sporcular, kulüpler</p>
                </li>
                <li>
                    <h3><a class="index-link" href="/basliklar/kanal/bilim">#bilim</a></h3>
                    <p>bilim ve bilim insanları</p>
                </li>
            </ul>
        "##;
        let channels = parse_channels(body, ORIGIN)?;
        assert_eq!(
            channels,
            vec![
                ChannelInfo {
                    name: "spor".to_string(),
                    title: "spor, sporcular, kulüpler".to_string(),
                    url: "https://eksisozluk.com/basliklar/kanal/spor".to_string(),
                },
                ChannelInfo {
                    name: "bilim".to_string(),
                    title: "bilim ve bilim insanları".to_string(),
                    url: "https://eksisozluk.com/basliklar/kanal/bilim".to_string(),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parse_channels_missing_description() {
        let body = r##"
            <ul id="channel-follow-list">
                <li><a class="index-link" href="/basliklar/kanal/spor">#spor</a></li>
            </ul>
        "##;
        assert!(matches!(
            parse_channels(body, ORIGIN),
            Err(SourError::MalformedResponse(_))
        ));
    }

    const ENTRY_PAGE: &str = r#"
        <ul id="entry-item-list">
            <li data-id="1" data-author-id="10" data-author="ssg" data-favorite-count="57">
                <div class="content">
                    bir <a href="/?q=sozluk">sözlük</a> projesi
                </div>
                <footer>
                    <div class="info">
                        <a class="entry-date permalink" href="/entry/1">15.02.1999</a>
                        <a class="entry-author" href="/biri/ssg">ssg</a>
                        <img class="avatar" src="//img.ekstat.com/profiles/ssg.jpg" />
                    </div>
                </footer>
            </li>
            <li data-id="2" data-author-id="11" data-author="ikinci" data-favorite-count="0">
                <div class="content">ikinci entry</div>
                <a class="entry-date permalink" href="/entry/2">16.02.1999 10:00</a>
                <img class="avatar" src="https://img.ekstat.com/profiles/default.jpg" />
            </li>
        </ul>
    "#;

    #[test]
    fn test_parse_entries() -> anyhow::Result<()> {
        let result = parse_entries(ENTRY_PAGE, ORIGIN, "pena")?;
        assert_eq!(result.query, "pena");
        assert_eq!(result.entries.len(), 2);

        let first = &result.entries[0];
        assert_eq!(first.entry_id, 1);
        assert_eq!(first.author_id, 10);
        assert_eq!(first.author, "ssg");
        assert_eq!(first.fav_count, 57);
        assert_eq!(first.author_avatar, "https://img.ekstat.com/profiles/ssg.jpg");
        assert_eq!(first.url, "https://eksisozluk.com/entry/1");
        assert_eq!(first.date, "15.02.1999");
        assert_eq!(first.content, "bir sözlük projesi");

        let second = &result.entries[1];
        assert_eq!(
            second.author_avatar,
            "https://img.ekstat.com/profiles/default.jpg"
        );
        assert_eq!(second.content, "ikinci entry");
        Ok(())
    }

    #[test]
    fn test_parse_entries_missing_list() {
        assert!(matches!(
            parse_entries("<html><body></body></html>", ORIGIN, "pena"),
            Err(SourError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_entries_bad_id() {
        let body = r#"
            <ul id="entry-item-list">
                <li data-id="x" data-author-id="1" data-author="a" data-favorite-count="0">
                    <div class="content">c</div>
                </li>
            </ul>
        "#;
        assert!(matches!(
            parse_entries(body, ORIGIN, "pena"),
            Err(SourError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_autocomplete() -> anyhow::Result<()> {
        let body = r#"{"Query":"pen","Titles":["pena","penaltı"],"Nicks":["penguen"]}"#;
        let result = parse_autocomplete(body)?;
        assert_eq!(result.query, "pen");
        assert_eq!(result.titles, vec!["pena", "penaltı"]);
        assert_eq!(result.nicks, vec!["penguen"]);

        assert!(matches!(
            parse_autocomplete(r#"{"Query":"pen","Titles":[]}"#),
            Err(SourError::MalformedResponse(_))
        ));
        Ok(())
    }
}
