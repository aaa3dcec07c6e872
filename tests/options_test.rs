//! Option toggles and their observable effects.

#![allow(clippy::unwrap_used)]

use rs_readability::dom::Selection;
use rs_readability::{parse_with_options, Options};

const ARTICLE: &str = "<html><head><title>A Perfectly Reasonable Headline Here</title>\
    <meta property=\"og:description\" content=\"What the piece is about.\">\
    </head><body><div class=\"content\">\
    <p class=\"lead fancy\">Rooftop hives have multiplied across the city, tended by office workers, retired teachers, and weekend apiarists.</p>\
    <p>The honey they harvest is traded in stairwells and lobby markets, jar by jar, floor by floor, all winter long.</p>\
    </div></body></html>";

fn base_options() -> Options {
    Options { char_threshold: 100, ..Options::default() }
}

#[test]
fn extraction_disabled_returns_metadata_only() {
    let options = Options { extraction: false, ..base_options() };

    let article = parse_with_options(ARTICLE, &options).unwrap();

    assert_eq!(article.title.as_deref(), Some("A Perfectly Reasonable Headline Here"));
    assert!(article.content.is_none());
    assert!(article.text_content.is_none());
    assert!(article.length.is_none());
    assert!(article.excerpt.is_none());
}

#[test]
fn classes_are_stripped_by_default() {
    let article = parse_with_options(ARTICLE, &base_options()).unwrap();
    let content = article.content.unwrap();

    assert!(content.contains("<div id=\"readability-page-1\" class=\"page\">"));
    assert!(!content.contains("lead"));
    assert!(!content.contains("fancy"));
}

#[test]
fn keep_classes_preserves_everything() {
    let options = Options { keep_classes: true, ..base_options() };

    let article = parse_with_options(ARTICLE, &options).unwrap();
    let content = article.content.unwrap();

    assert!(content.contains("class=\"lead fancy\""));
    assert!(content.contains("class=\"content\""));
}

#[test]
fn classes_to_preserve_replaces_default_list() {
    let options = Options {
        classes_to_preserve: vec!["lead".to_string()],
        ..base_options()
    };

    let article = parse_with_options(ARTICLE, &options).unwrap();
    let content = article.content.unwrap();

    // "lead" survives; "fancy" and the built-in "page" do not
    assert!(content.contains("class=\"lead\""));
    assert!(!content.contains("fancy"));
    assert!(content.contains("<div id=\"readability-page-1\">"));
}

#[test]
fn custom_serializer_controls_content() {
    fn text_only(selection: &Selection) -> String {
        selection.text().to_string()
    }

    let options = Options { serializer: Some(text_only), ..base_options() };

    let article = parse_with_options(ARTICLE, &options).unwrap();
    let content = article.content.unwrap();

    assert!(!content.contains('<'));
    assert!(content.contains("Rooftop hives"));
}

#[test]
fn base_uri_resolves_relative_links() {
    let html = "<html><body><div class=\"content\">\
        <p>Rooftop hives have multiplied across the city, tended by office workers, and <a href=\"/harvest\">the harvest</a> is traded downstairs.</p>\
        <p>The honey they gather is traded in stairwells and lobby markets, jar by jar, floor by floor, all winter long.</p>\
        <img src=\"images/hive.jpg\">\
        </div></body></html>";
    let options = Options {
        base_uri: Some("https://example.com/articles/bees".to_string()),
        ..base_options()
    };

    let article = parse_with_options(html, &options).unwrap();
    let content = article.content.unwrap();

    assert!(content.contains("href=\"https://example.com/harvest\""));
    assert!(content.contains("src=\"https://example.com/articles/images/hive.jpg\""));
}

#[test]
fn link_density_modifier_relaxes_conditional_cleaning() {
    let html = "<html><body><div class=\"content\">\
        <p>Rooftop hives have multiplied across the city, tended by office workers, retired teachers, and weekend apiarists on their lunch breaks.</p>\
        <p>The honey they harvest is traded in stairwells and lobby markets, jar by jar, floor by floor, all winter long without pause.</p>\
        <div id=\"linky\"><span><a href=\"/map\">see the hive map</a> and more words</span></div>\
        </div></body></html>";

    let strict = parse_with_options(html, &base_options()).unwrap();
    assert!(!strict.content.unwrap().contains("hive map"));

    let relaxed_options = Options { link_density_modifier: 0.5, ..base_options() };
    let relaxed = parse_with_options(html, &relaxed_options).unwrap();
    assert!(relaxed.content.unwrap().contains("hive map"));
}

#[test]
fn debug_flag_does_not_change_output() {
    let quiet = parse_with_options(ARTICLE, &base_options()).unwrap();
    let loud =
        parse_with_options(ARTICLE, &Options { debug: true, ..base_options() }).unwrap();

    assert_eq!(quiet.content, loud.content);
    assert_eq!(quiet.text_content, loud.text_content);
}
