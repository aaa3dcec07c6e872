//! Extraction pipeline orchestration.
//!
//! Order matters: the element budget is enforced first, metadata is read
//! while JSON-LD scripts still exist, the pre-pass transforms run once, and
//! the grab loop handles its own retries. Post-processing and result
//! assembly happen only for a successful grab.

pub(crate) mod grab;
pub(crate) mod postprocess;
pub(crate) mod prep;
pub(crate) mod preprocess;

use crate::dom::{attr, Document};
use crate::error::{Error, Result};
use crate::metadata;
use crate::options::Options;
use crate::result::Article;
use crate::text::inner_text;

pub(crate) fn run(doc: &Document, options: &Options) -> Result<Article> {
    if options.max_elems_to_parse > 0 {
        let element_count = doc.select("*").length();
        if element_count > options.max_elems_to_parse {
            return Err(Error::TooManyElements(element_count));
        }
    }

    let meta = metadata::get_article_metadata(doc, options);

    if !options.extraction {
        return Ok(Article {
            title: meta.title,
            byline: meta.byline,
            site_name: meta.site_name,
            published_time: meta.published_time,
            ..Article::default()
        });
    }

    let lang = doc
        .select("html")
        .nodes()
        .first()
        .and_then(|html| attr(html, "lang"))
        .filter(|lang| !lang.is_empty());

    preprocess::prep_document(doc);

    let article_title = meta.title.clone().unwrap_or_default();
    let mut article_byline: Option<String> = None;
    let grabbed = grab::grab_article(doc, options, &article_title, &mut article_byline);

    let Some(grabbed) = grabbed else {
        if options.debug {
            log::debug!("extraction produced no content");
        }
        return Ok(Article {
            title: meta.title,
            byline: meta.byline.or(article_byline),
            lang,
            site_name: meta.site_name,
            published_time: meta.published_time,
            excerpt: meta.excerpt,
            ..Article::default()
        });
    };

    postprocess::post_process(&grabbed.article, options);

    let article_body = grabbed.article.select("body");
    let page = grabbed.article.select("div#readability-page-1");
    let content = match (options.serializer, page.exists()) {
        (Some(serialize), true) => serialize(&page),
        (None, true) => page.html().to_string(),
        _ => article_body.inner_html().to_string(),
    };

    let text_content = article_body
        .nodes()
        .first()
        .map(|body| body.text().to_string())
        .unwrap_or_default();
    let length = text_content.chars().count();

    let excerpt = meta.excerpt.or_else(|| {
        grabbed
            .article
            .select("p")
            .nodes()
            .first()
            .map(|p| inner_text(p, false))
            .filter(|text| !text.is_empty())
    });

    Ok(Article {
        title: meta.title,
        byline: meta.byline.or(article_byline),
        dir: grabbed.dir,
        lang,
        content: Some(content),
        text_content: Some(text_content),
        length: Some(length),
        excerpt,
        site_name: meta.site_name,
        published_time: meta.published_time,
    })
}
