use prep_engine::{
    error_panel_html, render_result_page, ResultDocument, ResultPage, COPY_CONTROL_ATTR,
};
use scraper::{Html, Selector};

fn select_count(page: &Html, selector: &str) -> usize {
    let selector = Selector::parse(selector).unwrap();
    page.select(&selector).count()
}

#[test]
fn exported_page_keeps_form_loading_and_result_containers() {
    let mut document = ResultDocument::parse("<h2>Brief</h2><p>b</p><h2>Agenda</h2><p>a</p>");
    document.augment();
    let content_html = document.to_html();

    let html = render_result_page(&ResultPage {
        company_name: Some("Acme \"Widgets\""),
        content_html: &content_html,
        generated_utc: "2026-10-17T09:00:00+00:00",
    });
    let page = Html::parse_document(&html);

    assert_eq!(select_count(&page, "form#meetingForm #company_name"), 1);
    assert_eq!(select_count(&page, "form#meetingForm button[type=submit]"), 1);
    assert_eq!(select_count(&page, "#loading .loading-text"), 1);
    assert_eq!(select_count(&page, "#result > #resultContent"), 1);
    assert_eq!(
        select_count(
            &page,
            &format!("#result > #resultContent h2 button[{COPY_CONTROL_ATTR}]")
        ),
        2
    );

    let company = Selector::parse("#company_name").unwrap();
    let input = page.select(&company).next().unwrap();
    assert_eq!(input.value().attr("value"), Some("Acme \"Widgets\""));
}

#[test]
fn exported_error_page_puts_panel_inside_result_content() {
    let panel = error_panel_html("missing API key", "check your keys");
    let html = render_result_page(&ResultPage {
        company_name: None,
        content_html: &panel,
        generated_utc: "2026-10-17T09:00:00+00:00",
    });
    let page = Html::parse_document(&html);

    let message = Selector::parse("#result > #resultContent .error-message").unwrap();
    let text: String = page.select(&message).next().unwrap().text().collect();
    assert_eq!(text, "missing API key");
    assert_eq!(
        select_count(&page, &format!("#resultContent button[{COPY_CONTROL_ATTR}]")),
        0
    );
}
