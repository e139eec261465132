//! Dismissable error messages shown when a form submission fails.

use maud::{Markup, html};

/// An error message for the alert container at the bottom of each page.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    message: String,
    details: String,
}

impl Alert {
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    pub fn into_html(self) -> Markup {
        let Alert { message, details } = self;
        let container_style = "text-red-800 bg-red-50 border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div role="alert" class={ "p-4 mb-4 border rounded-lg " (container_style) }
                {
                    div class="flex items-center justify-between"
                    {
                        h3 class="text-lg font-medium" { (message) }

                        button
                            type="button"
                            aria-label="Close"
                            class="ms-auto -mx-1.5 -my-1.5 p-1.5 rounded-lg"
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                        {
                            "✕"
                        }
                    }

                    @if !details.is_empty()
                    {
                        div class="mt-2 text-sm" { (details) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod alert_tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let html = Alert::error("Could not save", "Try again later.")
            .into_html()
            .into_string();

        let fragment = Html::parse_fragment(&html);
        let alert = fragment
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("alert should be rendered");
        let text = alert.text().collect::<String>();

        assert!(text.contains("Could not save"));
        assert!(text.contains("Try again later."));
        assert!(alert.value().attr("class").unwrap().contains("text-red-800"));
    }

    #[test]
    fn alert_without_details_has_no_details_block() {
        let html = Alert::error("Could not save", "").into_html().into_string();

        let fragment = Html::parse_fragment(&html);
        let details = fragment
            .select(&Selector::parse("div.mt-2").unwrap())
            .count();

        assert_eq!(details, 0);
    }
}
