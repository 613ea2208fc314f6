//! HTML rendering for the export dialog.

use maud::{Markup, html};

use crate::{
    Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        loading_spinner,
    },
};

use super::{
    build::{ExportFile, ExportRequest},
    dialog::ExportDialog,
    encode::ExportFormat,
    range::{ExportRange, ExportTimezone, parse_custom_range},
};

/// The id of the element every export endpoint swaps.
pub const EXPORT_DIALOG_ID: &str = "export-dialog";
const EXPORT_DIALOG_TARGET: &str = "#export-dialog";

const DIALOG_STYLE: &str = "fixed inset-0 z-50 flex items-center justify-center \
    bg-gray-900/50 px-4";

const DIALOG_PANEL_STYLE: &str = "w-full max-w-md rounded-lg bg-white p-6 \
    shadow-lg dark:bg-gray-800 text-gray-900 dark:text-white";

/// Render the export dialog in its current state.
///
/// A closed dialog renders as an empty container so that the export button
/// has somewhere to swap the form into.
pub fn export_dialog_view(dialog: &ExportDialog) -> Markup {
    match dialog {
        ExportDialog::Closed => html! {
            div id=(EXPORT_DIALOG_ID) data-state=(dialog.name()) {}
        },
        ExportDialog::Form { request, error } => {
            dialog_frame(dialog.name(), &form_view(request, error.as_deref()))
        }
        ExportDialog::Loading { request } => dialog_frame(dialog.name(), &loading_view(request)),
        ExportDialog::Success(file) => dialog_frame(dialog.name(), &success_view(file)),
        ExportDialog::Empty => dialog_frame(dialog.name(), &empty_view()),
    }
}

fn dialog_frame(state: &str, content: &Markup) -> Markup {
    html! {
        div
            id=(EXPORT_DIALOG_ID)
            data-state=(state)
            class=(DIALOG_STYLE)
            role="dialog"
            aria-modal="true"
            aria-labelledby="export-dialog-title"
        {
            div class=(DIALOG_PANEL_STYLE)
            {
                (content)
            }
        }
    }
}

fn dialog_title(request: &ExportRequest) -> Markup {
    html! {
        h2 id="export-dialog-title" class="mb-4 text-xl font-bold"
        {
            "Exportar " (request.kind.label().to_lowercase())
        }
    }
}

fn cancel_button(text: &str) -> Markup {
    html! {
        button
            type="button"
            hx-delete=(endpoints::EXPORTS)
            hx-target=(EXPORT_DIALOG_TARGET)
            hx-swap="outerHTML"
            class=(BUTTON_SECONDARY_STYLE)
        {
            (text)
        }
    }
}

/// The message shown under the custom date inputs, if any.
///
/// A stored error from a rejected submission takes precedence. Otherwise the
/// range is checked as it is edited, but only once a date has been entered.
fn custom_range_error(request: &ExportRequest, stored_error: Option<&str>) -> Option<String> {
    if let Some(error) = stored_error {
        return Some(error.to_owned());
    }

    if request.range != ExportRange::Custom {
        return None;
    }

    let has_input = [&request.custom_start, &request.custom_end]
        .into_iter()
        .any(|date| date.as_deref().is_some_and(|date| !date.trim().is_empty()));

    if !has_input {
        return None;
    }

    match parse_custom_range(
        request.custom_start.as_deref(),
        request.custom_end.as_deref(),
    ) {
        Err(Error::InvalidExportRange(reason)) => Some(reason),
        _ => None,
    }
}

fn form_view(request: &ExportRequest, stored_error: Option<&str>) -> Markup {
    let error = custom_range_error(request, stored_error);
    let is_custom = request.range == ExportRange::Custom;
    let can_submit = !is_custom
        || parse_custom_range(
            request.custom_start.as_deref(),
            request.custom_end.as_deref(),
        )
        .is_ok();

    html! {
        (dialog_title(request))

        form
            hx-post=(endpoints::EXPORTS)
            hx-target=(EXPORT_DIALOG_TARGET)
            hx-swap="outerHTML"
            class="flex flex-col gap-4"
        {
            input type="hidden" name="kind" value=(request.kind.as_path_segment());

            // Re-render the form whenever an option changes so the custom
            // range can be checked before it is submitted.
            div
                hx-get=(endpoints::EXPORT_DIALOG)
                hx-trigger="change"
                hx-include="closest form"
                hx-target=(EXPORT_DIALOG_TARGET)
                hx-swap="outerHTML"
                class="flex flex-col gap-4"
            {
                fieldset
                {
                    legend class=(FORM_LABEL_STYLE) { "Formato" }

                    div class=(FORM_RADIO_GROUP_STYLE)
                    {
                        @for format in ExportFormat::ALL
                        {
                            label class=(FORM_RADIO_LABEL_STYLE)
                            {
                                input
                                    type="radio"
                                    name="format"
                                    value=(format.as_str())
                                    checked[format == request.format]
                                    class=(FORM_RADIO_INPUT_STYLE);
                                (format.label())
                            }
                        }
                    }
                }

                div
                {
                    label for="export-timezone" class=(FORM_LABEL_STYLE) { "Zona horaria" }

                    select id="export-timezone" name="timezone" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for timezone in ExportTimezone::ALL
                        {
                            option
                                value=(timezone.as_str())
                                selected[timezone == request.timezone]
                            {
                                (timezone.as_str())
                            }
                        }
                    }
                }

                div
                {
                    label for="export-range" class=(FORM_LABEL_STYLE) { "Rango de fechas" }

                    select id="export-range" name="range" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for range in ExportRange::ALL
                        {
                            option value=(range.as_str()) selected[range == request.range]
                            {
                                (range.label())
                            }
                        }
                    }
                }

                @if is_custom
                {
                    div class="grid grid-cols-2 gap-4"
                    {
                        div
                        {
                            label for="export-custom-start" class=(FORM_LABEL_STYLE) { "Desde" }
                            input
                                id="export-custom-start"
                                type="date"
                                name="custom_start"
                                value=(request.custom_start.as_deref().unwrap_or_default())
                                required
                                class=(FORM_TEXT_INPUT_STYLE);
                        }

                        div
                        {
                            label for="export-custom-end" class=(FORM_LABEL_STYLE) { "Hasta" }
                            input
                                id="export-custom-end"
                                type="date"
                                name="custom_end"
                                value=(request.custom_end.as_deref().unwrap_or_default())
                                required
                                class=(FORM_TEXT_INPUT_STYLE);
                        }
                    }
                }

                @if let Some(error) = &error
                {
                    p id="export-range-error" class="text-sm text-red-600 dark:text-red-400"
                    {
                        (error)
                    }
                }
            }

            div class="flex justify-end gap-2"
            {
                (cancel_button("Cancelar"))

                button type="submit" disabled[!can_submit] class=(BUTTON_PRIMARY_STYLE)
                {
                    "Exportar"
                }
            }
        }
    }
}

fn loading_view(request: &ExportRequest) -> Markup {
    html! {
        (dialog_title(request))

        div
            hx-get=(endpoints::EXPORT_STATUS)
            hx-trigger="every 300ms"
            hx-target=(EXPORT_DIALOG_TARGET)
            hx-swap="outerHTML"
            class="flex items-center gap-2 mb-4"
        {
            (loading_spinner())
            span { "Generando el archivo..." }
        }

        div class="flex justify-end"
        {
            (cancel_button("Cancelar"))
        }
    }
}

fn success_view(file: &ExportFile) -> Markup {
    html! {
        h2 id="export-dialog-title" class="mb-4 text-xl font-bold" { "Exportación lista" }

        p class="mb-4"
        {
            "Se generó "
            a
                href=(endpoints::EXPORT_DOWNLOAD)
                download=(file.filename)
                data-auto-download
                class=(LINK_STYLE)
            {
                (file.filename)
            }
            "."
        }

        div class="flex justify-end"
        {
            (cancel_button("Cerrar"))
        }
    }
}

fn empty_view() -> Markup {
    html! {
        h2 id="export-dialog-title" class="mb-4 text-xl font-bold" { "Nada que exportar" }

        p class="mb-4" { "No hay datos para esta selección." }

        div class="flex justify-end"
        {
            (cancel_button("Cerrar"))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{ElementRef, Html, Selector};

    use crate::{
        collection::Collection,
        endpoints,
        export::{ExportDialog, ExportRequest, build::ExportFile, range::ExportRange},
        test_utils::{assert_hx_endpoint, must_get_form},
    };

    use super::export_dialog_view;

    fn render(dialog: &ExportDialog) -> Html {
        Html::parse_fragment(&export_dialog_view(dialog).into_string())
    }

    fn must_select<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("no element matches {selector}"))
    }

    fn submit_button<'a>(html: &'a Html) -> ElementRef<'a> {
        must_select(html, "button[type=submit]")
    }

    fn form(request: ExportRequest) -> ExportDialog {
        ExportDialog::Form {
            request,
            error: None,
        }
    }

    #[test]
    fn closed_dialog_is_an_empty_container() {
        let html = render(&ExportDialog::Closed);

        let container = must_select(&html, "#export-dialog");
        assert_eq!(container.value().attr("data-state"), Some("closed"));
        assert_eq!(container.children().count(), 0);
    }

    #[test]
    fn form_posts_to_exports_with_defaults_selected() {
        let html = render(&form(ExportRequest {
            kind: Collection::Transfers,
            ..Default::default()
        }));

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::EXPORTS, "hx-post");
        let kind = must_select(&html, "input[name=kind]");
        assert_eq!(kind.value().attr("value"), Some("transfers"));
        let csv = must_select(&html, "input[name=format][value=csv]");
        assert!(csv.value().attr("checked").is_some());
        let range = must_select(&html, "select[name=range] option[selected]");
        assert_eq!(range.value().attr("value"), Some("all"));
        let timezone = must_select(&html, "select[name=timezone] option[selected]");
        assert_eq!(timezone.value().attr("value"), Some("GMT-5"));
        assert!(submit_button(&html).value().attr("disabled").is_none());
        assert!(
            html.select(&Selector::parse("input[type=date]").unwrap())
                .next()
                .is_none()
        );
    }

    #[test]
    fn custom_range_without_dates_disables_submit_quietly() {
        let html = render(&form(ExportRequest {
            range: ExportRange::Custom,
            ..Default::default()
        }));

        assert!(submit_button(&html).value().attr("disabled").is_some());
        must_select(&html, "input[name=custom_start][type=date]");
        must_select(&html, "input[name=custom_end][type=date]");
        assert!(
            html.select(&Selector::parse("#export-range-error").unwrap())
                .next()
                .is_none()
        );
    }

    #[test]
    fn reversed_custom_range_shows_error_and_disables_submit() {
        let html = render(&form(ExportRequest {
            range: ExportRange::Custom,
            custom_start: Some("2026-01-20".to_owned()),
            custom_end: Some("2026-01-10".to_owned()),
            ..Default::default()
        }));

        assert!(submit_button(&html).value().attr("disabled").is_some());
        let error = must_select(&html, "#export-range-error");
        assert!(!error.text().collect::<String>().trim().is_empty());
    }

    #[test]
    fn valid_custom_range_enables_submit() {
        let html = render(&form(ExportRequest {
            range: ExportRange::Custom,
            custom_start: Some("2026-01-10".to_owned()),
            custom_end: Some("2026-01-10".to_owned()),
            ..Default::default()
        }));

        assert!(submit_button(&html).value().attr("disabled").is_none());
        let start = must_select(&html, "input[name=custom_start]");
        assert_eq!(start.value().attr("value"), Some("2026-01-10"));
    }

    #[test]
    fn loading_polls_status_and_can_be_cancelled() {
        let html = render(&ExportDialog::Loading {
            request: ExportRequest::default(),
        });

        let poller = must_select(&html, "[hx-trigger]");
        assert_eq!(poller.value().attr("hx-get"), Some(endpoints::EXPORT_STATUS));
        assert_eq!(poller.value().attr("hx-trigger"), Some("every 300ms"));
        let cancel = must_select(&html, "button[hx-delete]");
        assert_eq!(cancel.value().attr("hx-delete"), Some(endpoints::EXPORTS));
    }

    #[test]
    fn success_links_to_download() {
        let html = render(&ExportDialog::Success(ExportFile {
            filename: "transferencias-2026-01-20.csv".to_owned(),
            content_type: "text/csv; charset=utf-8",
            bytes: Vec::new(),
        }));

        let link = must_select(&html, "a[data-auto-download]");
        assert_eq!(link.value().attr("href"), Some(endpoints::EXPORT_DOWNLOAD));
        assert_eq!(
            link.value().attr("download"),
            Some("transferencias-2026-01-20.csv")
        );
    }

    #[test]
    fn empty_outcome_says_there_is_no_data() {
        let html = render(&ExportDialog::Empty);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No hay datos para esta selección"), "got {text}");
        assert!(
            html.select(&Selector::parse("a[data-auto-download]").unwrap())
                .next()
                .is_none()
        );
    }
}
