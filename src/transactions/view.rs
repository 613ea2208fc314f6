//! HTML rendering for the transactions page.

use maud::{Markup, html};
use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    collection::Collection,
    customer::{Customer, CustomerIndex},
    endpoints::{self, format_endpoint},
    export::{ExportDialog, export_dialog_view},
    filter::{FilterKind, FilterSession, FilterState, FilteredRow, RecordStatus, apply_filter},
    html::{
        BADGE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CHIP_ACTIVE_STYLE, CHIP_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, MAX_CELL_GRAPHEMES, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_money,
        truncate_graphemes,
    },
    payment::Payment,
    seed::Collections,
    transfer::Transfer,
};

use super::columns::{Column, ColumnPreferences};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// Shown in place of a value that is missing, e.g. a customer that could not
/// be matched by e-mail.
const MISSING_VALUE: &str = "-";

/// Everything needed to render one tab of the transactions page.
pub(crate) struct TabView<'a> {
    pub tab: Collection,
    pub collections: &'a Collections,
    pub filters: &'a FilterSession,
    pub columns: &'a ColumnPreferences,
    pub local_offset: UtcOffset,
}

/// Render the full transactions page with `tab` selected.
pub(crate) fn transactions_view(view: &TabView, dialog: &ExportDialog) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                div class="flex flex-wrap items-center justify-between gap-4 mb-4"
                {
                    h1 class="text-2xl font-bold" { "Transacciones" }

                    button
                        type="button"
                        hx-post=(endpoints::TRANSFERS_REFRESH)
                        hx-swap="none"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Actualizar transferencias"
                    }
                }

                (tabs_view(view.tab))

                (view.content())
            }
        }

        (export_dialog_view(dialog))
    };

    base("Transacciones", &content)
}

fn tabs_view(selected: Collection) -> Markup {
    html! {
        nav class="mb-4 border-b border-gray-200 dark:border-gray-700"
        {
            ul class="flex flex-wrap -mb-px text-sm font-medium text-center"
            {
                @for tab in Collection::ALL
                {
                    li class="me-2"
                    {
                        @if tab == selected {
                            a
                                href={ (endpoints::TRANSACTIONS_VIEW) "?tab=" (tab.as_path_segment()) }
                                aria-current="page"
                                class="inline-block p-4 text-blue-600 border-b-2 border-blue-600 \
                                    rounded-t-lg dark:text-blue-500 dark:border-blue-500"
                            {
                                (tab.label())
                            }
                        } @else {
                            a
                                href={ (endpoints::TRANSACTIONS_VIEW) "?tab=" (tab.as_path_segment()) }
                                class="inline-block p-4 border-b-2 border-transparent rounded-t-lg \
                                    hover:text-gray-600 hover:border-gray-300 dark:hover:text-gray-300"
                            {
                                (tab.label())
                            }
                        }
                    }
                }
            }
        }
    }
}

impl TabView<'_> {
    /// The toolbar, filter chips and table of the tab, swapped as a whole
    /// whenever a filter changes.
    pub(crate) fn content(&self) -> Markup {
        let query = match self.tab {
            Collection::Payments => self.filters.payments.query(),
            Collection::TransferCharges => self.filters.transfer_charges.query(),
            Collection::Transfers => self.filters.transfers.query(),
        };
        let filter_panel = match self.tab {
            Collection::Payments => filter_panel(self.tab, &self.filters.payments),
            Collection::TransferCharges => filter_panel(self.tab, &self.filters.transfer_charges),
            Collection::Transfers => filter_panel(self.tab, &self.filters.transfers),
        };

        html! {
            div id="tab-content" data-tab=(self.tab.as_path_segment()) class="flex flex-col gap-4"
            {
                div class="flex flex-wrap items-center gap-2"
                {
                    input
                        type="search"
                        name="query"
                        value=(query)
                        placeholder="Buscar por cliente, correo o ID"
                        aria-label="Buscar"
                        hx-post=(format_endpoint(endpoints::TAB_QUERY, self.tab.as_path_segment()))
                        hx-trigger="input changed delay:300ms, search"
                        hx-target="#records-table"
                        hx-swap="outerHTML"
                        class={ (FORM_TEXT_INPUT_STYLE) " max-w-sm" };

                    (columns_picker(self.tab, self.columns))

                    button
                        type="button"
                        hx-get={ (endpoints::EXPORT_DIALOG) "?kind=" (self.tab.as_path_segment()) }
                        hx-target="#export-dialog"
                        hx-swap="outerHTML"
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Exportar"
                    }
                }

                (filter_panel)

                (self.records_table())
            }
        }
    }

    /// The records that pass the tab's filters, most recent first.
    pub(crate) fn records_table(&self) -> Markup {
        let customers = CustomerIndex::new(&self.collections.customers);
        let columns = self.columns.visible(self.tab);

        match self.tab {
            Collection::Payments => payments_table(
                &apply_filter(
                    &self.collections.payments,
                    &customers,
                    &self.filters.payments,
                    self.local_offset,
                ),
                columns,
                self.local_offset,
            ),
            Collection::TransferCharges => payments_table(
                &apply_filter(
                    &self.collections.transfer_charges,
                    &customers,
                    &self.filters.transfer_charges,
                    self.local_offset,
                ),
                columns,
                self.local_offset,
            ),
            Collection::Transfers => transfers_table(
                &apply_filter(
                    &self.collections.transfers,
                    &customers,
                    &self.filters.transfers,
                    self.local_offset,
                ),
                columns,
                self.local_offset,
            ),
        }
    }
}

fn columns_picker(tab: Collection, preferences: &ColumnPreferences) -> Markup {
    html! {
        details class="relative"
        {
            summary class={ (BUTTON_SECONDARY_STYLE) " cursor-pointer list-none" } { "Columnas" }

            form
                hx-post=(format_endpoint(endpoints::TAB_COLUMNS, tab.as_path_segment()))
                class="absolute z-10 mt-2 w-56 p-3 space-y-2 rounded border \
                    border-gray-200 bg-white shadow dark:bg-gray-800 dark:border-gray-700"
            {
                @for column in Column::available(tab)
                {
                    label class="flex items-center gap-2 text-sm"
                    {
                        input
                            type="checkbox"
                            name="columns"
                            value=(column.as_str())
                            checked[preferences.is_visible(tab, *column)];
                        (column.label())
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Guardar" }
            }
        }
    }
}

fn chip(tab: Collection, kind: FilterKind, label: &str, active: bool) -> Markup {
    let filter = match kind {
        FilterKind::Created => "created",
        FilterKind::Status => "status",
    };
    let endpoint = format_endpoint(
        &format_endpoint(endpoints::TAB_FILTER_TOGGLE, tab.as_path_segment()),
        filter,
    );

    html! {
        button
            type="button"
            data-filter=(filter)
            aria-pressed=(if active { "true" } else { "false" })
            hx-post=(endpoint)
            hx-target="#tab-content"
            hx-swap="outerHTML"
            class=(if active { CHIP_ACTIVE_STYLE } else { CHIP_STYLE })
        {
            (label)
        }
    }
}

fn filter_panel<S: RecordStatus>(tab: Collection, state: &FilterState<S>) -> Markup {
    let toggles = state.toggles();
    let selected_date = state
        .selected_date()
        .map(|date| date.to_string())
        .unwrap_or_default();
    let selected_status = state.selected_status();

    html! {
        div id="filter-panel" class="flex flex-wrap items-center gap-2"
        {
            (chip(tab, FilterKind::Created, "Fecha de creación", toggles.created))

            @if toggles.created
            {
                input
                    type="date"
                    name="date"
                    value=(selected_date)
                    aria-label="Fecha de creación"
                    autofocus[state.is_date_picker_open()]
                    hx-put=(format_endpoint(endpoints::TAB_DATE, tab.as_path_segment()))
                    hx-trigger="change"
                    hx-target="#tab-content"
                    hx-swap="outerHTML"
                    class={ (FORM_TEXT_INPUT_STYLE) " w-auto" };
            }

            (chip(tab, FilterKind::Status, "Estado", toggles.status))

            @if toggles.status
            {
                select
                    name="status"
                    aria-label="Estado"
                    hx-put=(format_endpoint(endpoints::TAB_STATUS, tab.as_path_segment()))
                    hx-trigger="change"
                    hx-target="#tab-content"
                    hx-swap="outerHTML"
                    class={ (FORM_TEXT_INPUT_STYLE) " w-auto" }
                {
                    option value="all" selected[selected_status.is_none()] { "Todos" }

                    @for status in S::all()
                    {
                        option
                            value=(status.as_str())
                            selected[selected_status == Some(*status)]
                        {
                            (status.label())
                        }
                    }
                }
            }
        }
    }
}

fn status_badge<S: RecordStatus>(status: S) -> Markup {
    let colors = match status.as_str().to_lowercase().as_str() {
        "completado" | "completada" => {
            "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300"
        }
        "fallido" | "fallida" => "bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-300",
        "pendiente" | "procesando" => {
            "bg-yellow-100 text-yellow-800 dark:bg-yellow-900 dark:text-yellow-300"
        }
        _ => "bg-gray-100 text-gray-800 dark:bg-gray-700 dark:text-gray-300",
    };

    html! {
        span class={ (BADGE_STYLE) " " (colors) } { (status.label()) }
    }
}

/// Format `timestamp` in the server's timezone, falling back to the stored
/// text when it could not be parsed.
fn display_timestamp(timestamp: Option<OffsetDateTime>, raw: &str, offset: UtcOffset) -> String {
    timestamp
        .and_then(|timestamp| timestamp.checked_to_offset(offset))
        .and_then(|timestamp| timestamp.format(TIMESTAMP_FORMAT).ok())
        .unwrap_or_else(|| {
            if raw.trim().is_empty() {
                MISSING_VALUE.to_owned()
            } else {
                raw.to_owned()
            }
        })
}

fn text_cell(text: &str) -> Markup {
    html! {
        td class=(TABLE_CELL_STYLE) title=(text)
        {
            @if text.is_empty() {
                (MISSING_VALUE)
            } @else {
                (truncate_graphemes(text, MAX_CELL_GRAPHEMES))
            }
        }
    }
}

fn customer_cell(customer: Option<&Customer>) -> Markup {
    html! {
        td class=(TABLE_CELL_STYLE) data-column="customer"
        {
            @match customer {
                Some(customer) => {
                    span class="block font-medium" { (truncate_graphemes(&customer.name, MAX_CELL_GRAPHEMES)) }
                    span class="block text-xs text-gray-500 dark:text-gray-400" { (customer.id) }
                }
                None => { (MISSING_VALUE) }
            }
        }
    }
}

fn table_header(columns: &[Column], trailing: Option<&str>) -> Markup {
    html! {
        thead class=(TABLE_HEADER_STYLE)
        {
            tr
            {
                th scope="col" class=(TABLE_CELL_STYLE) { "ID" }

                @for column in columns
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { (column.label()) }
                }

                @if let Some(trailing) = trailing {
                    th scope="col" class=(TABLE_CELL_STYLE) { (trailing) }
                }
            }
        }
    }
}

fn empty_row(column_count: usize) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td colspan=(column_count) class={ (TABLE_CELL_STYLE) " text-center" }
            {
                "No se encontraron registros."
            }
        }
    }
}

fn payments_table(
    rows: &[FilteredRow<'_, Payment>],
    columns: &[Column],
    local_offset: UtcOffset,
) -> Markup {
    html! {
        div id="records-table" class="relative overflow-x-auto shadow-md rounded"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                (table_header(columns, None))

                tbody
                {
                    @for row in rows
                    {
                        @let payment = row.record;

                        tr class=(TABLE_ROW_STYLE) data-id=(payment.id)
                        {
                            th scope="row" class={ (TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white" }
                            {
                                (payment.id)
                            }

                            @for column in columns
                            {
                                @match column {
                                    Column::Date => {
                                        td class=(TABLE_CELL_STYLE) {
                                            (display_timestamp(row.timestamp, &payment.created_at, local_offset))
                                        }
                                    }
                                    Column::Customer => { (customer_cell(row.customer)) }
                                    Column::Email => { (text_cell(&payment.email)) }
                                    Column::Amount => {
                                        td class={ (TABLE_CELL_STYLE) " text-right" } {
                                            (format_money(payment.amount, &payment.currency))
                                        }
                                    }
                                    Column::Status => {
                                        td class=(TABLE_CELL_STYLE) { (status_badge(payment.status)) }
                                    }
                                    Column::Method => { (text_cell(&payment.method)) }
                                    Column::Reference => { (text_cell(&payment.reference)) }
                                    Column::Origin => { (text_cell(&payment.origin)) }
                                    Column::Destination | Column::FailureReason => { (text_cell("")) }
                                }
                            }
                        }
                    }

                    @if rows.is_empty() {
                        (empty_row(columns.len() + 1))
                    }
                }
            }
        }
    }
}

fn transfers_table(
    rows: &[FilteredRow<'_, Transfer>],
    columns: &[Column],
    local_offset: UtcOffset,
) -> Markup {
    html! {
        div id="records-table" class="relative overflow-x-auto shadow-md rounded"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                (table_header(columns, Some("Comprobante")))

                tbody
                {
                    @for row in rows
                    {
                        @let transfer = row.record;
                        @let details = &transfer.details;
                        @let raw_date = details
                            .created_at
                            .as_deref()
                            .or(details.date.as_deref())
                            .or(details.executed_at.as_deref())
                            .unwrap_or_default();

                        tr class=(TABLE_ROW_STYLE) data-id=(transfer.id)
                        {
                            th scope="row" class={ (TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white" }
                            {
                                span { (transfer.id) }
                                button
                                    type="button"
                                    data-copy=(transfer.id)
                                    title="Copiar ID"
                                    aria-label={ "Copiar " (transfer.id) }
                                    class="ms-2 text-xs text-blue-600 hover:underline dark:text-blue-500"
                                {
                                    "Copiar"
                                }
                            }

                            @for column in columns
                            {
                                @match column {
                                    Column::Date => {
                                        td class=(TABLE_CELL_STYLE) {
                                            (display_timestamp(row.timestamp, raw_date, local_offset))
                                        }
                                    }
                                    Column::Email => { (text_cell(&transfer.email)) }
                                    Column::Amount => {
                                        td class={ (TABLE_CELL_STYLE) " text-right" } {
                                            (format_money(details.amount, &details.currency))
                                        }
                                    }
                                    Column::Status => {
                                        td class=(TABLE_CELL_STYLE) { (status_badge(details.status)) }
                                    }
                                    Column::Destination => { (text_cell(&details.destination)) }
                                    Column::FailureReason => {
                                        (text_cell(details.failure_reason.as_deref().unwrap_or_default()))
                                    }
                                    Column::Customer
                                    | Column::Method
                                    | Column::Reference
                                    | Column::Origin => { (text_cell("")) }
                                }
                            }

                            td class=(TABLE_CELL_STYLE)
                            {
                                a
                                    href=(format_endpoint(endpoints::TRANSFER_RECEIPT, &transfer.id))
                                    download
                                    class=(LINK_STYLE)
                                {
                                    "PDF"
                                }
                            }
                        }
                    }

                    @if rows.is_empty() {
                        (empty_row(columns.len() + 2))
                    }
                }
            }
        }
    }
}
