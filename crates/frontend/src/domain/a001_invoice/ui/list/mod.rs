pub mod model;

use crate::domain::a001_invoice::ui::details::InvoiceDetails;
use crate::shared::components::data_grid::{DataGrid, GridHandle};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::search_input::SearchInput;
use crate::shared::icons::icon;
use crate::shared::modal::Modal;
use contracts::domain::a001_invoice::aggregate::{Invoice, InvoiceStatus};
use contracts::shared::grid::{
    CellRenderer, ColumnDef, GridCallbacks, GridOptions, SortModelItem, ValueFormatter,
};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Ключ сохранённых настроек таблицы
const GRID_ID: &str = "a001_invoice_list";
const REVISION_POLL_MS: u32 = 5_000;

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("invoice_number", "Номер")
            .width(170)
            .renderer(CellRenderer::Link),
        ColumnDef::new("customer_name", "Покупатель").width(240),
        ColumnDef::new("customer_email", "Email").hidden(true),
        ColumnDef::new("issue_date", "Дата")
            .width(110)
            .formatter(ValueFormatter::Date),
        ColumnDef::new("due_date", "Срок оплаты")
            .width(110)
            .formatter(ValueFormatter::Date),
        ColumnDef::new("status", "Статус")
            .width(150)
            .renderer(CellRenderer::Badge),
        ColumnDef::new("currency", "Валюта").width(80),
        ColumnDef::new("line_count", "Строк")
            .width(80)
            .formatter(ValueFormatter::Integer)
            .filterable(false),
        ColumnDef::new("total", "Сумма")
            .width(140)
            .min_width(100)
            .formatter(ValueFormatter::Money)
            .renderer(CellRenderer::Money)
            .filterable(false),
    ]
}

fn status_badge(raw: String) -> (BadgeColor, String) {
    match InvoiceStatus::parse(&raw) {
        Some(status) => {
            let color = match status {
                InvoiceStatus::Pending => BadgeColor::Warning,
                InvoiceStatus::Paid => BadgeColor::Success,
                InvoiceStatus::Overdue => BadgeColor::Danger,
                InvoiceStatus::Cancelled => BadgeColor::Subtle,
            };
            (color, status.display_name().to_string())
        }
        None => (BadgeColor::Informative, raw),
    }
}

/// Форма, открытая поверх списка
#[derive(Debug, Clone, PartialEq)]
enum Editing {
    New,
    Existing(String),
}

#[component]
#[allow(non_snake_case)]
pub fn InvoiceList() -> impl IntoView {
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let (selected_count, set_selected_count) = signal(0usize);
    let editing = RwSignal::new(None::<Editing>);
    let status_filter = RwSignal::new(String::new());
    let last_revision = RwSignal::new(None::<u64>);

    let callbacks = GridCallbacks {
        on_selection_changed: Some(Box::new(move |ids: &[String]| {
            set_selected_count.set(ids.len())
        })),
        on_sort_changed: Some(Box::new(|model: &[SortModelItem]| {
            log::debug!("a001 sort: {:?}", model)
        })),
        on_pagination_changed: Some(Box::new(|page: usize, size: usize| {
            log::debug!("a001 page {} / size {}", page, size)
        })),
        on_quick_filter: Some(Box::new(|text: &str| {
            log::debug!("a001 quick filter: {:?}", text)
        })),
        ..GridCallbacks::default()
    };
    let grid = GridHandle::new(GridOptions::new(GRID_ID), columns(), callbacks);

    let load = move || {
        let status = InvoiceStatus::parse(&status_filter.get_untracked());
        set_loading.set(true);
        spawn_local(async move {
            match model::fetch_invoices(status).await {
                Ok(response) => {
                    log::info!("Loaded {} invoices", response.total);
                    grid.set_rows(response.items.iter().map(Invoice::to_grid_row).collect());
                    set_error.set(None);
                }
                Err(e) => {
                    log::error!("Failed to load invoices: {}", e);
                    set_error.set(Some(e));
                }
            }
            set_loading.set(false);
            if let Ok(revision) = model::fetch_revision().await {
                last_revision.try_set(Some(revision));
            }
        });
    };

    // Reload when the status filter changes (and on first render)
    Effect::new(move |_| {
        status_filter.track();
        load();
    });

    // Other tabs and users of the tenant bump the page revision
    spawn_local(async move {
        loop {
            TimeoutFuture::new(REVISION_POLL_MS).await;
            let Some(seen) = last_revision.try_get_untracked() else {
                break;
            };
            match model::fetch_revision().await {
                Ok(revision) if seen.is_some_and(|s| s != revision) => {
                    log::debug!("a001 revision {:?} -> {}", seen, revision);
                    if last_revision.try_set(Some(revision)).is_some() {
                        break;
                    }
                    load();
                }
                Ok(_) => {}
                Err(e) => log::debug!("Revision poll failed: {}", e),
            }
        }
    });

    let duplicate_selected = move || {
        let ids = grid.selection();
        if ids.is_empty() {
            return;
        }
        spawn_local(async move {
            let mut created = 0usize;
            let mut failures = Vec::new();
            for id in ids {
                match model::duplicate_invoice(&id).await {
                    Ok(_) => created += 1,
                    Err(e) => failures.push(e),
                }
            }
            set_notice.set(Some(format!("Создано копий: {}", created)));
            set_error.set((!failures.is_empty()).then(|| failures.join("; ")));
            load();
        });
    };

    let delete_selected = move || {
        let ids = grid.selection();
        if ids.is_empty() {
            return;
        }
        let confirmed = web_sys::window()
            .and_then(|win| {
                win.confirm_with_message(&format!(
                    "Удалить выбранные счета? Количество: {}",
                    ids.len()
                ))
                .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            let mut deleted = 0usize;
            let mut failures = Vec::new();
            for id in ids {
                match model::delete_invoice(&id).await {
                    Ok(_) => deleted += 1,
                    Err(e) => failures.push(e),
                }
            }
            set_notice.set(Some(format!("Удалено: {}", deleted)));
            set_error.set((!failures.is_empty()).then(|| failures.join("; ")));
            grid.clear_selection();
            load();
        });
    };

    let on_saved = Callback::new(move |invoice: Invoice| {
        editing.set(None);
        set_notice.set(Some(format!("Счёт {} сохранён", invoice.invoice_number)));
        load();
    });
    let on_cancel = Callback::new(move |_: ()| editing.set(None));

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    {icon("invoices")}
                    <h1 class="header__title">"Счета"</h1>
                </div>
                <div class="header__actions">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| editing.set(Some(Editing::New))
                    >
                        {icon("plus")}
                        "Новый счёт"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load() disabled=loading>
                        {icon("refresh")}
                        "Обновить"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| duplicate_selected()
                        disabled=Signal::derive(move || selected_count.get() == 0)
                    >
                        {icon("copy")}
                        {move || format!("Дублировать ({})", selected_count.get())}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| delete_selected()
                        disabled=Signal::derive(move || selected_count.get() == 0)
                    >
                        {icon("delete")}
                        {move || format!("Удалить ({})", selected_count.get())}
                    </Button>
                </div>
            </div>

            {move || error.get().map(|e| view! {
                <div class="warning-box warning-box--error">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}
            {move || notice.get().map(|text| view! {
                <div class="notice-box" on:click=move |_| set_notice.set(None)>{text}</div>
            })}

            <div class="list-toolbar">
                <SearchInput grid=grid placeholder="Номер, покупатель, сумма..." />
                <Flex align=FlexAlign::Center gap=FlexGap::Small>
                    <label>"Статус:"</label>
                    <Select value=status_filter size=SelectSize::Small>
                        <option value="">"Все"</option>
                        {InvoiceStatus::all()
                            .into_iter()
                            .map(|s| view! { <option value=s.as_str()>{s.display_name()}</option> })
                            .collect_view()}
                    </Select>
                </Flex>
            </div>

            <DataGrid
                grid=grid
                loading=loading
                on_row_click=Callback::new(move |id: String| editing.set(Some(Editing::Existing(id))))
                badge=Callback::new(status_badge)
                empty_text="Счетов пока нет"
            />

            <PaginationControls grid=grid />

            {move || editing.get().map(|mode| {
                let (title, id) = match mode {
                    Editing::New => ("Новый счёт".to_string(), None),
                    Editing::Existing(id) => ("Редактирование счёта".to_string(), Some(id)),
                };
                view! {
                    <Modal title=title on_close=on_cancel>
                        <InvoiceDetails id=id on_saved=on_saved on_cancel=on_cancel />
                    </Modal>
                }
            })}
        </div>
    }
}
